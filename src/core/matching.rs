//! Matching engine
//!
//! Pure functions from (tickets, drawn numbers) to ranked [`MatchingResult`]s.
//! No I/O and no state: the store calls [`compute_matches`] after every
//! mutation and hosts may call it directly.
//!
//! # Ranking
//!
//! Results are ordered by `match_count`, highest first. The sort is stable, so
//! tickets with equal counts keep the order in which they were supplied. For
//! the store that is lot order, then ticket order inside each lot. Identical
//! input therefore always yields an identical sequence.

use crate::types::{DrawnNumbers, MatchingResult, Ticket};

/// Compute one result per ticket, ranked by match count
///
/// Every ticket yields exactly one result; nothing is filtered out.
///
/// # Examples
///
/// ```
/// use bingo_ticket_engine::core::matching::compute_matches;
/// use bingo_ticket_engine::types::{DrawnNumbers, Ticket};
///
/// let ticket = Ticket::new("t1", 1, 1, [5, 12, 27, 34, 45, 67, 89]);
/// let drawn: DrawnNumbers = [5, 12, 27].into_iter().collect();
///
/// let results = compute_matches([&ticket], &drawn);
/// assert_eq!(results[0].match_count, 3);
/// assert_eq!(results[0].missing_numbers, vec![34, 45, 67, 89]);
/// ```
pub fn compute_matches<'a, I>(tickets: I, drawn: &DrawnNumbers) -> Vec<MatchingResult>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let drawn_table = drawn.membership();

    let mut results: Vec<MatchingResult> = tickets
        .into_iter()
        .map(|ticket| match_ticket(ticket, &drawn_table))
        .collect();

    // sort_by is stable: ties keep input order
    results.sort_by(|a, b| b.match_count.cmp(&a.match_count));
    results
}

/// Whether any result is a winner
pub fn has_winner(results: &[MatchingResult]) -> bool {
    results.iter().any(MatchingResult::is_winner)
}

/// All winning results, in ranking order
pub fn winners(results: &[MatchingResult]) -> Vec<&MatchingResult> {
    results.iter().filter(|r| r.is_winner()).collect()
}

/// Results with at least one matched number, in ranking order
pub fn with_matches(results: &[MatchingResult]) -> Vec<&MatchingResult> {
    results.iter().filter(|r| r.match_count > 0).collect()
}

fn match_ticket(ticket: &Ticket, drawn_table: &[bool; 256]) -> MatchingResult {
    let (matched_numbers, missing_numbers): (Vec<u8>, Vec<u8>) = ticket
        .numbers
        .iter()
        .copied()
        .partition(|n| drawn_table[usize::from(*n)]);

    MatchingResult {
        lot_number: ticket.lot_number,
        position: ticket.position,
        ticket_id: ticket.id.clone(),
        match_count: matched_numbers.len(),
        matched_numbers,
        missing_numbers,
    }
}
