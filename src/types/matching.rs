//! Matching result type
//!
//! Results are derived data: recomputed from tickets and the drawn set on
//! every change and never persisted.

use super::ticket::{LotNumber, Position, TicketId, NUMBERS_PER_TICKET};

/// Per-ticket comparison between its numbers and the drawn set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingResult {
    /// Lot of the source ticket
    pub lot_number: LotNumber,

    /// Position of the source ticket
    pub position: Position,

    /// Id of the source ticket
    pub ticket_id: TicketId,

    /// Ticket numbers already drawn, in ticket order
    pub matched_numbers: Vec<u8>,

    /// Ticket numbers not drawn yet, in ticket order
    pub missing_numbers: Vec<u8>,

    /// Length of `matched_numbers`, in 0..=7
    pub match_count: usize,
}

impl MatchingResult {
    /// A ticket wins once all of its numbers are drawn
    pub fn is_winner(&self) -> bool {
        self.match_count == NUMBERS_PER_TICKET
    }
}
