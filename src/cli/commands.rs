//! Command execution for the command-line host
//!
//! The host plays the presentation role: it validates user input, calls the
//! store, and renders tickets and results as text. Output goes to any
//! `Write` so commands can be tested without a terminal.

use super::args::Command;
use crate::core::matching::{has_winner, winners, with_matches};
use crate::core::traits::Storage;
use crate::core::validation::{validate_draw, validate_ticket};
use crate::core::TicketStore;
use crate::io::csv_format::{parse_tickets, write_tickets_csv, EXPORT_FILE_NAME};
use crate::types::{BingoError, MatchingResult, Ticket};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Run one command against `store`, writing human-readable output to `out`
pub fn execute<S: Storage>(
    command: Command,
    store: &mut TicketStore<S>,
    out: &mut dyn Write,
) -> Result<(), BingoError> {
    match command {
        Command::Import { file } => {
            let text = fs::read_to_string(&file)?;
            let tickets = parse_tickets(&text);
            if tickets.is_empty() {
                return Err(BingoError::NoTicketsParsed {
                    source_name: file.display().to_string(),
                });
            }
            let count = store.import_tickets(tickets);
            writeln!(out, "Imported {count} tickets")?;
        }
        Command::Export { output } => {
            let tickets: Vec<Ticket> = store.all_tickets().cloned().collect();
            if tickets.is_empty() {
                return Err(BingoError::NothingToExport);
            }
            let path = output.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
            let mut file = BufWriter::new(File::create(&path)?);
            write_tickets_csv(&tickets, &mut file)?;
            file.flush()?;
            writeln!(out, "Exported {} tickets to {}", tickets.len(), path.display())?;
        }
        Command::Add {
            lot,
            position,
            numbers,
        } => {
            let numbers = validate_ticket(lot, position, &numbers)?;
            if let Some(id) = store.add_ticket(lot, position, &numbers) {
                writeln!(out, "Saved ticket {id} (lot {lot}, position {position})")?;
            }
        }
        Command::RemoveTicket { id } => {
            if !store.remove_ticket(&id) {
                return Err(BingoError::TicketNotFound { id });
            }
            writeln!(out, "Removed ticket {id}")?;
        }
        Command::RemoveLot { lot } => {
            if !store.remove_lot(lot) {
                return Err(BingoError::LotNotFound { lot });
            }
            writeln!(out, "Removed lot {lot}")?;
        }
        Command::Draw { numbers } => {
            // all or nothing: a bad number leaves the draw untouched
            let mut pending = store.drawn_numbers().clone();
            let mut accepted = Vec::with_capacity(numbers.len());
            for raw in numbers {
                let number = validate_draw(raw, &pending)?;
                pending.insert(number);
                accepted.push(number);
            }
            for number in accepted {
                store.add_drawn_number(number);
            }
            write_draw(store, out)?;
            write_winners(store.matching_results(), out)?;
        }
        Command::Undraw { number } => {
            let removed = u8::try_from(number)
                .map(|n| store.remove_drawn_number(n))
                .unwrap_or(false);
            if removed {
                writeln!(out, "Removed {number} from the draw")?;
            } else {
                writeln!(out, "{number} was not drawn")?;
            }
            write_draw(store, out)?;
        }
        Command::ResetDraw => {
            store.reset_drawn_numbers();
            writeln!(out, "Draw cleared")?;
        }
        Command::Reset => {
            store.reset_all();
            writeln!(out, "All tickets and drawn numbers deleted")?;
        }
        Command::Results { all, lot } => {
            let results = store.matching_results();
            let shown: Vec<&MatchingResult> = if all {
                results.iter().collect()
            } else {
                with_matches(results)
            };
            let shown: Vec<&MatchingResult> = shown
                .into_iter()
                .filter(|r| lot.is_none_or(|l| r.lot_number == l))
                .collect();

            if shown.is_empty() {
                writeln!(out, "No matches yet. Draw some numbers to begin.")?;
                return Ok(());
            }
            writeln!(out, "Results ({} tickets)", shown.len())?;
            for result in shown {
                write_result(result, out)?;
            }
            write_winners(results, out)?;
        }
        Command::List { lot } => {
            let tickets: Vec<&Ticket> = store
                .tickets_sorted()
                .into_iter()
                .filter(|t| lot.is_none_or(|l| t.lot_number == l))
                .collect();
            for ticket in &tickets {
                let matched = store.result_for(&ticket.id).map_or(0, |r| r.match_count);
                writeln!(
                    out,
                    "Lot {} #{} [{}] {} ({matched}/7)",
                    ticket.lot_number,
                    ticket.position,
                    ticket.id,
                    join(&ticket.numbers)
                )?;
            }
            writeln!(out, "{} tickets", tickets.len())?;
        }
        Command::Show { id } => {
            let ticket = store
                .ticket(&id)
                .ok_or_else(|| BingoError::TicketNotFound { id: id.clone() })?;
            writeln!(
                out,
                "Lot {}, position {} [{}]",
                ticket.lot_number, ticket.position, ticket.id
            )?;
            writeln!(out, "Numbers: {}", join(&ticket.numbers))?;
            if let Some(result) = store.result_for(&id) {
                writeln!(out, "Matched: {}", join(&result.matched_numbers))?;
                writeln!(out, "Missing: {}", join(&result.missing_numbers))?;
                if result.is_winner() {
                    writeln!(out, "WINNER!")?;
                }
            }
        }
    }
    Ok(())
}

fn write_draw<S: Storage>(store: &TicketStore<S>, out: &mut dyn Write) -> std::io::Result<()> {
    let drawn = store.drawn_numbers();
    writeln!(out, "Drawn ({}): {}", drawn.len(), join(drawn.as_slice()))
}

fn write_result(result: &MatchingResult, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        out,
        "Lot {} #{}: {}/7 matched [{}] missing [{}]",
        result.lot_number,
        result.position,
        result.match_count,
        join(&result.matched_numbers),
        join(&result.missing_numbers)
    )
}

fn write_winners(results: &[MatchingResult], out: &mut dyn Write) -> std::io::Result<()> {
    if !has_winner(results) {
        return Ok(());
    }
    for winner in winners(results) {
        writeln!(
            out,
            "WINNER! Lot {}, ticket {}",
            winner.lot_number, winner.position
        )?;
    }
    Ok(())
}

fn join(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
