//! CSV format handling for ticket import and export
//!
//! This module centralizes all CSV format concerns:
//! - Parsing lenient, user-supplied ticket rows into [`Ticket`]s
//! - Serializing tickets back to the export layout
//!
//! All functions are pure (no file access) for easy testing. Reading the
//! input file and handing the export to the user belong to the host.
//!
//! # Input format
//!
//! One ticket per line: `lot,position,n1,...,n7`. A line containing `;` is
//! split on `;` instead. Quotes are ordinary characters. Header rows, blank
//! lines and lines that do not yield exactly seven valid numbers are skipped
//! silently.

use crate::types::{Ticket, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_TICKET};
use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Header row written on export
pub const CSV_HEADER: [&str; 9] = [
    "Lote",
    "Posición",
    "Número1",
    "Número2",
    "Número3",
    "Número4",
    "Número5",
    "Número6",
    "Número7",
];

/// Suggested file name for exported tickets
pub const EXPORT_FILE_NAME: &str = "boletos_bingo.csv";

/// Parse CSV text into tickets, tagging ids with the current time
///
/// Ids look like `import-<millis>-<line index>`, unique within the batch.
pub fn parse_tickets(text: &str) -> Vec<Ticket> {
    parse_tickets_with_batch(text, &now_ms().to_string())
}

/// Parse CSV text into tickets with ids `import-<batch>-<line index>`
///
/// For each non-blank line:
/// - split on `;` if the line contains one, otherwise on `,`
/// - require at least three fields, and integer lot and position
/// - collect numbers from the third field on, keeping only integers in
///   1..=90 not already collected, and stop after seven
/// - emit a ticket only when exactly seven numbers were collected
///
/// Never fails; malformed lines contribute nothing.
pub fn parse_tickets_with_batch(text: &str, batch: &str) -> Vec<Ticket> {
    let mut tickets = Vec::new();

    for (line_index, line) in text.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some(record) = read_line(line) else {
            debug!(line_index, "skipping unreadable CSV line");
            continue;
        };
        match convert_record(&record) {
            Some((lot_number, position, numbers)) => tickets.push(Ticket::new(
                format!("import-{batch}-{line_index}"),
                lot_number,
                position,
                numbers,
            )),
            None => debug!(line_index, "skipping CSV line without a valid ticket"),
        }
    }

    tickets
}

/// Serialize tickets to CSV text, header first, one newline-terminated row each
pub fn serialize_tickets(tickets: &[Ticket]) -> String {
    let mut output = Vec::new();
    // writing into a Vec cannot fail
    if let Err(e) = write_tickets_csv(tickets, &mut output) {
        panic!("CSV serialization into memory failed: {e}");
    }
    String::from_utf8_lossy(&output).into_owned()
}

/// Write tickets in export layout to `output`
///
/// Rows follow the order of `tickets`; numbers keep their stored order.
pub fn write_tickets_csv(tickets: &[Ticket], output: &mut dyn Write) -> Result<(), csv::Error> {
    let mut writer = Writer::from_writer(output);

    writer.write_record(CSV_HEADER)?;

    for ticket in tickets {
        let mut row = Vec::with_capacity(2 + NUMBERS_PER_TICKET);
        row.push(ticket.lot_number.to_string());
        row.push(ticket.position.to_string());
        row.extend(ticket.numbers.iter().map(u8::to_string));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

fn read_line(line: &str) -> Option<StringRecord> {
    let delimiter = if line.contains(';') { b';' } else { b',' };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .quoting(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => Some(record),
        _ => None,
    }
}

fn convert_record(record: &StringRecord) -> Option<(u32, u32, [u8; NUMBERS_PER_TICKET])> {
    if record.len() < 3 {
        return None;
    }

    let lot_number = parse_int(record.get(0)?)?;
    let position = parse_int(record.get(1)?)?;

    let mut numbers: Vec<u8> = Vec::with_capacity(NUMBERS_PER_TICKET);
    for field in record.iter().skip(2) {
        if numbers.len() == NUMBERS_PER_TICKET {
            break;
        }
        let Some(value) = parse_int(field) else {
            continue;
        };
        let Ok(number) = u8::try_from(value) else {
            continue;
        };
        if (MIN_NUMBER..=MAX_NUMBER).contains(&number) && !numbers.contains(&number) {
            numbers.push(number);
        }
    }

    let numbers: [u8; NUMBERS_PER_TICKET] = numbers.try_into().ok()?;
    Some((lot_number, position, numbers))
}

/// Leading-integer parse: optional sign, then digits, trailing text ignored
///
/// Negative values are treated as unparseable since lots, positions and
/// numbers are all non-negative.
fn parse_int(field: &str) -> Option<u32> {
    let field = field.trim();
    let digits = field.strip_prefix('+').unwrap_or(field);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse().ok()
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
