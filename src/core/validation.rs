//! Boundary validation
//!
//! Hosts run these checks before calling store mutations. The store itself
//! only enforces the seven-number shape and trusts everything else.

use crate::types::{
    DrawnNumbers, LotNumber, Position, ValidationError, MAX_NUMBER, MIN_NUMBER,
    NUMBERS_PER_TICKET,
};

/// Validate a ticket entered by a user
///
/// Checks, in order: positive lot, positive position, exactly seven numbers,
/// every number in 1..=90, no number repeated.
///
/// # Returns
///
/// The numbers as a fixed array, ready for [`crate::core::TicketStore::add_ticket`].
pub fn validate_ticket(
    lot_number: LotNumber,
    position: Position,
    numbers: &[u32],
) -> Result<[u8; NUMBERS_PER_TICKET], ValidationError> {
    if lot_number == 0 {
        return Err(ValidationError::NonPositiveLot);
    }
    if position == 0 {
        return Err(ValidationError::NonPositivePosition);
    }
    if numbers.len() != NUMBERS_PER_TICKET {
        return Err(ValidationError::wrong_number_count(numbers.len()));
    }

    let mut out = [0u8; NUMBERS_PER_TICKET];
    for (idx, raw) in numbers.iter().copied().enumerate() {
        let number = check_range(raw)?;
        if out[..idx].contains(&number) {
            return Err(ValidationError::duplicate_number(number));
        }
        out[idx] = number;
    }
    Ok(out)
}

/// Validate a number about to be drawn
pub fn validate_draw(number: u32, drawn: &DrawnNumbers) -> Result<u8, ValidationError> {
    let number = check_range(number)?;
    if drawn.contains(number) {
        return Err(ValidationError::already_drawn(number));
    }
    Ok(number)
}

fn check_range(number: u32) -> Result<u8, ValidationError> {
    match u8::try_from(number) {
        Ok(n) if (MIN_NUMBER..=MAX_NUMBER).contains(&n) => Ok(n),
        _ => Err(ValidationError::number_out_of_range(number)),
    }
}
