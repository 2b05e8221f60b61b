//! Ticket and lot records
//!
//! A [`Ticket`] always carries exactly [`NUMBERS_PER_TICKET`] numbers; the
//! fixed-size array makes a partially filled ticket unrepresentable. Range and
//! uniqueness of the numbers are checked at the boundary (see
//! [`crate::core::validation`]), not here.

use serde::{Deserialize, Serialize};

/// Opaque ticket identifier, unique within a store
pub type TicketId = String;

/// Lot identifier chosen by the user (positive)
pub type LotNumber = u32;

/// Slot of a ticket within its lot (positive)
pub type Position = u32;

/// Amount of numbers printed on every ticket
pub const NUMBERS_PER_TICKET: usize = 7;

/// Lowest number that can be printed or drawn
pub const MIN_NUMBER: u8 = 1;

/// Highest number that can be printed or drawn
pub const MAX_NUMBER: u8 = 90;

/// A purchased entry
///
/// `lot_number` is a denormalized copy of the owning [`Lot`]'s id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Identifier assigned at creation, immutable afterwards
    pub id: TicketId,

    /// Owning lot
    pub lot_number: LotNumber,

    /// Slot within the lot, unique per lot
    pub position: Position,

    /// The printed numbers, in printed order
    pub numbers: [u8; NUMBERS_PER_TICKET],
}

impl Ticket {
    /// Create a ticket from its parts
    pub fn new(
        id: impl Into<TicketId>,
        lot_number: LotNumber,
        position: Position,
        numbers: [u8; NUMBERS_PER_TICKET],
    ) -> Self {
        Ticket {
            id: id.into(),
            lot_number,
            position,
            numbers,
        }
    }

    /// Whether `number` is printed on this ticket
    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }
}

/// A named grouping of tickets
///
/// The store never keeps a lot without tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    /// Lot number, unique among lots
    pub id: LotNumber,

    /// Tickets of this lot, unique by position
    pub tickets: Vec<Ticket>,
}

impl Lot {
    /// Create a lot holding `tickets`
    pub fn new(id: LotNumber, tickets: Vec<Ticket>) -> Self {
        Lot { id, tickets }
    }

    /// Ticket occupying `position`, if any
    pub fn ticket_at(&self, position: Position) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.position == position)
    }

    /// Insert `ticket`, replacing whatever occupied its position
    ///
    /// Returns the replaced ticket.
    pub fn upsert(&mut self, ticket: Ticket) -> Option<Ticket> {
        match self.tickets.iter_mut().find(|t| t.position == ticket.position) {
            Some(slot) => Some(std::mem::replace(slot, ticket)),
            None => {
                self.tickets.push(ticket);
                None
            }
        }
    }

    /// Whether the lot holds no tickets
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}
