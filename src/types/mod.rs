//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `ticket`: Ticket and Lot records plus their identifiers
//! - `draw`: The ordered drawn-number set
//! - `matching`: Derived per-ticket matching results
//! - `error`: Error types for the engine and its collaborators

pub mod draw;
pub mod error;
pub mod matching;
pub mod ticket;

pub use draw::DrawnNumbers;
pub use error::{BingoError, StorageError, ValidationError};
pub use matching::MatchingResult;
pub use ticket::{
    Lot, LotNumber, Position, Ticket, TicketId, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_TICKET,
};
