//! Error types for the bingo ticket engine
//!
//! The core store never returns these for ordinary use: not-found and
//! shape-invalid input are silent no-ops there. Errors surface at the edges.
//!
//! # Error Categories
//!
//! - **Validation Errors**: malformed ticket or drawn number, caught before the store is called
//! - **Storage Errors**: I/O or encoding failures inside a storage collaborator
//! - **Host Errors**: failures of the command-line host (files, empty imports, unknown ids)

use thiserror::Error;

use super::ticket::{LotNumber, TicketId, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_TICKET};

/// Ticket or draw input rejected at the boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Lot number must be positive
    #[error("Lot number must be a positive number")]
    NonPositiveLot,

    /// Position must be positive
    #[error("Position must be a positive number")]
    NonPositivePosition,

    /// Ticket does not hold exactly seven numbers
    #[error("A ticket must have exactly {expected} numbers, got {count}", expected = NUMBERS_PER_TICKET)]
    WrongNumberCount {
        /// Amount of numbers supplied
        count: usize,
    },

    /// Number outside 1..=90
    #[error("Number {number} is out of range ({min}-{max})", min = MIN_NUMBER, max = MAX_NUMBER)]
    NumberOutOfRange {
        /// The offending number
        number: u32,
    },

    /// Same number appears twice on one ticket
    #[error("Number {number} is repeated on the ticket")]
    DuplicateNumber {
        /// The repeated number
        number: u8,
    },

    /// Number has already been drawn
    #[error("Number {number} has already been drawn")]
    AlreadyDrawn {
        /// The repeated draw
        number: u8,
    },
}

/// Failure inside a storage collaborator
///
/// Stores log these and carry on; they never abort a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Underlying read/write failed
    #[error("Storage I/O error for key '{key}': {message}")]
    Io {
        /// Storage key involved
        key: String,
        /// Description of the I/O error
        message: String,
    },

    /// Blob could not be encoded or decoded
    #[error("Storage encoding error: {message}")]
    Encoding {
        /// Description of the serde error
        message: String,
    },

    /// Background writer is gone
    #[error("Storage worker stopped")]
    WorkerStopped,
}

/// Host-level error returned by the command-line surface
#[derive(Debug, Error)]
pub enum BingoError {
    /// Input rejected by validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage collaborator failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// File could not be read or written
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV writer failed
    #[error("CSV error: {message}")]
    Csv {
        /// Description of the CSV error
        message: String,
    },

    /// Import produced zero tickets
    #[error("No valid tickets found in {source_name}")]
    NoTicketsParsed {
        /// File or stream that was parsed
        source_name: String,
    },

    /// No ticket with this id exists
    #[error("Ticket {id} not found")]
    TicketNotFound {
        /// The id looked up
        id: TicketId,
    },

    /// No lot with this number exists
    #[error("Lot {lot} not found")]
    LotNotFound {
        /// The lot number looked up
        lot: LotNumber,
    },

    /// Export requested with no tickets stored
    #[error("There are no tickets to export")]
    NothingToExport,
}

impl From<std::io::Error> for BingoError {
    fn from(error: std::io::Error) -> Self {
        BingoError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BingoError {
    fn from(error: csv::Error) -> Self {
        BingoError::Csv {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::Encoding {
            message: error.to_string(),
        }
    }
}

impl StorageError {
    /// Create an Io error for `key`
    pub fn io(key: &str, error: &std::io::Error) -> Self {
        StorageError::Io {
            key: key.to_string(),
            message: error.to_string(),
        }
    }
}

impl ValidationError {
    /// Create a WrongNumberCount error
    pub fn wrong_number_count(count: usize) -> Self {
        ValidationError::WrongNumberCount { count }
    }

    /// Create a NumberOutOfRange error
    pub fn number_out_of_range(number: u32) -> Self {
        ValidationError::NumberOutOfRange { number }
    }

    /// Create a DuplicateNumber error
    pub fn duplicate_number(number: u8) -> Self {
        ValidationError::DuplicateNumber { number }
    }

    /// Create an AlreadyDrawn error
    pub fn already_drawn(number: u8) -> Self {
        ValidationError::AlreadyDrawn { number }
    }
}
