//! Bingo Ticket Engine Library
//! # Overview
//!
//! This library tracks which of many pre-printed bingo tickets are close to
//! winning as numbers are drawn one at a time.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Ticket, Lot, DrawnNumbers, MatchingResult, errors)
//! - [`cli`] - Command-line host: argument parsing and command execution
//! - [`core`] - Business logic components:
//!   - [`core::matching`] - Matching engine: partition and rank tickets against the draw
//!   - [`core::ticket_store`] - Lots and draw state, recomputed and persisted on every change
//!   - [`core::validation`] - Boundary checks for user-entered tickets and draws
//! - [`io`] - CSV codec and storage collaborators
//!
//! # Tickets
//!
//! Every ticket holds exactly seven distinct numbers in 1..=90 and sits at a
//! unique position inside a lot. A ticket wins once all seven numbers have
//! been drawn.
//!
//! # Example
//!
//! ```
//! use bingo_ticket_engine::{MemoryStorage, StoreConfig, TicketStore};
//!
//! let mut store = TicketStore::open(MemoryStorage::new(), StoreConfig::default());
//! store.add_ticket(1, 1, &[5, 12, 27, 34, 45, 67, 89]);
//! for n in [5, 12, 27] {
//!     store.add_drawn_number(n);
//! }
//!
//! let top = &store.matching_results()[0];
//! assert_eq!(top.match_count, 3);
//! assert_eq!(top.missing_numbers, vec![34, 45, 67, 89]);
//! ```

pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use crate::core::{compute_matches, StoreConfig, TicketStore};
pub use io::{parse_tickets, serialize_tickets, BackgroundStorage, FileStorage, MemoryStorage};
pub use types::{
    BingoError, DrawnNumbers, Lot, LotNumber, MatchingResult, Position, StorageError, Ticket,
    TicketId, ValidationError,
};
