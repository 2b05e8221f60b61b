//! Core business logic module
//!
//! This module contains the ticket tracking components:
//! - `traits` - Storage collaborator and store observer abstractions
//! - `matching` - Pure matching engine and winner helpers
//! - `validation` - Boundary checks run by hosts before mutating the store
//! - `ticket_store` - Authoritative lots/draw state with recomputation

pub mod matching;
pub mod ticket_store;
pub mod traits;
pub mod validation;

pub use matching::{compute_matches, has_winner, winners, with_matches};
pub use ticket_store::{StoreConfig, StoreSnapshot, TicketStore};
pub use traits::{Storage, StoreEvent, StoreObserver};
pub use validation::{validate_draw, validate_ticket};
