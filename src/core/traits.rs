//! Core traits for the store's collaborators
//!
//! This module defines the seams the [`crate::core::TicketStore`] talks
//! through: a key/blob storage collaborator and a change observer.

use crate::types::{LotNumber, MatchingResult, StorageError, TicketId};

/// Key/blob persistence collaborator
///
/// Blobs are JSON text. Implementations may be slow or failing; the store
/// logs errors and keeps its in-memory state authoritative.
pub trait Storage: Send + Sync {
    /// Persist `blob` under `key`, replacing any previous value
    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError>;

    /// Read the blob stored under `key`; `Ok(None)` when nothing was saved
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Delete the blob stored under `key`; deleting a missing key succeeds
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Wait until every accepted write has reached the backing medium
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn save(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        (**self).save(key, blob)
    }

    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn flush(&self) -> Result<(), StorageError> {
        (**self).flush()
    }
}

/// What a state-changing store mutation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A ticket was created or had its numbers overwritten
    TicketSaved {
        /// Id of the saved ticket
        ticket_id: TicketId,
        /// True when the ticket did not exist before
        created: bool,
    },
    /// A lot was created or had its tickets replaced
    LotReplaced {
        /// The lot
        lot: LotNumber,
    },
    /// A lot and all its tickets were removed
    LotRemoved {
        /// The lot
        lot: LotNumber,
    },
    /// A single ticket was removed
    TicketRemoved {
        /// Id of the removed ticket
        ticket_id: TicketId,
    },
    /// A batch of tickets was merged in
    TicketsImported {
        /// Amount of tickets applied
        count: usize,
    },
    /// A number was added to the draw
    NumberDrawn {
        /// The number
        number: u8,
    },
    /// A number was taken back out of the draw
    NumberWithdrawn {
        /// The number
        number: u8,
    },
    /// The draw was cleared
    DrawReset,
    /// Lots, draw and results were cleared
    StoreReset,
}

/// Receives store changes synchronously, after results are recomputed
pub trait StoreObserver {
    /// Called once per state-changing mutation
    fn on_change(&mut self, event: &StoreEvent, results: &[MatchingResult]);
}

impl<F> StoreObserver for F
where
    F: FnMut(&StoreEvent, &[MatchingResult]),
{
    fn on_change(&mut self, event: &StoreEvent, results: &[MatchingResult]) {
        self(event, results)
    }
}
