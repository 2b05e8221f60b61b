//! Ticket store
//!
//! The [`TicketStore`] owns the authoritative lot collection and drawn-number
//! set. Every mutation:
//!
//! 1. applies copy-on-write to the current state (`Arc::make_mut`),
//! 2. recomputes matching results over all tickets,
//! 3. asks the storage collaborator to persist whichever collection changed,
//! 4. notifies subscribed observers.
//!
//! All of that happens before the mutating call returns, so
//! [`TicketStore::matching_results`] is always current.
//!
//! # Silent policies
//!
//! Unknown lots or ticket ids, repeated draws and wrong-sized number lists are
//! no-ops, never errors. Range and uniqueness of numbers are the caller's job
//! (see [`crate::core::validation`]). Storage failures are logged and the
//! in-memory state stays usable.

use crate::core::matching::compute_matches;
use crate::core::traits::{Storage, StoreEvent, StoreObserver};
use crate::types::{
    DrawnNumbers, Lot, LotNumber, MatchingResult, Position, StorageError, Ticket, TicketId,
    NUMBERS_PER_TICKET,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Storage keys used by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key holding the serialized lot collection
    pub lots_key: String,

    /// Key holding the serialized drawn numbers
    pub drawn_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            lots_key: "bingo_tickets_data".to_string(),
            drawn_key: "bingo_drawn_numbers".to_string(),
        }
    }
}

/// Immutable view of the store at one point in time
///
/// Cloning is cheap; the store never mutates a snapshot it has handed out.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub lots: Arc<Vec<Lot>>,
    pub drawn: Arc<DrawnNumbers>,
    pub results: Arc<Vec<MatchingResult>>,
}

/// Which persisted collections a mutation touched
#[derive(Debug, Clone, Copy, Default)]
struct Dirty {
    lots: bool,
    drawn: bool,
}

impl Dirty {
    const LOTS: Dirty = Dirty {
        lots: true,
        drawn: false,
    };
    const DRAWN: Dirty = Dirty {
        lots: false,
        drawn: true,
    };
}

/// Authoritative lot/ticket/draw state with synchronous recomputation
pub struct TicketStore<S: Storage> {
    state: StoreSnapshot,
    storage: S,
    config: StoreConfig,
    observers: Vec<Box<dyn StoreObserver>>,
    id_seq: u64,
}

impl<S: Storage> TicketStore<S> {
    /// Open a store backed by `storage`, seeding state from it
    ///
    /// Missing keys mean "start empty". Unreadable or undecodable blobs are
    /// logged and treated as missing.
    pub fn open(storage: S, config: StoreConfig) -> Self {
        let lots: Vec<Lot> = load_blob(&storage, &config.lots_key).unwrap_or_default();
        let drawn: DrawnNumbers = load_blob(&storage, &config.drawn_key).unwrap_or_default();

        let mut store = TicketStore {
            state: StoreSnapshot::default(),
            storage,
            config,
            observers: Vec::new(),
            id_seq: 0,
        };

        let lots = normalize_loaded_lots(lots);
        info!(
            lots = lots.len(),
            drawn = drawn.len(),
            "ticket store loaded"
        );
        store.state.lots = Arc::new(lots);
        store.state.drawn = Arc::new(drawn);
        store.recompute();
        store
    }

    /// Flush pending writes and hand back the storage collaborator
    pub fn close(self) -> S {
        if let Err(e) = self.storage.flush() {
            warn!(error = %e, "failed to flush storage on close");
        }
        self.storage
    }

    /// Register an observer called after every state-changing mutation
    pub fn subscribe(&mut self, observer: impl StoreObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ---- mutations ----

    /// Create or update the ticket at (`lot_number`, `position`)
    ///
    /// No-op unless `numbers` holds exactly seven entries. An occupied
    /// position keeps its ticket id and gets the new numbers; otherwise a new
    /// id is minted and the lot is created if needed.
    ///
    /// # Returns
    ///
    /// The id of the saved ticket, or `None` for the shape no-op.
    pub fn add_ticket(
        &mut self,
        lot_number: LotNumber,
        position: Position,
        numbers: &[u8],
    ) -> Option<TicketId> {
        let Ok(numbers) = <[u8; NUMBERS_PER_TICKET]>::try_from(numbers) else {
            debug!(
                lot_number,
                position,
                count = numbers.len(),
                "ignoring ticket without seven numbers"
            );
            return None;
        };

        let existing_id = self
            .lot(lot_number)
            .and_then(|lot| lot.ticket_at(position))
            .map(|t| t.id.clone());
        let created = existing_id.is_none();
        let ticket_id = match existing_id {
            Some(id) => id,
            None => self.mint_ticket_id(),
        };

        let lots = Arc::make_mut(&mut self.state.lots);
        match lots.iter_mut().find(|lot| lot.id == lot_number) {
            Some(lot) => match lot.tickets.iter_mut().find(|t| t.position == position) {
                Some(ticket) => ticket.numbers = numbers,
                None => lot
                    .tickets
                    .push(Ticket::new(ticket_id.clone(), lot_number, position, numbers)),
            },
            None => lots.push(Lot::new(
                lot_number,
                vec![Ticket::new(ticket_id.clone(), lot_number, position, numbers)],
            )),
        }

        self.commit(
            Dirty::LOTS,
            StoreEvent::TicketSaved {
                ticket_id: ticket_id.clone(),
                created,
            },
        );
        Some(ticket_id)
    }

    /// Create lot `lot_number` or replace its whole ticket collection
    ///
    /// Tickets are re-stamped with `lot_number`, and a later ticket replaces
    /// an earlier one at the same position. An empty collection removes the
    /// lot, since empty lots are not kept.
    pub fn add_lot(&mut self, lot_number: LotNumber, tickets: Vec<Ticket>) -> bool {
        let mut lot = Lot::new(lot_number, Vec::with_capacity(tickets.len()));
        for mut ticket in tickets {
            ticket.lot_number = lot_number;
            lot.upsert(ticket);
        }

        if lot.is_empty() {
            return self.remove_lot(lot_number);
        }

        let lots = Arc::make_mut(&mut self.state.lots);
        match lots.iter_mut().find(|l| l.id == lot_number) {
            Some(existing) => existing.tickets = lot.tickets,
            None => lots.push(lot),
        }

        self.commit(Dirty::LOTS, StoreEvent::LotReplaced { lot: lot_number });
        true
    }

    /// Delete a lot with all its tickets; no-op if absent
    pub fn remove_lot(&mut self, lot_number: LotNumber) -> bool {
        let Some(idx) = self.state.lots.iter().position(|l| l.id == lot_number) else {
            return false;
        };

        Arc::make_mut(&mut self.state.lots).remove(idx);
        self.commit(Dirty::LOTS, StoreEvent::LotRemoved { lot: lot_number });
        true
    }

    /// Delete the first ticket with `ticket_id`, then prune empty lots
    ///
    /// No-op if no ticket has this id.
    pub fn remove_ticket(&mut self, ticket_id: &str) -> bool {
        let found = self.state.lots.iter().enumerate().find_map(|(lot_idx, lot)| {
            lot.tickets
                .iter()
                .position(|t| t.id == ticket_id)
                .map(|ticket_idx| (lot_idx, ticket_idx))
        });
        let Some((lot_idx, ticket_idx)) = found else {
            return false;
        };

        let lots = Arc::make_mut(&mut self.state.lots);
        lots[lot_idx].tickets.remove(ticket_idx);
        lots.retain(|lot| !lot.is_empty());

        self.commit(
            Dirty::LOTS,
            StoreEvent::TicketRemoved {
                ticket_id: ticket_id.to_string(),
            },
        );
        true
    }

    /// Merge a batch of tickets into the lots they name
    ///
    /// Tickets are grouped by `lot_number` in order of first appearance.
    /// Within an existing lot an incoming ticket replaces the one at the same
    /// position entirely (id included) and new positions are appended. Unknown
    /// lots are created with the incoming tickets.
    ///
    /// # Returns
    ///
    /// The number of tickets applied.
    pub fn import_tickets(&mut self, tickets: Vec<Ticket>) -> usize {
        if tickets.is_empty() {
            return 0;
        }
        let count = tickets.len();

        let mut groups: Vec<(LotNumber, Vec<Ticket>)> = Vec::new();
        for ticket in tickets {
            match groups.iter_mut().find(|(lot, _)| *lot == ticket.lot_number) {
                Some((_, group)) => group.push(ticket),
                None => groups.push((ticket.lot_number, vec![ticket])),
            }
        }

        let lots = Arc::make_mut(&mut self.state.lots);
        for (lot_number, group) in groups {
            let idx = match lots.iter().position(|l| l.id == lot_number) {
                Some(idx) => idx,
                None => {
                    lots.push(Lot::new(lot_number, Vec::with_capacity(group.len())));
                    lots.len() - 1
                }
            };
            for ticket in group {
                lots[idx].upsert(ticket);
            }
        }

        self.commit(Dirty::LOTS, StoreEvent::TicketsImported { count });
        count
    }

    /// Append `number` to the draw unless already drawn
    pub fn add_drawn_number(&mut self, number: u8) -> bool {
        if self.state.drawn.contains(number) {
            return false;
        }
        Arc::make_mut(&mut self.state.drawn).insert(number);
        self.commit(Dirty::DRAWN, StoreEvent::NumberDrawn { number });
        true
    }

    /// Remove `number` from the draw if present
    pub fn remove_drawn_number(&mut self, number: u8) -> bool {
        if !self.state.drawn.contains(number) {
            return false;
        }
        Arc::make_mut(&mut self.state.drawn).remove(number);
        self.commit(Dirty::DRAWN, StoreEvent::NumberWithdrawn { number });
        true
    }

    /// Clear the draw
    pub fn reset_drawn_numbers(&mut self) -> bool {
        if self.state.drawn.is_empty() {
            return false;
        }
        self.state.drawn = Arc::new(DrawnNumbers::new());
        self.commit(Dirty::DRAWN, StoreEvent::DrawReset);
        true
    }

    /// Clear lots, draw and results together, and drop the saved blobs
    pub fn reset_all(&mut self) {
        self.state = StoreSnapshot::default();
        self.recompute();

        for key in [&self.config.lots_key, &self.config.drawn_key] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key = %key, error = %e, "failed to remove stored data");
            }
        }
        debug!("ticket store reset");
        self.notify(&StoreEvent::StoreReset);
    }

    // ---- queries ----

    pub fn lots(&self) -> &[Lot] {
        &self.state.lots
    }

    pub fn drawn_numbers(&self) -> &DrawnNumbers {
        &self.state.drawn
    }

    /// Current ranked results, recomputed by the last mutation
    pub fn matching_results(&self) -> &[MatchingResult] {
        &self.state.results
    }

    /// Cheap, immutable copy of the current state
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.clone()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn lot(&self, lot_number: LotNumber) -> Option<&Lot> {
        self.state.lots.iter().find(|l| l.id == lot_number)
    }

    /// First ticket with `ticket_id`, searching lots in order
    pub fn ticket(&self, ticket_id: &str) -> Option<&Ticket> {
        self.all_tickets().find(|t| t.id == ticket_id)
    }

    /// Result for the ticket with `ticket_id`
    pub fn result_for(&self, ticket_id: &str) -> Option<&MatchingResult> {
        self.state.results.iter().find(|r| r.ticket_id == ticket_id)
    }

    /// All tickets, lot order then ticket order
    pub fn all_tickets(&self) -> impl Iterator<Item = &Ticket> {
        self.state.lots.iter().flat_map(|lot| lot.tickets.iter())
    }

    /// All tickets sorted by lot number, then position
    pub fn tickets_sorted(&self) -> Vec<&Ticket> {
        let mut tickets: Vec<&Ticket> = self.all_tickets().collect();
        tickets.sort_by_key(|t| (t.lot_number, t.position));
        tickets
    }

    pub fn ticket_count(&self) -> usize {
        self.state.lots.iter().map(|lot| lot.tickets.len()).sum()
    }

    // ---- internals ----

    fn commit(&mut self, dirty: Dirty, event: StoreEvent) {
        self.check_invariants();
        self.recompute();
        if dirty.lots {
            self.persist(&self.config.lots_key, &*self.state.lots);
        }
        if dirty.drawn {
            self.persist(&self.config.drawn_key, &*self.state.drawn);
        }
        debug!(?event, "ticket store changed");
        self.notify(&event);
    }

    fn recompute(&mut self) {
        let results = compute_matches(self.all_tickets(), &self.state.drawn);
        self.state.results = Arc::new(results);
    }

    fn notify(&mut self, event: &StoreEvent) {
        let results = Arc::clone(&self.state.results);
        for observer in &mut self.observers {
            observer.on_change(event, &results);
        }
    }

    fn persist<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|blob| self.storage.save(key, &blob));
        if let Err(e) = result {
            warn!(key, error = %e, "failed to persist store data");
        }
    }

    /// Mint an id unused by any ticket currently held
    fn mint_ticket_id(&mut self) -> TicketId {
        let stamp = now_ms();
        loop {
            self.id_seq += 1;
            let candidate = format!("{stamp}-{}", self.id_seq);
            if self.ticket(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.state.lots.iter().all(|lot| !lot.is_empty()),
            "ticket store invariant broken: empty lot kept"
        );
        debug_assert!(
            self.state
                .lots
                .iter()
                .enumerate()
                .all(|(i, lot)| self.state.lots[..i].iter().all(|other| other.id != lot.id)),
            "ticket store invariant broken: duplicate lot ids"
        );
    }
}

/// Bring loaded lots back in line with the store invariants
///
/// Empty lots are dropped. For a repeated lot id, or a repeated position
/// inside one lot, the first copy is kept and later ones are dropped with a
/// warning. Tickets are re-stamped with the lot that holds them.
fn normalize_loaded_lots(lots: Vec<Lot>) -> Vec<Lot> {
    let mut kept: Vec<Lot> = Vec::with_capacity(lots.len());
    for lot in lots {
        if lot.is_empty() {
            continue;
        }
        if kept.iter().any(|l| l.id == lot.id) {
            warn!(lot = lot.id, "dropping repeated lot in stored data");
            continue;
        }

        let mut clean = Lot::new(lot.id, Vec::with_capacity(lot.tickets.len()));
        for mut ticket in lot.tickets {
            if clean.ticket_at(ticket.position).is_some() {
                warn!(
                    lot = lot.id,
                    position = ticket.position,
                    "dropping repeated position in stored data"
                );
                continue;
            }
            ticket.lot_number = lot.id;
            clean.tickets.push(ticket);
        }
        kept.push(clean);
    }
    kept
}

fn load_blob<S: Storage, T: DeserializeOwned>(storage: &S, key: &str) -> Option<T> {
    let blob = match storage.load(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "failed to load stored data");
            return None;
        }
    };
    match serde_json::from_str(&blob) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "ignoring undecodable stored data");
            None
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn open_empty() -> (TicketStore<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        let store = TicketStore::open(storage.clone(), StoreConfig::default());
        (store, storage)
    }

    fn ticket(id: &str, lot: LotNumber, position: Position, numbers: [u8; 7]) -> Ticket {
        Ticket::new(id, lot, position, numbers)
    }

    #[test]
    fn test_add_ticket_creates_lot_then_updates_in_place() {
        let (mut store, _) = open_empty();

        let id = store.add_ticket(2, 1, &[1, 2, 3, 4, 5, 6, 7]).unwrap();
        assert_eq!(store.lots().len(), 1);
        assert_eq!(store.lots()[0].id, 2);

        let same = store.add_ticket(2, 1, &[10, 20, 30, 40, 50, 60, 70]).unwrap();
        assert_eq!(same, id);
        assert_eq!(store.ticket_count(), 1);
        assert_eq!(store.ticket(&id).unwrap().numbers, [10, 20, 30, 40, 50, 60, 70]);
    }

    #[test]
    fn test_add_ticket_with_wrong_count_is_noop() {
        let (mut store, storage) = open_empty();

        assert!(store.add_ticket(1, 1, &[1, 2, 3]).is_none());
        assert!(store.add_ticket(1, 1, &[1, 2, 3, 4, 5, 6, 7, 8]).is_none());
        assert!(store.lots().is_empty());
        assert!(!storage.contains(&store.config().lots_key));
    }

    #[test]
    fn test_minted_ids_are_unique() {
        let (mut store, _) = open_empty();

        let ids: Vec<TicketId> = (1..=20)
            .filter_map(|pos| store.add_ticket(1, pos, &[1, 2, 3, 4, 5, 6, 7]))
            .collect();

        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_add_lot_replaces_instead_of_merging() {
        let (mut store, _) = open_empty();
        store.add_ticket(1, 1, &[1, 2, 3, 4, 5, 6, 7]);
        store.add_ticket(1, 2, &[8, 9, 10, 11, 12, 13, 14]);

        assert!(store.add_lot(1, vec![ticket("x", 1, 5, [20, 21, 22, 23, 24, 25, 26])]));

        let lot = store.lot(1).unwrap();
        assert_eq!(lot.tickets.len(), 1);
        assert_eq!(lot.tickets[0].id, "x");
    }

    #[test]
    fn test_add_lot_restamps_lot_number_and_dedupes_positions() {
        let (mut store, _) = open_empty();

        store.add_lot(
            3,
            vec![
                ticket("a", 9, 1, [1, 2, 3, 4, 5, 6, 7]),
                ticket("b", 9, 1, [8, 9, 10, 11, 12, 13, 14]),
            ],
        );

        let lot = store.lot(3).unwrap();
        assert_eq!(lot.tickets.len(), 1);
        assert_eq!(lot.tickets[0].id, "b");
        assert_eq!(lot.tickets[0].lot_number, 3);
    }

    #[test]
    fn test_add_lot_with_no_tickets_removes_lot() {
        let (mut store, _) = open_empty();
        store.add_ticket(1, 1, &[1, 2, 3, 4, 5, 6, 7]);

        assert!(store.add_lot(1, vec![]));
        assert!(store.lot(1).is_none());
        assert!(!store.add_lot(7, vec![]));
    }

    #[test]
    fn test_remove_lot_and_missing_lot() {
        let (mut store, _) = open_empty();
        store.add_ticket(1, 1, &[1, 2, 3, 4, 5, 6, 7]);

        assert!(!store.remove_lot(99));
        assert!(store.remove_lot(1));
        assert!(store.lots().is_empty());
        assert!(store.matching_results().is_empty());
    }

    #[test]
    fn test_remove_last_ticket_prunes_lot() {
        let (mut store, _) = open_empty();
        let a = store.add_ticket(1, 1, &[1, 2, 3, 4, 5, 6, 7]).unwrap();
        let b = store.add_ticket(2, 1, &[1, 2, 3, 4, 5, 6, 7]).unwrap();

        assert!(store.remove_ticket(&a));
        assert!(store.lot(1).is_none());
        assert!(store.lot(2).is_some());
        assert!(!store.remove_ticket(&a));
        assert!(store.remove_ticket(&b));
        assert!(store.lots().is_empty());
    }

    #[test]
    fn test_import_merges_by_position() {
        let (mut store, _) = open_empty();
        let kept = store.add_ticket(1, 2, &[1, 2, 3, 4, 5, 6, 7]).unwrap();
        store.add_ticket(1, 1, &[1, 2, 3, 4, 5, 6, 7]);

        let applied = store.import_tickets(vec![
            ticket("imp-1", 1, 1, [11, 12, 13, 14, 15, 16, 17]),
            ticket("imp-2", 1, 3, [21, 22, 23, 24, 25, 26, 27]),
            ticket("imp-3", 4, 1, [31, 32, 33, 34, 35, 36, 37]),
        ]);

        assert_eq!(applied, 3);
        let lot = store.lot(1).unwrap();
        let ids: Vec<&str> = lot.tickets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![kept.as_str(), "imp-1", "imp-2"]);
        assert_eq!(lot.ticket_at(1).unwrap().numbers, [11, 12, 13, 14, 15, 16, 17]);
        assert_eq!(store.lot(4).unwrap().tickets.len(), 1);
    }

    #[test]
    fn test_drawn_numbers_idempotent_and_removable() {
        let (mut store, _) = open_empty();

        assert!(store.add_drawn_number(5));
        assert!(!store.add_drawn_number(5));
        assert!(store.add_drawn_number(12));
        assert_eq!(store.drawn_numbers().as_slice(), &[5, 12]);

        assert!(!store.remove_drawn_number(40));
        assert!(store.remove_drawn_number(5));
        assert_eq!(store.drawn_numbers().as_slice(), &[12]);

        assert!(store.reset_drawn_numbers());
        assert!(store.drawn_numbers().is_empty());
        assert!(!store.reset_drawn_numbers());
    }

    #[test]
    fn test_results_recomputed_after_each_mutation() {
        let (mut store, _) = open_empty();
        let id = store.add_ticket(1, 1, &[5, 12, 27, 34, 45, 67, 89]).unwrap();

        for n in [5, 12, 27] {
            store.add_drawn_number(n);
        }
        let result = store.result_for(&id).unwrap();
        assert_eq!(result.match_count, 3);
        assert_eq!(result.matched_numbers, vec![5, 12, 27]);

        store.remove_drawn_number(12);
        assert_eq!(store.result_for(&id).unwrap().match_count, 2);
    }

    #[test]
    fn test_persists_only_changed_collection() {
        let (mut store, storage) = open_empty();
        let lots_key = store.config().lots_key.clone();
        let drawn_key = store.config().drawn_key.clone();

        store.add_drawn_number(9);
        assert_eq!(storage.get(&drawn_key), Some("[9]".to_string()));
        assert!(!storage.contains(&lots_key));

        store.add_ticket(1, 1, &[1, 2, 3, 4, 5, 6, 7]);
        assert!(storage.contains(&lots_key));
    }

    #[test]
    fn test_reset_all_clears_state_and_storage() {
        let (mut store, storage) = open_empty();
        store.add_ticket(1, 1, &[1, 2, 3, 4, 5, 6, 7]);
        store.add_drawn_number(1);

        store.reset_all();

        assert!(store.lots().is_empty());
        assert!(store.drawn_numbers().is_empty());
        assert!(store.matching_results().is_empty());
        assert!(!storage.contains(&store.config().lots_key));
        assert!(!storage.contains(&store.config().drawn_key));
    }

    #[test]
    fn test_open_restores_saved_state() {
        let (mut store, storage) = open_empty();
        let id = store.add_ticket(1, 1, &[5, 12, 27, 34, 45, 67, 89]).unwrap();
        store.add_drawn_number(5);
        let storage_back = store.close();
        assert_eq!(storage_back.get("bingo_drawn_numbers"), Some("[5]".to_string()));

        let reopened = TicketStore::open(storage, StoreConfig::default());
        assert_eq!(reopened.ticket(&id).unwrap().numbers, [5, 12, 27, 34, 45, 67, 89]);
        assert_eq!(reopened.drawn_numbers().as_slice(), &[5]);
        assert_eq!(reopened.result_for(&id).unwrap().match_count, 1);
    }

    #[test]
    fn test_open_ignores_corrupt_blobs() {
        let storage = MemoryStorage::new();
        storage.save("bingo_tickets_data", "not json").unwrap();
        storage.save("bingo_drawn_numbers", "[3, 4]").unwrap();

        let store = TicketStore::open(storage, StoreConfig::default());
        assert!(store.lots().is_empty());
        assert_eq!(store.drawn_numbers().as_slice(), &[3, 4]);
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_mutations() {
        let (mut store, _) = open_empty();
        store.add_ticket(1, 1, &[1, 2, 3, 4, 5, 6, 7]);
        let before = store.snapshot();

        store.add_ticket(1, 2, &[1, 2, 3, 4, 5, 6, 7]);
        store.add_drawn_number(1);

        assert_eq!(before.lots[0].tickets.len(), 1);
        assert!(before.drawn.is_empty());
        assert_eq!(store.snapshot().lots[0].tickets.len(), 2);
    }

    #[test]
    fn test_observers_see_fresh_results() {
        let (mut store, _) = open_empty();
        let seen: Rc<RefCell<Vec<(StoreEvent, usize)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        store.subscribe(move |event: &StoreEvent, results: &[MatchingResult]| {
            let top = results.first().map(|r| r.match_count).unwrap_or(0);
            sink.borrow_mut().push((event.clone(), top));
        });

        store.add_ticket(1, 1, &[1, 2, 3, 4, 5, 6, 7]);
        store.add_drawn_number(3);
        store.add_drawn_number(3);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0].0, StoreEvent::TicketSaved { created: true, .. }));
        assert_eq!(seen[1], (StoreEvent::NumberDrawn { number: 3 }, 1));
    }

    #[test]
    fn test_tickets_sorted_by_lot_then_position() {
        let (mut store, _) = open_empty();
        store.add_ticket(2, 2, &[1, 2, 3, 4, 5, 6, 7]);
        store.add_ticket(1, 3, &[1, 2, 3, 4, 5, 6, 7]);
        store.add_ticket(2, 1, &[1, 2, 3, 4, 5, 6, 7]);

        let order: Vec<(u32, u32)> = store
            .tickets_sorted()
            .iter()
            .map(|t| (t.lot_number, t.position))
            .collect();
        assert_eq!(order, vec![(1, 3), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_open_drops_repeated_lots_and_positions() {
        let storage = MemoryStorage::new();
        storage
            .save(
                "bingo_tickets_data",
                r#"[
                    {"id":1,"tickets":[
                        {"id":"a","lotNumber":1,"position":1,"numbers":[1,2,3,4,5,6,7]},
                        {"id":"b","lotNumber":1,"position":1,"numbers":[8,9,10,11,12,13,14]},
                        {"id":"c","lotNumber":9,"position":2,"numbers":[5,15,25,35,45,55,65]}
                    ]},
                    {"id":1,"tickets":[
                        {"id":"d","lotNumber":1,"position":3,"numbers":[1,2,3,4,5,6,7]}
                    ]},
                    {"id":2,"tickets":[]}
                ]"#,
            )
            .unwrap();

        let mut store = TicketStore::open(storage, StoreConfig::default());

        assert_eq!(store.lots().len(), 1);
        let ids: Vec<&str> = store.lots()[0].tickets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(store.ticket("c").unwrap().lot_number, 1);

        assert!(store.add_drawn_number(5));
        assert_eq!(store.matching_results().len(), 2);
        assert!(store.ticket("d").is_none());
    }

    /// Storage whose every call fails
    struct FailingStorage;

    impl Storage for FailingStorage {
        fn save(&self, key: &str, _blob: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                message: "disk full".to_string(),
            })
        }

        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                message: "permission denied".to_string(),
            })
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                message: "permission denied".to_string(),
            })
        }
    }

    #[test]
    fn test_failing_load_opens_empty() {
        let store = TicketStore::open(FailingStorage, StoreConfig::default());

        assert!(store.lots().is_empty());
        assert!(store.drawn_numbers().is_empty());
        assert!(store.matching_results().is_empty());
    }

    #[test]
    fn test_failing_save_keeps_state_usable() {
        let mut store = TicketStore::open(FailingStorage, StoreConfig::default());

        let id = store.add_ticket(1, 1, &[5, 12, 27, 34, 45, 67, 89]).unwrap();
        assert!(store.add_drawn_number(12));
        assert!(store.add_drawn_number(5));
        assert_eq!(store.result_for(&id).unwrap().matched_numbers, vec![5, 12]);

        assert!(store.remove_drawn_number(5));
        assert_eq!(store.result_for(&id).unwrap().match_count, 1);

        assert!(store.remove_ticket(&id));
        assert!(store.lots().is_empty());
        assert!(store.matching_results().is_empty());
    }

    #[test]
    fn test_failing_remove_still_resets_state() {
        let mut store = TicketStore::open(FailingStorage, StoreConfig::default());
        store.add_ticket(1, 1, &[1, 2, 3, 4, 5, 6, 7]);
        store.add_drawn_number(1);

        store.reset_all();

        assert!(store.lots().is_empty());
        assert!(store.drawn_numbers().is_empty());
        assert!(store.matching_results().is_empty());
        assert!(store.add_ticket(2, 1, &[1, 2, 3, 4, 5, 6, 7]).is_some());
    }
}
