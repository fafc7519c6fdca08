//! Debounced background saves
//!
//! Each scheduled save waits out a quiet period and only writes if no newer
//! snapshot was scheduled for the same id in the meantime. Superseded tasks
//! are left to wake up and exit on their own. An id's slot is dropped once
//! its latest save finishes.

use crate::ComponentStore;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Quiet period before a scheduled snapshot is written
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    #[default]
    Idle,
    /// Waiting for the quiet period to end
    Pending,
    Saving,
}

#[derive(Default)]
struct Slot {
    ticket: u64,
    status: SaveStatus,
}

type Slots = Arc<Mutex<HashMap<String, Slot>>>;

#[derive(Clone)]
pub struct DebouncedWriter {
    store: Arc<dyn ComponentStore>,
    delay: Duration,
    slots: Slots,
    /// Tickets are unique across ids and slot lifetimes
    tickets: Arc<AtomicU64>,
}

impl DebouncedWriter {
    pub fn new(store: Arc<dyn ComponentStore>) -> Self {
        Self::with_delay(store, DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(store: Arc<dyn ComponentStore>, delay: Duration) -> Self {
        Self {
            store,
            delay,
            slots: Arc::new(Mutex::new(HashMap::new())),
            tickets: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Schedule `value` to be written to `id`. Must be called from within
    /// a tokio runtime.
    pub fn schedule(&self, id: &str, value: String) -> JoinHandle<()> {
        let ticket = self.tickets.fetch_add(1, Ordering::Relaxed) + 1;
        self.with_slot(id, |slot| {
            slot.ticket = ticket;
            slot.status = SaveStatus::Pending;
        });

        let store = self.store.clone();
        let slots = self.slots.clone();
        let delay = self.delay;
        let id = id.to_string();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            if !transition(&slots, &id, ticket, SaveStatus::Saving) {
                tracing::trace!(id = %id, ticket, "save superseded");
                return;
            }

            let write_id = id.clone();
            let result =
                tokio::task::spawn_blocking(move || store.update(&write_id, &value)).await;
            match result {
                Ok(Ok(())) => tracing::info!(id = %id, "saved component"),
                Ok(Err(err)) => tracing::warn!(id = %id, error = %err, "failed to save component"),
                Err(err) => tracing::error!(id = %id, error = %err, "save task failed"),
            }

            finish(&slots, &id, ticket);
        })
    }

    /// Save status for `id`; ids never scheduled are idle
    pub fn status(&self, id: &str) -> SaveStatus {
        self.slots
            .lock()
            .ok()
            .and_then(|slots| slots.get(id).map(|slot| slot.status))
            .unwrap_or_default()
    }

    /// Ids with a save pending or in flight
    pub fn tracked(&self) -> usize {
        self.slots.lock().map(|slots| slots.len()).unwrap_or_default()
    }

    fn with_slot<R>(&self, id: &str, f: impl FnOnce(&mut Slot) -> R) -> R {
        let mut slots = match self.slots.lock() {
            Ok(slots) => slots,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(slots.entry(id.to_string()).or_default())
    }
}

/// Move the slot to `status` if `ticket` is still the latest for `id`
fn transition(slots: &Slots, id: &str, ticket: u64, status: SaveStatus) -> bool {
    let mut slots = match slots.lock() {
        Ok(slots) => slots,
        Err(poisoned) => poisoned.into_inner(),
    };
    match slots.get_mut(id) {
        Some(slot) if slot.ticket == ticket => {
            slot.status = status;
            true
        }
        _ => false,
    }
}

/// Drop the slot of `id` if `ticket` is still the latest; a missing slot
/// reads as idle
fn finish(slots: &Slots, id: &str, ticket: u64) {
    let mut slots = match slots.lock() {
        Ok(slots) => slots,
        Err(poisoned) => poisoned.into_inner(),
    };
    if slots.get(id).is_some_and(|slot| slot.ticket == ticket) {
        slots.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, StoreResult};
    use std::sync::atomic::AtomicUsize;

    /// Memory store that counts updates
    struct CountingStore {
        inner: MemoryStore,
        updates: AtomicUsize,
    }

    impl ComponentStore for CountingStore {
        fn create(&self, value: &str) -> StoreResult<String> {
            self.inner.create(value)
        }

        fn read(&self, id: &str) -> StoreResult<Option<String>> {
            self.inner.read(id)
        }

        fn update(&self, id: &str, value: &str) -> StoreResult<()> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.inner.update(id, value)
        }
    }

    fn counting_store() -> Arc<CountingStore> {
        Arc::new(CountingStore {
            inner: MemoryStore::new(),
            updates: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_only_latest_snapshot_is_written() {
        let store = counting_store();
        let id = store.create("<a/>").unwrap();
        let writer = DebouncedWriter::with_delay(store.clone(), Duration::from_millis(10));

        let handles = vec![
            writer.schedule(&id, "<b/>".to_string()),
            writer.schedule(&id, "<c/>".to_string()),
            writer.schedule(&id, "<d/>".to_string()),
        ];
        assert_eq!(writer.status(&id), SaveStatus::Pending);

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.updates.load(Ordering::SeqCst), 1);
        assert_eq!(store.read(&id).unwrap().as_deref(), Some("<d/>"));
        assert_eq!(writer.status(&id), SaveStatus::Idle);
    }

    #[tokio::test]
    async fn test_ids_debounce_independently() {
        let store = counting_store();
        let a = store.create("a").unwrap();
        let b = store.create("b").unwrap();
        let writer = DebouncedWriter::with_delay(store.clone(), Duration::from_millis(5));

        let first = writer.schedule(&a, "a2".to_string());
        let second = writer.schedule(&b, "b2".to_string());
        first.await.unwrap();
        second.await.unwrap();

        assert_eq!(store.updates.load(Ordering::SeqCst), 2);
        assert_eq!(store.read(&b).unwrap().as_deref(), Some("b2"));
    }

    #[tokio::test]
    async fn test_failed_write_is_swallowed() {
        let store = counting_store();
        let writer = DebouncedWriter::with_delay(store.clone(), Duration::from_millis(1));

        writer.schedule("missing", "x".to_string()).await.unwrap();

        assert_eq!(store.updates.load(Ordering::SeqCst), 1);
        assert_eq!(store.read("missing").unwrap(), None);
        assert_eq!(writer.status("missing"), SaveStatus::Idle);
    }

    #[tokio::test]
    async fn test_finished_saves_release_their_slot() {
        let store = counting_store();
        let ids: Vec<String> = (0..5)
            .map(|i| store.create(&format!("<p>{i}</p>")).unwrap())
            .collect();
        let writer = DebouncedWriter::with_delay(store.clone(), Duration::from_millis(5));

        let handles: Vec<_> = ids
            .iter()
            .map(|id| writer.schedule(id, "<p>saved</p>".to_string()))
            .collect();
        assert_eq!(writer.tracked(), 5);

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(writer.tracked(), 0);
        assert_eq!(writer.status(&ids[0]), SaveStatus::Idle);

        // a later burst on a released id still only writes its latest value
        let first = writer.schedule(&ids[0], "<p>a</p>".to_string());
        let second = writer.schedule(&ids[0], "<p>b</p>".to_string());
        first.await.unwrap();
        second.await.unwrap();
        assert_eq!(store.read(&ids[0]).unwrap().as_deref(), Some("<p>b</p>"));
        assert_eq!(store.updates.load(Ordering::SeqCst), 6);
    }
}
