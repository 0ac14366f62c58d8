//! Remote Write Ordering
//!
//! Keeps remote writes and deletes for the same key in call order, even when
//! they run on detached tasks.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;

// == Write Order ==
/// Per-key generations plus a per-key async lock.
///
/// Every remote mutation takes a [`WriteTicket`] at call time. When it runs it
/// holds the key's lock and is skipped if a later ticket exists for the key,
/// so a superseded write can never land after the operation that replaced it.
#[derive(Debug, Default)]
pub(crate) struct WriteOrder {
    next: AtomicU64,
    slots: Mutex<HashMap<String, Slot>>,
}

#[derive(Debug)]
struct Slot {
    generation: u64,
    lock: Arc<AsyncMutex<()>>,
}

/// Place of one remote mutation in its key's order.
#[derive(Debug)]
pub(crate) struct WriteTicket {
    key: String,
    generation: u64,
    lock: Arc<AsyncMutex<()>>,
}

impl WriteOrder {
    // == Register ==
    /// Takes the newest ticket for `key`, superseding any pending ones.
    pub(crate) fn register(&self, key: &str) -> WriteTicket {
        let generation = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        let mut slots = self.slots.lock();
        let slot = slots.entry(key.to_owned()).or_insert_with(|| Slot {
            generation,
            lock: Arc::default(),
        });
        slot.generation = generation;

        WriteTicket {
            key: key.to_owned(),
            generation,
            lock: Arc::clone(&slot.lock),
        }
    }

    // == Run ==
    /// Runs `op` under the key's lock unless a newer ticket exists.
    ///
    /// Returns `None` when the operation was superseded and skipped.
    pub(crate) async fn run<T, F, Fut>(&self, ticket: WriteTicket, op: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let lock = Arc::clone(&ticket.lock);
        let _guard = lock.lock().await;

        if !self.is_current(&ticket) {
            return None;
        }

        let output = op().await;
        self.release(&ticket);
        Some(output)
    }

    /// Drops the key's slot if `ticket` is still its newest.
    pub(crate) fn release(&self, ticket: &WriteTicket) {
        let mut slots = self.slots.lock();
        if slots
            .get(&ticket.key)
            .is_some_and(|slot| slot.generation == ticket.generation)
        {
            slots.remove(&ticket.key);
        }
    }

    fn is_current(&self, ticket: &WriteTicket) -> bool {
        self.slots
            .lock()
            .get(&ticket.key)
            .is_some_and(|slot| slot.generation == ticket.generation)
    }

    /// Keys with a remote mutation still pending.
    pub(crate) fn pending(&self) -> usize {
        self.slots.lock().len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_newer_ticket_supersedes_older() {
        let order = WriteOrder::default();

        let first = order.register("menu");
        let second = order.register("menu");

        assert_eq!(order.run(first, || async { 1 }).await, None);
        assert_eq!(order.run(second, || async { 2 }).await, Some(2));
        assert_eq!(order.pending(), 0);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let order = WriteOrder::default();

        let menu = order.register("menu");
        let tags = order.register("tags");

        assert_eq!(order.run(menu, || async { "menu" }).await, Some("menu"));
        assert_eq!(order.run(tags, || async { "tags" }).await, Some("tags"));
    }

    #[tokio::test]
    async fn test_release_clears_abandoned_ticket() {
        let order = WriteOrder::default();

        let ticket = order.register("menu");
        order.release(&ticket);

        assert_eq!(order.pending(), 0);
    }

    #[tokio::test]
    async fn test_running_write_blocks_later_one() {
        let order = Arc::new(WriteOrder::default());
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = order.register("menu");
        let slow = {
            let order = Arc::clone(&order);
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                order
                    .run(first, || async move {
                        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                        log.lock().push("first");
                    })
                    .await
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let second = order.register("menu");
        let second_log = Arc::clone(&log);
        order
            .run(second, || async move {
                second_log.lock().push("second");
            })
            .await;

        slow.await.unwrap();
        assert_eq!(*log.lock(), vec!["first", "second"]);
    }
}
