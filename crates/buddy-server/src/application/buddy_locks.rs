//! Per-key async locks
//!
//! Guarantees at most one in-flight mutation per buddy (or per user during
//! creation). Holders keep an owned guard across every await of the unit of
//! work, so no interleaving is possible.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of async mutexes keyed by UUID
///
/// Entries only live while someone holds or awaits them.
#[derive(Default)]
pub struct BuddyLocks {
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

/// Exclusive access to one key; the registry entry is dropped with the last holder
pub struct BuddyLockGuard<'a> {
    locks: &'a BuddyLocks,
    id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for BuddyLockGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so our own Arc no longer counts
        drop(self.guard.take());
        self.locks.release_idle(self.id);
    }
}

impl BuddyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`
    pub async fn acquire(&self, id: Uuid) -> BuddyLockGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(id).or_default().clone()
        };
        let guard = lock.lock_owned().await;
        BuddyLockGuard {
            locks: self,
            id,
            guard: Some(guard),
        }
    }

    /// Drop the entry for `id` when nobody holds or awaits it
    fn release_idle(&self, id: Uuid) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(lock) = locks.get(&id) {
            if Arc::strong_count(lock) == 1 {
                locks.remove(&id);
            }
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
