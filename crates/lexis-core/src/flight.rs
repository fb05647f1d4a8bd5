use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
struct Slot {
    lock: Arc<AsyncMutex<()>>,
    /// Holders plus waiters
    users: usize,
}

type Slots = HashMap<String, Slot>;

/// Per-key single-flight gate.
///
/// Holders of the same key run one at a time; different keys never contend.
/// A slot lives only while someone holds or waits on it.
#[derive(Default)]
pub struct KeyedGate {
    slots: Mutex<Slots>,
}

/// One registered user of a slot, holder or waiter
struct Ticket<'a> {
    gate: &'a KeyedGate,
    key: String,
}

pub struct GateGuard<'a> {
    _guard: OwnedMutexGuard<()>,
    _ticket: Ticket<'a>,
}

impl KeyedGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn enter(&self, key: &str) -> GateGuard<'_> {
        let (lock, ticket) = {
            let mut slots = self.slots();
            let slot = slots.entry(key.to_string()).or_default();
            slot.users += 1;

            let ticket = Ticket {
                gate: self,
                key: key.to_string(),
            };
            (Arc::clone(&slot.lock), ticket)
        };

        // Dropping this future while waiting releases the ticket
        let guard = lock.lock_owned().await;

        GateGuard {
            _guard: guard,
            _ticket: ticket,
        }
    }

    /// Keys currently held or waited on
    pub fn in_flight(&self) -> usize {
        self.slots().len()
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        let mut slots = self.gate.slots();

        let idle = match slots.get_mut(&self.key) {
            Some(slot) => {
                slot.users = slot.users.saturating_sub(1);
                slot.users == 0
            }
            None => false,
        };

        if idle {
            slots.remove(&self.key);
        }
    }
}
