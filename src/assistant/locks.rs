use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// One async mutex per user id, so turns for the same user never interleave.
#[derive(Default)]
pub struct TurnLocks {
    locks: Mutex<BTreeMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl TurnLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_user(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut guard = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard
            .entry(user_id.to_owned())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Drop the user's entry unless someone besides `held` still refers to it.
    ///
    /// `held` is the caller's own handle from [`Self::for_user`]; waiters on
    /// the same user keep the entry alive.
    pub fn release(&self, user_id: &str, held: &Arc<tokio::sync::Mutex<()>>) {
        let mut guard = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let Some(entry) = guard.get(user_id) else {
            return;
        };
        if Arc::ptr_eq(entry, held) && Arc::strong_count(entry) <= 2 {
            guard.remove(user_id);
        }
    }

    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
