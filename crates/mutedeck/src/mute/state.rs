use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::{MuteCategories, Muted};

/// Session-owned mute state.
///
/// Each update replaces the whole [`Muted`] snapshot. Consumers hold a
/// [`watch::Receiver`] from [`MuteState::subscribe`] and read the latest
/// snapshot whenever they need it, or await `changed()` to react.
pub struct MuteState {
    tx: watch::Sender<Arc<Muted>>,
    categories: MuteCategories,
    /// created_at of the newest mute list applied so far
    newest: AtomicU64,
}

impl MuteState {
    pub fn new(categories: MuteCategories) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Muted::empty(categories)));
        Self {
            tx,
            categories,
            newest: AtomicU64::new(0),
        }
    }

    pub fn categories(&self) -> MuteCategories {
        self.categories
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Muted>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Arc<Muted> {
        self.tx.borrow().clone()
    }

    /// Replace the snapshot unless a newer document was already applied.
    /// Returns whether the snapshot was replaced.
    pub fn apply(&self, mut muted: Muted, created_at: u64) -> bool {
        let prev = self.newest.fetch_max(created_at, Ordering::SeqCst);
        if created_at < prev {
            return false;
        }
        muted.categories = self.categories;
        self.tx.send_replace(Arc::new(muted));
        true
    }

    /// Back to an empty snapshot, e.g. on sign out.
    pub fn reset(&self) {
        self.newest.store(0, Ordering::SeqCst);
        self.tx
            .send_replace(Arc::new(Muted::empty(self.categories)));
    }
}
