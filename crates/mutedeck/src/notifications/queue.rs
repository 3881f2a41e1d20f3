use enostr::{Note, Pubkey};
use hashbrown::HashMap;
use tracing::{debug, info};

use super::backend::NotificationBackend;
use super::gate::NotificationGate;
use super::types::{Delivery, Metadata};

/// Holds notifications back until their author's metadata is known.
///
/// Owned by the session: created at sign in, cleared at sign out.
pub struct NotificationQueue<B> {
    gate: NotificationGate<B>,
    /// Per author, in arrival order, unique by event id
    pending: HashMap<Pubkey, Vec<Note>>,
}

impl<B: NotificationBackend> NotificationQueue<B> {
    pub fn new(gate: NotificationGate<B>) -> Self {
        Self {
            gate,
            pending: HashMap::new(),
        }
    }

    pub fn gate(&self) -> &NotificationGate<B> {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut NotificationGate<B> {
        &mut self.gate
    }

    /// Deliver now if the author's metadata is cached, otherwise queue.
    ///
    /// Anything still queued for the author goes out first, so a profile that
    /// reached the cache without a [`Self::dequeue`] call doesn't strand
    /// older events. Returns nothing when the event was queued.
    pub fn notify(&mut self, event: Note) -> Vec<Delivery> {
        if !self.gate.has_metadata(&event.pubkey) {
            self.enqueue(event);
            return Vec::new();
        }

        let backlog = self.pending.remove(&event.pubkey).unwrap_or_default();
        if !backlog.is_empty() {
            debug!(
                "flushing {} queued notifications for {} ahead of {}",
                backlog.len(),
                event.pubkey,
                event.id
            );
        }

        let already_queued = backlog.iter().any(|e| e.id == event.id);
        let mut deliveries: Vec<Delivery> =
            backlog.iter().map(|e| self.gate.send(e)).collect();
        if !already_queued {
            deliveries.push(self.gate.send(&event));
        }
        deliveries
    }

    /// Queue `event` for its author. Returns false if an event with the same
    /// id was already waiting.
    pub fn enqueue(&mut self, event: Note) -> bool {
        let unsent = self.pending.entry(event.pubkey).or_default();
        if unsent.iter().any(|e| e.id == event.id) {
            debug!("notification {} already queued", event.id);
            return false;
        }

        debug!("queueing notification {} until {} resolves", event.id, event.pubkey);
        unsent.push(event);
        true
    }

    /// Metadata for `metadata.pubkey` arrived: deliver everything queued for
    /// that author, oldest first, and forget it.
    ///
    /// Delivery uses `metadata` itself, so it works even before the host has
    /// written the profile into its cache.
    pub fn dequeue(&mut self, metadata: &Metadata) -> Vec<Delivery> {
        let Some(unsent) = self.pending.remove(&metadata.pubkey) else {
            return Vec::new();
        };

        debug!("draining {} notifications for {}", unsent.len(), metadata.pubkey);
        unsent
            .iter()
            .map(|event| self.gate.send_with_profile(event, &metadata.profile))
            .collect()
    }

    pub fn pending_for(&self, author: &Pubkey) -> &[Note] {
        self.pending.get(author).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of queued events across authors.
    pub fn pending_len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    /// Forget every queued notification.
    pub fn clear(&mut self) {
        let dropped = self.pending_len();
        self.pending.clear();
        info!("cleared {dropped} pending notifications");
    }
}
