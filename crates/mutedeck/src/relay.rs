//! Network collaborator used by the mute list editor.
//!
//! Transport, retries and timeouts are the implementor's business. The
//! editor only needs "latest replaceable document or none" and "sign and
//! publish a replacement".

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use enostr::{Filter, Note, Pubkey};
use tracing::debug;

use crate::{Error, Result};

pub trait RelayApi: Send + Sync {
    /// Most recent document matching `filter`, or `None`.
    fn fetch_event(&self, filter: &Filter) -> impl Future<Output = Result<Option<Note>>> + Send;

    /// Sign a new document with the caller's identity and publish it.
    /// Returns the document as published.
    fn sign_and_publish(
        &self,
        kind: u64,
        content: String,
        tags: Vec<Vec<String>>,
    ) -> impl Future<Output = Result<Note>> + Send;
}

impl<T: RelayApi> RelayApi for Arc<T> {
    fn fetch_event(&self, filter: &Filter) -> impl Future<Output = Result<Option<Note>>> + Send {
        (**self).fetch_event(filter)
    }

    fn sign_and_publish(
        &self,
        kind: u64,
        content: String,
        tags: Vec<Vec<String>>,
    ) -> impl Future<Output = Result<Note>> + Send {
        (**self).sign_and_publish(kind, content, tags)
    }
}

#[derive(Default)]
struct MemoryRelayState {
    notes: Vec<Note>,
    published: usize,
    clock: u64,
    fail_next_publish: bool,
}

/// In-process replaceable document store.
///
/// Publishing replaces any previous document with the same kind and author,
/// matching how relays treat replaceable events. Useful for embedding the
/// engines without a network and for tests.
pub struct MemoryRelay {
    author: Pubkey,
    state: Mutex<MemoryRelayState>,
}

impl MemoryRelay {
    /// `author` is the identity `sign_and_publish` signs as.
    pub fn new(author: Pubkey) -> Self {
        Self {
            author,
            state: Mutex::new(MemoryRelayState::default()),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MemoryRelayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a document as if another client had published it.
    pub fn insert(&self, note: Note) {
        let mut state = self.state();
        state.clock = state.clock.max(note.created_at);
        state
            .notes
            .retain(|n| !(n.kind == note.kind && n.pubkey == note.pubkey));
        state.notes.push(note);
    }

    /// Number of successful `sign_and_publish` calls so far.
    pub fn publish_count(&self) -> usize {
        self.state().published
    }

    pub fn latest(&self, kind: u64, author: &Pubkey) -> Option<Note> {
        self.state()
            .notes
            .iter()
            .filter(|n| n.kind == kind && n.pubkey == *author)
            .max_by_key(|n| n.created_at)
            .cloned()
    }

    /// Make the next publish fail with a relay error.
    pub fn fail_next_publish(&self) {
        self.state().fail_next_publish = true;
    }
}

impl RelayApi for MemoryRelay {
    async fn fetch_event(&self, filter: &Filter) -> Result<Option<Note>> {
        let found = self
            .state()
            .notes
            .iter()
            .filter(|n| filter.matches(n))
            .max_by_key(|n| n.created_at)
            .cloned();
        debug!("memory relay fetch {:?} -> {:?}", filter, found.as_ref().map(|n| n.id));
        Ok(found)
    }

    async fn sign_and_publish(
        &self,
        kind: u64,
        content: String,
        tags: Vec<Vec<String>>,
    ) -> Result<Note> {
        let note = {
            let mut state = self.state();
            if state.fail_next_publish {
                state.fail_next_publish = false;
                return Err(Error::relay("publish rejected"));
            }
            state.clock += 1;
            state.published += 1;
            Note::unsigned(self.author, state.clock, kind, tags, content)
        };
        self.insert(note.clone());
        Ok(note)
    }
}
