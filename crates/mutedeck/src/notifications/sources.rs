//! Read-only collaborators consulted by the notification gate, with
//! in-memory implementations.

use std::sync::{PoisonError, RwLock};

use enostr::{kind, Note, NoteId, Pubkey};
use hashbrown::{HashMap, HashSet};
use tracing::debug;

use super::types::{CachedProfile, Metadata};

/// Author display metadata.
pub trait ProfileCache: Send + Sync {
    fn lookup(&self, author: &Pubkey) -> Option<CachedProfile>;
}

/// Event ids each author has deleted (NIP-09).
pub trait DeletionIndex: Send + Sync {
    fn is_deleted(&self, author: &Pubkey, id: &NoteId) -> bool;
}

/// The followees-of-followees allowlist.
pub trait SocialGraph: Send + Sync {
    fn contains(&self, pubkey: &Pubkey) -> bool;
}

#[derive(Default)]
pub struct MemoryProfileCache {
    profiles: RwLock<HashMap<Pubkey, CachedProfile>>,
}

impl MemoryProfileCache {
    pub fn insert(&self, metadata: &Metadata) {
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(metadata.pubkey, metadata.profile.clone());
    }
}

impl ProfileCache for MemoryProfileCache {
    fn lookup(&self, author: &Pubkey) -> Option<CachedProfile> {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(author)
            .cloned()
    }
}

#[derive(Default)]
pub struct MemoryDeletionIndex {
    deleted: RwLock<HashMap<Pubkey, HashSet<NoteId>>>,
}

impl MemoryDeletionIndex {
    pub fn insert(&self, author: Pubkey, id: NoteId) {
        self.deleted
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(author)
            .or_default()
            .insert(id);
    }

    /// Record every `e` tag of a kind-5 deletion under its author. Only the
    /// author can delete their own events, so ids are keyed by the deleter.
    pub fn apply_deletion(&self, note: &Note) {
        if note.kind != kind::DELETION {
            return;
        }

        for e in note.tag_values("e") {
            match NoteId::from_hex(e) {
                Ok(id) => self.insert(note.pubkey, id),
                Err(err) => debug!("deletion {}: bad e tag '{e}': {err}", note.id),
            }
        }
    }
}

impl DeletionIndex for MemoryDeletionIndex {
    fn is_deleted(&self, author: &Pubkey, id: &NoteId) -> bool {
        self.deleted
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(author)
            .is_some_and(|ids| ids.contains(id))
    }
}

/// A replaceable snapshot of the 2-hop followee set.
#[derive(Default)]
pub struct FolloweeSet {
    pubkeys: RwLock<HashSet<Pubkey>>,
}

impl FolloweeSet {
    pub fn new(pubkeys: impl IntoIterator<Item = Pubkey>) -> Self {
        Self {
            pubkeys: RwLock::new(pubkeys.into_iter().collect()),
        }
    }

    pub fn replace(&self, pubkeys: impl IntoIterator<Item = Pubkey>) {
        *self.pubkeys.write().unwrap_or_else(PoisonError::into_inner) =
            pubkeys.into_iter().collect();
    }

    pub fn len(&self) -> usize {
        self.pubkeys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SocialGraph for FolloweeSet {
    fn contains(&self, pubkey: &Pubkey) -> bool {
        self.pubkeys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(pubkey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletion_index_is_keyed_by_author() {
        let alice = Pubkey::new([1; 32]);
        let bob = Pubkey::new([2; 32]);
        let target = NoteId::new([9; 32]);

        let deletion = Note::unsigned(
            alice,
            1,
            kind::DELETION,
            vec![
                vec!["e".to_string(), target.hex()],
                vec!["e".to_string(), "nothex".to_string()],
            ],
            "",
        );

        let index = MemoryDeletionIndex::default();
        index.apply_deletion(&deletion);

        assert!(index.is_deleted(&alice, &target));
        assert!(!index.is_deleted(&bob, &target));
    }

    #[test]
    fn followee_set_replace() {
        let a = Pubkey::new([1; 32]);
        let b = Pubkey::new([2; 32]);
        let set = FolloweeSet::new([a]);
        assert!(set.contains(&a));
        set.replace([b]);
        assert!(!set.contains(&a));
        assert!(set.contains(&b));
        assert_eq!(set.len(), 1);
    }
}
