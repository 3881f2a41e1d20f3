use std::sync::Arc;

use enostr::{kind, Filter, Note, Pubkey};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::state::MuteState;
use super::store::{MuteList, MuteListStore};
use super::tag::{MuteCategory, MuteTag};
use crate::{MuteOptions, Muted, RelayApi, Result, SelfCipher};

/// What an edit ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// A replacement mute list was published
    Published,
    /// The entry was already muted, nothing was published
    AlreadyMuted,
    /// There was no mute list to remove from, nothing was published
    NoMuteList,
}

/// Edits the owner's NIP-51 mute list (kind 10000).
///
/// Every edit fetches the latest document, decrypts its private tags,
/// applies the change and republishes the whole list. Edits are serialized
/// so two concurrent edits can't both start from the same base document.
pub struct MuteListEditor<R, C> {
    owner: Pubkey,
    relay: R,
    store: MuteListStore<C>,
    state: MuteState,
    edit_lock: Mutex<()>,
}

impl<R: RelayApi, C: SelfCipher> MuteListEditor<R, C> {
    pub fn new(owner: Pubkey, relay: R, cipher: C, options: MuteOptions) -> Self {
        Self {
            owner,
            relay,
            store: MuteListStore::new(cipher),
            state: MuteState::new(options.categories),
            edit_lock: Mutex::new(()),
        }
    }

    pub fn owner(&self) -> &Pubkey {
        &self.owner
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    pub fn store(&self) -> &MuteListStore<C> {
        &self.store
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Muted>> {
        self.state.subscribe()
    }

    pub fn muted(&self) -> Arc<Muted> {
        self.state.current()
    }

    fn filter(&self) -> Filter {
        Filter::new()
            .authors([&self.owner])
            .kinds([kind::MUTE_LIST])
            .limit(1)
            .build()
    }

    async fn fetch_latest(&self) -> Result<Option<Note>> {
        let note = self.relay.fetch_event(&self.filter()).await?;
        debug!(
            "mute list for {}: {:?}",
            self.owner,
            note.as_ref().map(|n| (n.id, n.created_at))
        );
        Ok(note)
    }

    /// Fetch and decode the current mute list, if one exists.
    pub async fn fetch(&self) -> Result<Option<MuteList>> {
        Ok(self.fetch_latest().await?.map(|note| self.store.load(&note)))
    }

    async fn publish(&self, list: &MuteList) -> Result<()> {
        let content = self
            .store
            .encrypt_private_tags(&self.owner, &list.private_tags)?;

        info!(
            "publishing mute list for {}: {} public, {} private",
            self.owner,
            list.public_tags.len(),
            list.private_tags.len()
        );

        let published = self
            .relay
            .sign_and_publish(kind::MUTE_LIST, content, list.public_tuples())
            .await?;

        let muted = Muted::from_tags(list.effective_tags(), self.state.categories());
        if !self.state.apply(muted, published.created_at) {
            warn!(
                "published mute list {} is older than the applied state",
                published.id
            );
        }
        Ok(())
    }

    /// Privately mute `tag`. No-op if an entry with the same category and
    /// value is already public or private.
    pub async fn add(&self, tag: MuteTag) -> Result<EditOutcome> {
        let _guard = self.edit_lock.lock().await;

        let mut list = match self.fetch_latest().await? {
            Some(note) => self.store.load(&note),
            None => MuteList::empty(self.owner),
        };

        if list.contains(&tag.category, &tag.value) {
            debug!("already muted {}:{}", tag.category, tag.value);
            return Ok(EditOutcome::AlreadyMuted);
        }

        list.private_tags.push(tag);
        self.publish(&list).await?;
        Ok(EditOutcome::Published)
    }

    /// Remove every entry with this category and value from both the public
    /// and private tags.
    ///
    /// Republishes even if nothing matched, so a list whose private section
    /// could not be read still gets rewritten in a readable form.
    pub async fn remove(&self, category: &MuteCategory, value: &str) -> Result<EditOutcome> {
        let _guard = self.edit_lock.lock().await;

        let Some(note) = self.fetch_latest().await? else {
            debug!("no mute list, nothing to unmute for {category}:{value}");
            return Ok(EditOutcome::NoMuteList);
        };

        let mut list = self.store.load(&note);
        list.public_tags.retain(|t| !t.is(category, value));
        list.private_tags.retain(|t| !t.is(category, value));

        self.publish(&list).await?;
        Ok(EditOutcome::Published)
    }

    pub async fn add_word(&self, word: &str) -> Result<EditOutcome> {
        self.add(MuteTag::word(word)).await
    }

    pub async fn remove_word(&self, word: &str) -> Result<EditOutcome> {
        self.remove(&MuteCategory::Word, word).await
    }

    pub async fn add_pubkey(&self, pk: &Pubkey) -> Result<EditOutcome> {
        self.add(MuteTag::pubkey(pk)).await
    }

    pub async fn remove_pubkey(&self, pk: &Pubkey) -> Result<EditOutcome> {
        self.remove(&MuteCategory::Pubkey, &pk.hex()).await
    }

    /// Rebuild the derived mute state from an observed mute list.
    ///
    /// Only the owner's own kind 10000 documents are accepted, and a
    /// document older than one already applied is ignored. Returns whether
    /// the state changed.
    pub fn apply_remote_update(&self, note: &Note) -> bool {
        if note.kind != kind::MUTE_LIST || note.pubkey != self.owner {
            warn!(
                "ignoring mute list update kind {} from {} (owner {})",
                note.kind, note.pubkey, self.owner
            );
            return false;
        }

        let list = self.store.load(note);
        let muted = Muted::from_tags(list.effective_tags(), self.state.categories());
        debug!("mute lists {:?}", muted);

        self.state.apply(muted, note.created_at)
    }

    /// Drop all derived mute state.
    pub fn reset(&self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeypairCipher, MemoryRelay, MuteCategories};
    use enostr::FullKeypair;

    fn editor() -> MuteListEditor<Arc<MemoryRelay>, KeypairCipher> {
        let kp = FullKeypair::generate();
        let relay = Arc::new(MemoryRelay::new(kp.pubkey));
        MuteListEditor::new(
            kp.pubkey,
            relay,
            KeypairCipher::new(kp),
            MuteOptions::default(),
        )
    }

    fn published(editor: &MuteListEditor<Arc<MemoryRelay>, KeypairCipher>) -> Note {
        editor
            .relay()
            .latest(kind::MUTE_LIST, editor.owner())
            .expect("published mute list")
    }

    #[tokio::test]
    async fn add_word_is_idempotent() {
        let editor = editor();
        assert_eq!(editor.add_word("spoilers").await.unwrap(), EditOutcome::Published);
        assert_eq!(editor.add_word("spoilers").await.unwrap(), EditOutcome::AlreadyMuted);
        assert_eq!(editor.relay().publish_count(), 1);
    }

    #[tokio::test]
    async fn added_words_are_private() {
        let editor = editor();
        editor.add_word("spoilers").await.unwrap();

        let note = published(&editor);
        assert!(note.tags.is_empty());
        assert!(!note.content.is_empty());
        assert!(!note.content.contains("spoilers"));

        let list = editor.store().load(&note);
        assert_eq!(list.private_tags, vec![MuteTag::word("spoilers")]);
    }

    #[tokio::test]
    async fn public_word_counts_as_already_muted() {
        let editor = editor();
        editor.relay().insert(Note::unsigned(
            *editor.owner(),
            1,
            kind::MUTE_LIST,
            vec![vec!["word".to_string(), "public".to_string()]],
            "",
        ));

        assert_eq!(editor.add_word("public").await.unwrap(), EditOutcome::AlreadyMuted);
        assert_eq!(editor.relay().publish_count(), 0);
    }

    #[tokio::test]
    async fn remove_without_list_is_a_noop() {
        let editor = editor();
        assert_eq!(editor.remove_word("x").await.unwrap(), EditOutcome::NoMuteList);
        assert_eq!(editor.relay().publish_count(), 0);
    }

    #[tokio::test]
    async fn remove_strips_public_and_private_copies() {
        let editor = editor();
        let content = editor
            .store()
            .encrypt_private_tags(
                editor.owner(),
                &[MuteTag::word("dup"), MuteTag::word("keep")],
            )
            .unwrap();
        editor.relay().insert(Note::unsigned(
            *editor.owner(),
            1,
            kind::MUTE_LIST,
            vec![
                vec!["word".to_string(), "dup".to_string()],
                vec!["t".to_string(), "dup".to_string()],
            ],
            content,
        ));

        editor.remove_word("dup").await.unwrap();

        let list = editor.store().load(&published(&editor));
        assert_eq!(list.public_tags, vec![MuteTag::new(MuteCategory::Hashtag, "dup")]);
        assert_eq!(list.private_tags, vec![MuteTag::word("keep")]);
    }

    #[tokio::test]
    async fn removing_last_private_tag_publishes_empty_content() {
        let editor = editor();
        editor.add_word("only").await.unwrap();
        editor.remove_word("only").await.unwrap();

        let note = published(&editor);
        assert_eq!(note.content, "");
        assert_eq!(editor.relay().publish_count(), 2);
    }

    #[tokio::test]
    async fn remove_republishes_even_when_absent() {
        let editor = editor();
        editor.add_word("a").await.unwrap();
        assert_eq!(editor.remove_word("b").await.unwrap(), EditOutcome::Published);
        assert_eq!(editor.relay().publish_count(), 2);
    }

    #[tokio::test]
    async fn unreadable_private_section_is_replaced() {
        let editor = editor();
        editor.relay().insert(Note::unsigned(
            *editor.owner(),
            1,
            kind::MUTE_LIST,
            vec![],
            "garbage",
        ));

        assert_eq!(editor.add_word("w").await.unwrap(), EditOutcome::Published);
        let list = editor.store().load(&published(&editor));
        assert_eq!(list.private_tags, vec![MuteTag::word("w")]);
    }

    #[tokio::test]
    async fn publish_failure_propagates_and_keeps_state() {
        let editor = editor();
        editor.relay().fail_next_publish();
        assert!(editor.add_word("w").await.is_err());
        assert!(editor.muted().is_empty());
    }

    #[tokio::test]
    async fn concurrent_adds_do_not_lose_entries() {
        let editor = editor();
        let (a, b) = tokio::join!(editor.add_word("a"), editor.add_word("b"));
        a.unwrap();
        b.unwrap();

        let list = editor.store().load(&published(&editor));
        assert!(list.contains(&MuteCategory::Word, "a"));
        assert!(list.contains(&MuteCategory::Word, "b"));
    }

    #[tokio::test]
    async fn remote_update_rebuilds_state() {
        let editor = editor();
        let content = editor
            .store()
            .encrypt_private_tags(editor.owner(), &[MuteTag::word("private")])
            .unwrap();
        let note = Note::unsigned(
            *editor.owner(),
            5,
            kind::MUTE_LIST,
            vec![vec!["word".to_string(), "public".to_string()]],
            content,
        );

        let rx = editor.subscribe();
        assert!(editor.apply_remote_update(&note));

        let muted = rx.borrow().clone();
        assert!(muted.words.contains("public"));
        assert!(muted.words.contains("private"));
        assert_eq!(muted.categories, MuteCategories::WORD);
    }

    #[tokio::test]
    async fn remote_update_from_someone_else_is_ignored() {
        let editor = editor();
        let stranger = FullKeypair::generate().pubkey;
        let note = Note::unsigned(
            stranger,
            5,
            kind::MUTE_LIST,
            vec![vec!["word".to_string(), "x".to_string()]],
            "",
        );
        assert!(!editor.apply_remote_update(&note));
        assert!(editor.muted().is_empty());
    }

    #[tokio::test]
    async fn stale_remote_update_does_not_undo_own_publish() {
        let editor = editor();
        let old = Note::unsigned(
            *editor.owner(),
            5,
            kind::MUTE_LIST,
            vec![vec!["word".to_string(), "x".to_string()]],
            "",
        );
        editor.relay().insert(old.clone());

        editor.add_word("a").await.unwrap();
        let own = published(&editor);
        assert!(own.created_at > old.created_at);

        assert!(!editor.apply_remote_update(&old));
        let muted = editor.muted();
        assert!(muted.words.contains("a"));
        assert!(muted.words.contains("x"));

        // the relay echoing our own document back is harmless
        assert!(editor.apply_remote_update(&own));
        assert!(editor.muted().words.contains("a"));
    }
}
