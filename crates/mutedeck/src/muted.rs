use enostr::{Note, NoteId, Pubkey};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::mute::{MuteCategory, MuteTag};
use crate::MuteCategories;

/// Why a note was considered muted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MuteReason {
    Word(String),
    Pubkey(Pubkey),
    EventId(NoteId),
    Hashtag(String),
}

/// Derived mute state, rebuilt wholesale from each observed mute list.
#[derive(Clone, Default)]
pub struct Muted {
    pub pubkeys: BTreeSet<Pubkey>,
    pub hashtags: BTreeSet<String>,
    pub words: BTreeSet<String>,
    pub event_ids: BTreeSet<NoteId>,
    /// Categories that take part in [`Muted::is_muted`]
    pub categories: MuteCategories,
}

impl std::fmt::Debug for Muted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Muted")
            .field(
                "pubkeys",
                &self.pubkeys.iter().map(Pubkey::hex).collect::<Vec<_>>(),
            )
            .field("hashtags", &self.hashtags)
            .field("words", &self.words)
            .field(
                "event_ids",
                &self.event_ids.iter().map(NoteId::hex).collect::<Vec<_>>(),
            )
            .field("categories", &self.categories)
            .finish()
    }
}

impl Muted {
    pub fn empty(categories: MuteCategories) -> Self {
        Self {
            categories,
            ..Default::default()
        }
    }

    /// Harvest every category, regardless of which ones are enabled.
    pub fn from_tags<'a>(
        tags: impl IntoIterator<Item = &'a MuteTag>,
        categories: MuteCategories,
    ) -> Self {
        let mut muted = Muted::empty(categories);
        for tag in tags {
            match &tag.category {
                MuteCategory::Word => {
                    muted.words.insert(tag.value.clone());
                }
                MuteCategory::Hashtag => {
                    muted.hashtags.insert(tag.value.to_lowercase());
                }
                MuteCategory::Pubkey => match Pubkey::parse(&tag.value) {
                    Ok(pk) => {
                        muted.pubkeys.insert(pk);
                    }
                    Err(e) => warn!("mute list: bad pubkey '{}': {e}", tag.value),
                },
                MuteCategory::EventId => match NoteId::from_hex(&tag.value) {
                    Ok(id) => {
                        muted.event_ids.insert(id);
                    }
                    Err(e) => warn!("mute list: bad event id '{}': {e}", tag.value),
                },
                MuteCategory::Other(name) => {
                    debug!("mute list: ignoring '{name}' tag");
                }
            }
        }
        muted
    }

    pub fn is_empty(&self) -> bool {
        self.pubkeys.is_empty()
            && self.hashtags.is_empty()
            && self.words.is_empty()
            && self.event_ids.is_empty()
    }

    /// If the note is muted by an enabled category, return the reason.
    pub fn is_muted(&self, note: &Note) -> Option<MuteReason> {
        if self.categories.contains(MuteCategories::PUBKEY) && self.pubkeys.contains(&note.pubkey)
        {
            return Some(MuteReason::Pubkey(note.pubkey));
        }

        if self.categories.contains(MuteCategories::EVENT_ID) {
            if self.event_ids.contains(&note.id) {
                return Some(MuteReason::EventId(note.id));
            }

            // muted threads
            for e in note.tag_values("e") {
                if let Ok(id) = NoteId::from_hex(e) {
                    if self.event_ids.contains(&id) {
                        return Some(MuteReason::EventId(id));
                    }
                }
            }
        }

        if self.categories.contains(MuteCategories::HASHTAG) {
            for t in note.tag_values("t") {
                let t = t.to_lowercase();
                if self.hashtags.contains(&t) {
                    return Some(MuteReason::Hashtag(t));
                }
            }
        }

        if self.categories.contains(MuteCategories::WORD) && !self.words.is_empty() {
            let haystack = WordHaystack::new(&note.content);
            if let Some(word) = self.words.iter().find(|w| haystack.contains(w)) {
                return Some(MuteReason::Word(word.clone()));
            }
        }

        None
    }
}

fn tokens(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Note content prepared for muted-word lookups.
///
/// A muted word matches a contiguous run of whole tokens, case-insensitively,
/// so "cat" mutes "Cat pictures" but not "concatenate". Words without any
/// alphanumeric token (emoji, punctuation) fall back to substring matching.
struct WordHaystack {
    lowered: String,
    tokens: Vec<String>,
}

impl WordHaystack {
    fn new(content: &str) -> Self {
        Self {
            lowered: content.to_lowercase(),
            tokens: tokens(content),
        }
    }

    fn contains(&self, word: &str) -> bool {
        let needle = tokens(word);
        if needle.is_empty() {
            let word = word.trim().to_lowercase();
            return !word.is_empty() && self.lowered.contains(&word);
        }

        self.tokens
            .windows(needle.len())
            .any(|window| window == needle.as_slice())
    }
}
