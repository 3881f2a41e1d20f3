use enostr::{kind, Note, Pubkey};
use tracing::error;

use super::tag::{parse_tags, to_tuples, MuteCategory, MuteTag};
use crate::{Error, Result, SelfCipher};

/// A decoded mute list document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuteList {
    pub owner: Pubkey,
    /// Visible to everyone on the network
    pub public_tags: Vec<MuteTag>,
    /// Recovered from the self-encrypted content
    pub private_tags: Vec<MuteTag>,
    pub created_at: u64,
}

impl MuteList {
    pub fn empty(owner: Pubkey) -> Self {
        Self {
            owner,
            public_tags: Vec::new(),
            private_tags: Vec::new(),
            created_at: 0,
        }
    }

    /// Public tags followed by private tags.
    pub fn effective_tags(&self) -> impl Iterator<Item = &MuteTag> {
        self.public_tags.iter().chain(self.private_tags.iter())
    }

    pub fn contains(&self, category: &MuteCategory, value: &str) -> bool {
        self.effective_tags().any(|t| t.is(category, value))
    }

    pub fn public_tuples(&self) -> Vec<Vec<String>> {
        to_tuples(&self.public_tags)
    }
}

/// Why the private portion of a mute list could not be read.
#[derive(Debug, thiserror::Error)]
pub enum DecodeFailure {
    #[error("decrypt failed: {0}")]
    Decrypt(Error),

    #[error("private tags are not a json tag array: {0}")]
    Json(serde_json::Error),
}

/// Outcome of reading the encrypted content of a mute list.
#[derive(Debug)]
pub enum PrivateTags {
    /// Content was the empty string
    Empty,
    /// Content decrypted and parsed, possibly to an empty sequence
    Decoded(Vec<MuteTag>),
    /// Content was present but unreadable
    Failed(DecodeFailure),
}

impl PrivateTags {
    pub fn is_failed(&self) -> bool {
        matches!(self, PrivateTags::Failed(_))
    }

    /// Best-effort tags: a failure reads as an empty sequence.
    pub fn into_tags(self) -> Vec<MuteTag> {
        match self {
            PrivateTags::Empty | PrivateTags::Failed(_) => Vec::new(),
            PrivateTags::Decoded(tags) => tags,
        }
    }
}

/// Reads and writes the encrypted half of mute list documents.
pub struct MuteListStore<C> {
    cipher: C,
}

impl<C: SelfCipher> MuteListStore<C> {
    pub fn new(cipher: C) -> Self {
        Self { cipher }
    }

    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    /// Never fails. Unreadable content is logged and reported as
    /// [`PrivateTags::Failed`].
    pub fn decrypt_private_tags(&self, owner: &Pubkey, content: &str) -> PrivateTags {
        if content.is_empty() {
            return PrivateTags::Empty;
        }

        let json = match self.cipher.decrypt(owner, content) {
            Ok(json) => json,
            Err(e) => {
                error!("mute list parse error for {owner}: {e}");
                return PrivateTags::Failed(DecodeFailure::Decrypt(e));
            }
        };

        match serde_json::from_str::<Vec<Vec<String>>>(&json) {
            Ok(tuples) => PrivateTags::Decoded(parse_tags(&tuples)),
            Err(e) => {
                error!("mute list parse error for {owner}: {e}");
                PrivateTags::Failed(DecodeFailure::Json(e))
            }
        }
    }

    /// Content for a document carrying `tags` privately. No private tags is
    /// always the empty string, never the ciphertext of `[]`.
    pub fn encrypt_private_tags(&self, owner: &Pubkey, tags: &[MuteTag]) -> Result<String> {
        if tags.is_empty() {
            return Ok(String::new());
        }

        let json = serde_json::to_string(&to_tuples(tags))?;
        self.cipher.encrypt(owner, &json)
    }

    /// Decode a mute list document. Malformed public tags are dropped and a
    /// failed private section reads as empty.
    pub fn load(&self, note: &Note) -> MuteList {
        debug_assert_eq!(note.kind, kind::MUTE_LIST);

        MuteList {
            owner: note.pubkey,
            public_tags: parse_tags(&note.tags),
            private_tags: self
                .decrypt_private_tags(&note.pubkey, &note.content)
                .into_tags(),
            created_at: note.created_at,
        }
    }
}
