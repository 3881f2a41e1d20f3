use crate::{Error, Pubkey};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Event kinds this crate knows by name.
pub mod kind {
    pub const METADATA: u64 = 0;
    pub const TEXT_NOTE: u64 = 1;
    pub const DELETION: u64 = 5;
    pub const REPOST: u64 = 6;
    pub const REACTION: u64 = 7;
    pub const ZAP_RECEIPT: u64 = 9735;
    /// NIP-51 mute list, a replaceable event
    pub const MUTE_LIST: u64 = 10000;
}

#[derive(Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NoteId([u8; 32]);

impl fmt::Debug for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl NoteId {
    pub fn new(bytes: [u8; 32]) -> Self {
        NoteId(bytes)
    }

    pub fn bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn hex(&self) -> String {
        hex::encode(self.bytes())
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, Error> {
        Ok(NoteId(hex::decode(hex_str)?.as_slice().try_into()?))
    }

    /// NIP-01 event id: sha256 of `[0, pubkey, created_at, kind, tags, content]`
    pub fn compute(
        pubkey: &Pubkey,
        created_at: u64,
        kind: u64,
        tags: &[Vec<String>],
        content: &str,
    ) -> Self {
        let commitment = serde_json::json!([0, pubkey.hex(), created_at, kind, tags, content]);
        let digest = Sha256::digest(commitment.to_string().as_bytes());
        NoteId(digest.into())
    }
}

/// A nostr event as it travels over the wire
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Note {
    /// 32-bytes sha256 of the the serialized event data
    pub id: NoteId,
    /// 32-bytes hex-encoded public key of the event creator
    pub pubkey: Pubkey,
    /// unix timestamp in seconds
    pub created_at: u64,
    pub kind: u64,
    pub tags: Vec<Vec<String>>,
    /// arbitrary string
    pub content: String,
    /// 64-bytes signature of the sha256 hash of the serialized event data
    #[serde(default)]
    pub sig: String,
}

impl Hash for Note {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.0.hash(state);
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Note {}

impl Note {
    /// Build an unsigned note with its canonical id filled in. Signing is left
    /// to whoever publishes it.
    pub fn unsigned(
        pubkey: Pubkey,
        created_at: u64,
        kind: u64,
        tags: Vec<Vec<String>>,
        content: impl Into<String>,
    ) -> Self {
        let content = content.into();
        let id = NoteId::compute(&pubkey, created_at, kind, &tags, &content);
        Note {
            id,
            pubkey,
            created_at,
            kind,
            tags,
            content,
            sig: String::new(),
        }
    }

    pub fn from_json(s: &str) -> Result<Self, Error> {
        serde_json::from_str(s).map_err(Into::into)
    }

    /// Values at position 1 of every tag named `name`
    pub fn tag_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |tag| tag.first().map(String::as_str) == Some(name))
            .filter_map(|tag| tag.get(1).map(String::as_str))
    }
}

impl Serialize for NoteId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.hex())
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NoteId::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
