use std::fmt;

use enostr::Pubkey;
use tracing::warn;

use crate::{Error, Result};

/// What a mute tag refers to, keyed by the tag name on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MuteCategory {
    /// `["word", "<string>"]`
    Word,
    /// `["p", "<pubkey hex>", ...]`
    Pubkey,
    /// `["e", "<event id hex>", ...]`, a muted thread
    EventId,
    /// `["t", "<hashtag>"]`
    Hashtag,
    /// Anything else. Carried through edits untouched and never matched.
    Other(String),
}

impl MuteCategory {
    pub fn from_tag_name(name: &str) -> Self {
        match name {
            "word" => MuteCategory::Word,
            "p" => MuteCategory::Pubkey,
            "e" => MuteCategory::EventId,
            "t" => MuteCategory::Hashtag,
            other => MuteCategory::Other(other.to_owned()),
        }
    }

    pub fn tag_name(&self) -> &str {
        match self {
            MuteCategory::Word => "word",
            MuteCategory::Pubkey => "p",
            MuteCategory::EventId => "e",
            MuteCategory::Hashtag => "t",
            MuteCategory::Other(name) => name,
        }
    }
}

impl fmt::Display for MuteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// One entry of a mute list. Category always comes first on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuteTag {
    pub category: MuteCategory,
    pub value: String,
    /// Trailing tuple elements such as relay hints, preserved verbatim.
    pub extra: Vec<String>,
}

impl MuteTag {
    pub fn new(category: MuteCategory, value: impl Into<String>) -> Self {
        Self {
            category,
            value: value.into(),
            extra: Vec::new(),
        }
    }

    pub fn word(word: impl Into<String>) -> Self {
        Self::new(MuteCategory::Word, word)
    }

    pub fn pubkey(pk: &Pubkey) -> Self {
        Self::new(MuteCategory::Pubkey, pk.hex())
    }

    /// Parse a `[category, value, ...]` tuple.
    pub fn parse(tuple: &[String]) -> Result<Self> {
        match tuple {
            [name, value, extra @ ..] if !name.is_empty() => Ok(Self {
                category: MuteCategory::from_tag_name(name),
                value: value.clone(),
                extra: extra.to_vec(),
            }),
            _ => Err(Error::MalformedTag(tuple.to_vec())),
        }
    }

    pub fn to_tuple(&self) -> Vec<String> {
        let mut tuple = Vec::with_capacity(2 + self.extra.len());
        tuple.push(self.category.tag_name().to_owned());
        tuple.push(self.value.clone());
        tuple.extend(self.extra.iter().cloned());
        tuple
    }

    /// Identity of a mute entry: category and value, ignoring extras.
    pub fn is(&self, category: &MuteCategory, value: &str) -> bool {
        self.category == *category && self.value == value
    }
}

/// Parse wire tuples, dropping (and reporting) malformed ones.
pub fn parse_tags(tuples: &[Vec<String>]) -> Vec<MuteTag> {
    tuples
        .iter()
        .filter_map(|tuple| match MuteTag::parse(tuple) {
            Ok(tag) => Some(tag),
            Err(e) => {
                warn!("mute list: rejecting tag: {e}");
                None
            }
        })
        .collect()
}

pub fn to_tuples(tags: &[MuteTag]) -> Vec<Vec<String>> {
    tags.iter().map(MuteTag::to_tuple).collect()
}
