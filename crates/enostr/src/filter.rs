use serde::{Deserialize, Serialize};

use crate::{Note, Pubkey};

/// NIP-01 subscription filter.
///
/// Built the same way as nostrdb filters:
/// `Filter::new().authors([pk]).kinds([10000]).limit(1).build()`
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Default)]
pub struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    authors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kinds: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    since: Option<u64>, // unix timestamp seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    until: Option<u64>, // unix timestamp seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u16>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authors<'a>(mut self, authors: impl IntoIterator<Item = &'a Pubkey>) -> Self {
        self.authors = Some(authors.into_iter().map(Pubkey::hex).collect());
        self
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = u64>) -> Self {
        self.kinds = Some(kinds.into_iter().collect());
        self
    }

    pub fn since(mut self, since: u64) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: u64) -> Self {
        self.until = Some(until);
        self
    }

    pub fn limit(mut self, limit: u16) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> Self {
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Does `note` satisfy every constraint of this filter? `limit` only
    /// applies to result sets and is ignored here.
    pub fn matches(&self, note: &Note) -> bool {
        if let Some(authors) = &self.authors {
            if !authors.contains(&note.pubkey.hex()) {
                return false;
            }
        }

        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&note.kind) {
                return false;
            }
        }

        if self.since.is_some_and(|since| note.created_at < since) {
            return false;
        }

        if self.until.is_some_and(|until| note.created_at > until) {
            return false;
        }

        true
    }
}
