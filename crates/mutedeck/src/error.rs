use enostr::Pubkey;

/// Errors surfaced to callers of the mute list editor.
///
/// Private tag decode failures never show up here, they are reported through
/// [`crate::PrivateTags::Failed`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("relay error: {0}")]
    Relay(String),

    #[error("nostr error: {0}")]
    Nostr(#[from] enostr::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cipher holds keys for {held}, not {requested}")]
    NotOwner { held: Pubkey, requested: Pubkey },

    #[error("malformed tag: {0:?}")]
    MalformedTag(Vec<String>),
}

impl Error {
    pub fn relay(msg: impl Into<String>) -> Self {
        Error::Relay(msg.into())
    }
}
