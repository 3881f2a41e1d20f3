use std::array::TryFromSliceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("hex decoding failed")]
    HexDecodeFailed,

    #[error("invalid bech32")]
    InvalidBech32,

    #[error("invalid byte size")]
    InvalidByteSize,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("missing secret key")]
    MissingSecretKey,

    #[error("nip44 error: {0}")]
    Nip44(#[from] nostr::nips::nip44::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<TryFromSliceError> for Error {
    fn from(_e: TryFromSliceError) -> Self {
        Error::InvalidByteSize
    }
}

impl From<hex::FromHexError> for Error {
    fn from(_e: hex::FromHexError) -> Self {
        Error::HexDecodeFailed
    }
}
