mod error;
mod filter;
mod keypair;
pub mod nip44;
mod note;
mod profile;
mod pubkey;

pub use error::Error;
pub use filter::Filter;
pub use keypair::{FilledKeypair, FullKeypair, Keypair};
pub use nostr::SecretKey;
pub use note::{kind, Note, NoteId};
pub use profile::ProfileState;
pub use pubkey::Pubkey;

pub type Result<T> = std::result::Result<T, error::Error>;
