mod crypto;
mod error;
pub mod mute;
mod muted;
pub mod notifications;
mod options;
mod relay;
mod result;
mod session;

pub use crypto::{KeypairCipher, SelfCipher};
pub use error::Error;
pub use mute::{
    EditOutcome, MuteCategory, MuteList, MuteListEditor, MuteListStore, MuteTag, PrivateTags,
};
pub use muted::{MuteReason, Muted};
pub use options::{MuteCategories, MuteOptions};
pub use relay::{MemoryRelay, RelayApi};
pub use result::Result;
pub use session::Session;

// export libs
pub use enostr;
