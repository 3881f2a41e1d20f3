mod editor;
mod state;
mod store;
mod tag;

pub use editor::{EditOutcome, MuteListEditor};
pub use state::MuteState;
pub use store::{DecodeFailure, MuteList, MuteListStore, PrivateTags};
pub use tag::{parse_tags, to_tuples, MuteCategory, MuteTag};
