use bitflags::bitflags;

bitflags! {
    /// Mute categories consulted when deciding whether an event is muted.
    ///
    /// Every category is always harvested from the mute list; this only
    /// controls which ones take part in matching.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MuteCategories: u8 {
        const WORD = 1 << 0;
        const PUBKEY = 1 << 1;
        const EVENT_ID = 1 << 2;
        const HASHTAG = 1 << 3;
    }
}

impl Default for MuteCategories {
    fn default() -> Self {
        MuteCategories::WORD
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MuteOptions {
    pub categories: MuteCategories,
}

impl MuteOptions {
    pub fn with_categories(categories: MuteCategories) -> Self {
        Self { categories }
    }
}
