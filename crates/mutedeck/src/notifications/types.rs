//! Core types for the notification system.

use enostr::{kind, Note, ProfileState, Pubkey};
use serde::{Deserialize, Serialize};

use crate::MuteReason;

/// Cached profile information for notification display.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct CachedProfile {
    /// Display name (prefers display_name over name)
    pub name: Option<String>,
    /// Profile picture URL
    pub picture_url: Option<String>,
}

impl CachedProfile {
    pub fn from_profile_state(profile: &ProfileState) -> Self {
        let name = profile
            .display_name()
            .filter(|n| !n.is_empty())
            .or_else(|| profile.name())
            .map(str::to_owned);

        Self {
            name,
            picture_url: profile.picture().map(str::to_owned),
        }
    }
}

/// Author metadata that just became available, from a kind-0 event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    pub pubkey: Pubkey,
    pub profile: CachedProfile,
}

impl Metadata {
    pub fn new(pubkey: Pubkey, profile: CachedProfile) -> Self {
        Self { pubkey, profile }
    }

    /// `None` if `note` isn't a metadata event.
    pub fn from_note(note: &Note) -> Option<Self> {
        if note.kind != kind::METADATA {
            return None;
        }

        let profile = ProfileState::from_note_contents(&note.content);
        Some(Self::new(
            note.pubkey,
            CachedProfile::from_profile_state(&profile),
        ))
    }
}

/// User preferences consulted by the notification gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Suppress authors outside the followees-of-followees allowlist
    pub mute_automatically: bool,
}

impl NotificationSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Why an event was not turned into a notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SuppressReason {
    Muted(MuteReason),
    Deleted,
    OutsideSocialGraph,
}

/// Deliver-or-suppress verdict for a single event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Deliver,
    Suppress(SuppressReason),
}

/// What happened when an event went through the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the platform backend
    Delivered,
    Suppressed(SuppressReason),
    /// No notification body exists for this kind
    Unsupported(u64),
    /// Author metadata wasn't resolved. A caller bug.
    MissingMetadata,
    /// Permission not granted or no notification support on this platform
    Unavailable,
}
