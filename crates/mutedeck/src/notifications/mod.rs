mod backend;
mod desktop;
mod gate;
mod queue;
mod sources;
mod types;

pub use backend::{LoggingBackend, NoopBackend, NotificationBackend, Permission};
pub use desktop::DesktopBackend;
pub use gate::{decide, render_body, NotificationGate, NotificationSources, SocialGraphPreference};
pub use queue::NotificationQueue;
pub use sources::{
    DeletionIndex, FolloweeSet, MemoryDeletionIndex, MemoryProfileCache, ProfileCache,
    SocialGraph,
};
pub use types::{
    CachedProfile, Decision, Delivery, Metadata, NotificationSettings, SuppressReason,
};
