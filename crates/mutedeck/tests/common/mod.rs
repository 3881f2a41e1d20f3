#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use mutedeck::enostr::{FullKeypair, Pubkey};
use mutedeck::notifications::{
    FolloweeSet, MemoryDeletionIndex, MemoryProfileCache, NotificationBackend,
    NotificationSettings, NotificationSources, Permission,
};
use mutedeck::{KeypairCipher, MemoryRelay, MuteOptions, Session};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests (only runs once even if called multiple times)
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("mutedeck=debug".parse().unwrap()),
            )
            .with_test_writer()
            .init();
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub title: String,
    pub icon: Option<String>,
    pub body: String,
}

/// Records notifications instead of showing them.
pub struct RecordingBackend {
    pub permission: Mutex<Permission>,
    pub sent: Mutex<Vec<Sent>>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            permission: Mutex::new(Permission::Granted),
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingBackend {
    pub fn bodies(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.body.clone())
            .collect()
    }

    pub fn set_permission(&self, permission: Permission) {
        *self.permission.lock().unwrap() = permission;
    }
}

impl NotificationBackend for RecordingBackend {
    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap()
    }

    fn send_notification(&self, title: &str, icon: Option<&str>, body: &str) {
        self.sent.lock().unwrap().push(Sent {
            title: title.to_string(),
            icon: icon.map(str::to_string),
            body: body.to_string(),
        });
    }
}

pub type TestSession = Session<Arc<MemoryRelay>, KeypairCipher, Arc<RecordingBackend>>;

pub struct Harness {
    pub owner: Pubkey,
    pub relay: Arc<MemoryRelay>,
    pub backend: Arc<RecordingBackend>,
    pub profiles: Arc<MemoryProfileCache>,
    pub deletions: Arc<MemoryDeletionIndex>,
    pub followees: Arc<FolloweeSet>,
    pub session: TestSession,
}

pub fn harness(options: MuteOptions, settings: NotificationSettings) -> Harness {
    init_tracing();

    let keypair = FullKeypair::generate();
    let owner = keypair.pubkey;
    let relay = Arc::new(MemoryRelay::new(owner));
    let backend = Arc::new(RecordingBackend::default());
    let profiles = Arc::new(MemoryProfileCache::default());
    let deletions = Arc::new(MemoryDeletionIndex::default());
    let followees = Arc::new(FolloweeSet::default());

    let sources = NotificationSources {
        profiles: profiles.clone(),
        deletions: deletions.clone(),
        social_graph: followees.clone(),
    };

    let session = Session::sign_in(
        owner,
        relay.clone(),
        KeypairCipher::new(keypair),
        options,
        sources,
        settings,
        backend.clone(),
    );

    Harness {
        owner,
        relay,
        backend,
        profiles,
        deletions,
        followees,
        session,
    }
}
