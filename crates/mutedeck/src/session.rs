use enostr::{kind, Note, Pubkey};
use tracing::{debug, info};

use crate::notifications::{
    Delivery, Metadata, NotificationBackend, NotificationGate, NotificationQueue,
    NotificationSettings, NotificationSources,
};
use crate::{MuteListEditor, MuteOptions, RelayApi, SelfCipher};

/// Per-account state: the mute list editor and the notification queue
/// that reads its mute state.
pub struct Session<R, C, B> {
    editor: MuteListEditor<R, C>,
    notifications: NotificationQueue<B>,
}

impl<R, C, B> Session<R, C, B>
where
    R: RelayApi,
    C: SelfCipher,
    B: NotificationBackend,
{
    pub fn sign_in(
        owner: Pubkey,
        relay: R,
        cipher: C,
        options: MuteOptions,
        sources: NotificationSources,
        settings: NotificationSettings,
        backend: B,
    ) -> Self {
        let editor = MuteListEditor::new(owner, relay, cipher, options);
        let gate = NotificationGate::new(editor.subscribe(), sources, settings, backend);
        info!("session started for {owner}");

        Self {
            editor,
            notifications: NotificationQueue::new(gate),
        }
    }

    pub fn owner(&self) -> &Pubkey {
        self.editor.owner()
    }

    pub fn editor(&self) -> &MuteListEditor<R, C> {
        &self.editor
    }

    pub fn notifications(&self) -> &NotificationQueue<B> {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationQueue<B> {
        &mut self.notifications
    }

    /// Route an event observed on our subscriptions.
    ///
    /// Our own mute list updates the mute state, metadata releases the
    /// author's queued notifications, anything else is a notification
    /// candidate.
    pub fn handle_event(&mut self, note: Note) -> Vec<Delivery> {
        match note.kind {
            kind::MUTE_LIST if note.pubkey == *self.owner() => {
                self.editor.apply_remote_update(&note);
                Vec::new()
            }
            kind::MUTE_LIST => {
                debug!("ignoring mute list from {}", note.pubkey);
                Vec::new()
            }
            kind::METADATA => match Metadata::from_note(&note) {
                Some(metadata) => self.notifications.dequeue(&metadata),
                None => Vec::new(),
            },
            _ => self.notifications.notify(note),
        }
    }

    /// Tear down: drop queued notifications and reset mute state so any
    /// lingering subscribers see an empty list.
    pub fn sign_out(mut self) {
        debug!("signing out {}", self.owner());
        self.notifications.clear();
        self.editor.reset();
        info!("session ended for {}", self.owner());
    }
}
