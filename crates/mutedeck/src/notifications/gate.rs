use std::sync::Arc;

use enostr::{kind, Note, Pubkey};
use tokio::sync::watch;
use tracing::{debug, error};

use super::backend::{NotificationBackend, Permission};
use super::sources::{DeletionIndex, ProfileCache, SocialGraph};
use super::types::{CachedProfile, Decision, Delivery, NotificationSettings, SuppressReason};
use crate::Muted;

/// The social-graph filter inputs for [`decide`].
#[derive(Clone, Copy)]
pub struct SocialGraphPreference<'a> {
    pub mute_automatically: bool,
    pub followees_of_followees: &'a dyn SocialGraph,
}

/// Deliver unless the event is muted, deleted by its author, or (with
/// `mute_automatically`) from outside the 2-hop followee allowlist. Checked
/// in that order; the first hit is the reported reason.
pub fn decide(
    event: &Note,
    muted: &Muted,
    deletions: &dyn DeletionIndex,
    social: SocialGraphPreference<'_>,
) -> Decision {
    if let Some(reason) = muted.is_muted(event) {
        return Decision::Suppress(SuppressReason::Muted(reason));
    }

    if deletions.is_deleted(&event.pubkey, &event.id) {
        return Decision::Suppress(SuppressReason::Deleted);
    }

    if social.mute_automatically && !social.followees_of_followees.contains(&event.pubkey) {
        return Decision::Suppress(SuppressReason::OutsideSocialGraph);
    }

    Decision::Deliver
}

/// Notification text for an event, or `None` for kinds we don't notify.
///
/// Reactions substitute only the first `+` and the first `-`.
pub fn render_body(event: &Note) -> Option<String> {
    match event.kind {
        kind::TEXT_NOTE => Some(event.content.clone()),
        kind::REPOST => Some("Repost".to_string()),
        kind::REACTION => Some(
            event
                .content
                .replacen('+', "Like", 1)
                .replacen('-', "Dislike", 1),
        ),
        kind::ZAP_RECEIPT => Some("Zap".to_string()),
        _ => None,
    }
}

/// Collaborators the gate reads from.
#[derive(Clone)]
pub struct NotificationSources {
    pub profiles: Arc<dyn ProfileCache>,
    pub deletions: Arc<dyn DeletionIndex>,
    pub social_graph: Arc<dyn SocialGraph>,
}

/// Decides and delivers a single notification.
pub struct NotificationGate<B> {
    muted: watch::Receiver<Arc<Muted>>,
    sources: NotificationSources,
    settings: NotificationSettings,
    backend: B,
}

impl<B: NotificationBackend> NotificationGate<B> {
    pub fn new(
        muted: watch::Receiver<Arc<Muted>>,
        sources: NotificationSources,
        settings: NotificationSettings,
        backend: B,
    ) -> Self {
        Self {
            muted,
            sources,
            settings,
            backend,
        }
    }

    pub fn settings(&self) -> NotificationSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: NotificationSettings) {
        self.settings = settings;
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn has_metadata(&self, author: &Pubkey) -> bool {
        self.sources.profiles.lookup(author).is_some()
    }

    /// Run the filters against the latest mute snapshot.
    pub fn decide(&self, event: &Note) -> Decision {
        let muted = self.muted.borrow().clone();
        decide(
            event,
            &muted,
            self.sources.deletions.as_ref(),
            SocialGraphPreference {
                mute_automatically: self.settings.mute_automatically,
                followees_of_followees: self.sources.social_graph.as_ref(),
            },
        )
    }

    /// Decide, render and hand the notification to the backend, using the
    /// author's cached profile.
    ///
    /// The author's metadata must already be cached; callers go through
    /// [`super::NotificationQueue`] which guarantees that.
    pub fn send(&self, event: &Note) -> Delivery {
        let body = match self.render(event) {
            Ok(body) => body,
            Err(delivery) => return delivery,
        };

        let Some(profile) = self.sources.profiles.lookup(&event.pubkey) else {
            error!(
                "notification logic error: no metadata for {} (event {})",
                event.pubkey, event.id
            );
            return Delivery::MissingMetadata;
        };

        self.dispatch(&profile, &body)
    }

    /// Like [`Self::send`], with the author's profile supplied by the caller.
    pub fn send_with_profile(&self, event: &Note, profile: &CachedProfile) -> Delivery {
        match self.render(event) {
            Ok(body) => self.dispatch(profile, &body),
            Err(delivery) => delivery,
        }
    }

    /// The notification body, or the reason there is none.
    fn render(&self, event: &Note) -> Result<String, Delivery> {
        if let Decision::Suppress(reason) = self.decide(event) {
            debug!("suppressing notification {}: {:?}", event.id, reason);
            return Err(Delivery::Suppressed(reason));
        }

        render_body(event).ok_or_else(|| {
            error!(
                "notification: unsupported kind {} for event {}",
                event.kind, event.id
            );
            Delivery::Unsupported(event.kind)
        })
    }

    fn dispatch(&self, profile: &CachedProfile, body: &str) -> Delivery {
        match self.backend.permission() {
            Permission::Granted => {}
            permission => {
                debug!("notifications unavailable: {:?}", permission);
                return Delivery::Unavailable;
            }
        }

        let title = format!("@{}", profile.name.as_deref().unwrap_or_default());
        self.backend
            .send_notification(&title, profile.picture_url.as_deref(), body);
        Delivery::Delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mute::MuteTag;
    use crate::notifications::sources::{FolloweeSet, MemoryDeletionIndex};
    use crate::MuteCategories;
    use enostr::NoteId;

    fn event(kind: u64, content: &str) -> Note {
        Note::unsigned(Pubkey::new([3; 32]), 1, kind, vec![], content)
    }

    fn no_graph(graph: &FolloweeSet) -> SocialGraphPreference<'_> {
        SocialGraphPreference {
            mute_automatically: false,
            followees_of_followees: graph,
        }
    }

    #[test]
    fn reaction_substitutes_first_occurrence_only() {
        assert_eq!(render_body(&event(kind::REACTION, "+1")).unwrap(), "Like1");
        assert_eq!(render_body(&event(kind::REACTION, "-1")).unwrap(), "Dislike1");
        assert_eq!(render_body(&event(kind::REACTION, "+1+1")).unwrap(), "Like1+1");
        assert_eq!(render_body(&event(kind::REACTION, "+-")).unwrap(), "LikeDislike");
        assert_eq!(render_body(&event(kind::REACTION, "🤙")).unwrap(), "🤙");
    }

    #[test]
    fn fixed_labels_and_unsupported_kinds() {
        assert_eq!(render_body(&event(kind::TEXT_NOTE, "hi")).unwrap(), "hi");
        assert_eq!(render_body(&event(kind::REPOST, "{}")).unwrap(), "Repost");
        assert_eq!(render_body(&event(kind::ZAP_RECEIPT, "")).unwrap(), "Zap");
        assert_eq!(render_body(&event(30023, "article")), None);
    }

    #[test]
    fn deleted_events_are_suppressed_regardless_of_mutes() {
        let e = event(kind::TEXT_NOTE, "hello");
        let deletions = MemoryDeletionIndex::default();
        deletions.insert(e.pubkey, e.id);
        let graph = FolloweeSet::default();

        let nothing_muted = Muted::empty(MuteCategories::WORD);
        assert_eq!(
            decide(&e, &nothing_muted, &deletions, no_graph(&graph)),
            Decision::Suppress(SuppressReason::Deleted)
        );

        // deletions by someone else don't count
        let other = MemoryDeletionIndex::default();
        other.insert(Pubkey::new([8; 32]), e.id);
        assert_eq!(
            decide(&e, &nothing_muted, &other, no_graph(&graph)),
            Decision::Deliver
        );
    }

    #[test]
    fn muted_word_wins_over_deletion() {
        let e = event(kind::TEXT_NOTE, "spoilers ahead");
        let deletions = MemoryDeletionIndex::default();
        deletions.insert(e.pubkey, e.id);
        let graph = FolloweeSet::default();
        let muted = Muted::from_tags(&[MuteTag::word("spoilers")], MuteCategories::WORD);

        assert!(matches!(
            decide(&e, &muted, &deletions, no_graph(&graph)),
            Decision::Suppress(SuppressReason::Muted(_))
        ));
    }

    #[test]
    fn social_graph_gate() {
        let e = event(kind::TEXT_NOTE, "hello");
        let deletions = MemoryDeletionIndex::default();
        let muted = Muted::default();
        let graph = FolloweeSet::default();

        let on = SocialGraphPreference {
            mute_automatically: true,
            followees_of_followees: &graph,
        };
        assert_eq!(
            decide(&e, &muted, &deletions, on),
            Decision::Suppress(SuppressReason::OutsideSocialGraph)
        );
        assert_eq!(
            decide(&e, &muted, &deletions, no_graph(&graph)),
            Decision::Deliver
        );

        graph.replace([e.pubkey]);
        assert_eq!(decide(&e, &muted, &deletions, on), Decision::Deliver);
    }

    #[test]
    fn unrelated_deleted_id_does_not_suppress() {
        let e = event(kind::TEXT_NOTE, "hello");
        let deletions = MemoryDeletionIndex::default();
        deletions.insert(e.pubkey, NoteId::new([0; 32]));
        let graph = FolloweeSet::default();
        assert_eq!(
            decide(&e, &Muted::default(), &deletions, no_graph(&graph)),
            Decision::Deliver
        );
    }
}
