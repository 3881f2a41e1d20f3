//! Notification backend trait for platform-specific notification delivery.

use std::sync::Arc;

/// Whether the platform lets us show notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// The user hasn't been asked yet
    Prompt,
    /// The running platform has no notification capability
    Unsupported,
}

/// Backend for delivering notifications to the user.
pub trait NotificationBackend: Send + Sync {
    fn permission(&self) -> Permission;

    /// Show a notification. Only called when [`Self::permission`] is
    /// [`Permission::Granted`].
    ///
    /// # Arguments
    /// * `title` - Notification title, `@name` of the author
    /// * `icon` - Author's profile picture URL, if any
    /// * `body` - Rendered notification text
    fn send_notification(&self, title: &str, icon: Option<&str>, body: &str);
}

impl<T: NotificationBackend + ?Sized> NotificationBackend for Arc<T> {
    fn permission(&self) -> Permission {
        (**self).permission()
    }

    fn send_notification(&self, title: &str, icon: Option<&str>, body: &str) {
        (**self).send_notification(title, icon, body)
    }
}

/// A backend without notification support.
///
/// Used when notifications are disabled or on unsupported platforms.
pub struct NoopBackend;

impl NotificationBackend for NoopBackend {
    fn permission(&self) -> Permission {
        Permission::Unsupported
    }

    fn send_notification(&self, _title: &str, _icon: Option<&str>, _body: &str) {}
}

/// A logging backend that just logs notifications.
///
/// Useful for debugging and headless runs.
pub struct LoggingBackend;

impl NotificationBackend for LoggingBackend {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn send_notification(&self, title: &str, icon: Option<&str>, body: &str) {
        tracing::info!("Notification: title={title} icon={icon:?} body={body:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_backends_report_permission() {
        assert_eq!(NoopBackend.permission(), Permission::Unsupported);
        assert_eq!(LoggingBackend.permission(), Permission::Granted);

        let shared: Arc<dyn NotificationBackend> = Arc::new(LoggingBackend);
        assert_eq!(shared.permission(), Permission::Granted);
        shared.send_notification("@alice", None, "Like");
    }
}
