//! Desktop notification backend.
//!
//! Linux goes through notify-rust, macOS through osascript. Other platforms
//! report [`Permission::Unsupported`].

use super::backend::{NotificationBackend, Permission};
#[cfg(any(target_os = "linux", target_os = "macos"))]
use tracing::{debug, error};

/// Desktop notification backend.
///
/// Desktop platforms have no permission prompt, so permission is granted
/// wherever a notification service exists.
pub struct DesktopBackend {
    /// App name shown in notifications (used on Linux)
    app_name: String,
}

impl DesktopBackend {
    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

impl Default for DesktopBackend {
    fn default() -> Self {
        Self::with_app_name("mutedeck")
    }
}

impl NotificationBackend for DesktopBackend {
    fn permission(&self) -> Permission {
        if cfg!(any(target_os = "linux", target_os = "macos")) {
            Permission::Granted
        } else {
            Permission::Unsupported
        }
    }

    fn send_notification(&self, title: &str, icon: Option<&str>, body: &str) {
        #[cfg(target_os = "linux")]
        {
            use notify_rust::Notification;

            let mut notification = Notification::new();
            notification.appname(&self.app_name).summary(title).body(body);
            if let Some(icon) = icon {
                notification.icon(icon);
            }

            match notification.show() {
                Ok(_) => debug!("Desktop notification displayed"),
                Err(e) => error!("Failed to show desktop notification: {}", e),
            }
        }

        #[cfg(target_os = "macos")]
        {
            // osascript can't show a remote icon
            let _ = icon;
            show_macos_notification(title, body);
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            let _ = (title, icon, body);
        }
    }
}

/// AppleScript string literal for `s`.
#[cfg(any(target_os = "macos", test))]
fn applescript_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Post through `osascript`, which works without an app bundle.
#[cfg(target_os = "macos")]
fn show_macos_notification(title: &str, body: &str) {
    let script = format!(
        "display notification {} with title {}",
        applescript_quote(body),
        applescript_quote(title)
    );

    let output = match std::process::Command::new("osascript")
        .args(["-e", &script])
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            error!("could not run osascript: {e}");
            return;
        }
    };

    if output.status.success() {
        debug!("macOS notification displayed");
    } else {
        error!(
            "osascript failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_follows_platform() {
        let backend = DesktopBackend::new();
        assert_eq!(backend.app_name(), "mutedeck");

        let expected = if cfg!(any(target_os = "linux", target_os = "macos")) {
            Permission::Granted
        } else {
            Permission::Unsupported
        };
        assert_eq!(backend.permission(), expected);
    }

    #[test]
    fn applescript_quoting() {
        assert_eq!(applescript_quote("hi"), r#""hi""#);
        assert_eq!(applescript_quote(r#"say "gm" \o/"#), r#""say \"gm\" \\o/""#);
    }
}
