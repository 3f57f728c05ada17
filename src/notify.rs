use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;

/// What the core hands to whatever presents feedback to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: Option<String>,
    pub message: String,
    pub is_error: bool,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            title: None,
            message: message.into(),
            is_error: false,
        }
    }

    pub fn titled(title: impl Into<String>, message: impl Into<String>, is_error: bool) -> Self {
        Self {
            title: Some(title.into()),
            message: message.into(),
            is_error,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Terminal stand-in for the in-page corner panel: one line per notification.
pub struct PanelNotifier<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> PanelNotifier<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> Notifier for PanelNotifier<W> {
    fn notify(&self, notification: &Notification) {
        let marker = if notification.is_error { "✗" } else { "✓" };
        let line = match &notification.title {
            Some(title) => format!("{} {}: {}", marker, title, notification.message),
            None => format!("{} {}", marker, notification.message),
        };

        // A writer poisoned by a panicking caller is still usable.
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            tracing::warn!("failed to write notification: {}", e);
        }
    }
}

/// Background-context notifications, raised as structured log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemNotifier;

impl Notifier for SystemNotifier {
    fn notify(&self, notification: &Notification) {
        let title = notification.title.as_deref().unwrap_or("NutriPlan");
        if notification.is_error {
            tracing::warn!(title, message = %notification.message, "notification");
        } else {
            tracing::info!(title, message = %notification.message, "notification");
        }
    }
}
