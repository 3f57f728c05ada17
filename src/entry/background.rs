use std::sync::Arc;

use crate::error::Result;
use crate::import::{send_url_to_api, Outcome};
use crate::notify::{Notification, Notifier};
use crate::settings::check_settings;
use crate::store::SettingsStore;
use crate::transport::Transport;

pub const CONFIG_REQUIRED_TITLE: &str = "Configuration Required";
pub const CONFIG_REQUIRED_MESSAGE: &str =
    "Please set your API token and Application URL in the extension settings.";

/// Brings the settings page in front of the user.
pub trait OptionsPage: Send + Sync {
    fn open(&self);
}

/// Points the user at the `settings` command, since the daemon has no window.
#[derive(Debug, Clone)]
pub struct CommandHint {
    pub command: String,
}

impl OptionsPage for CommandHint {
    fn open(&self) {
        tracing::warn!(command = %self.command, "settings required, run the settings command");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub notification: Notification,
    pub outcome: Option<Outcome>,
    pub opened_settings: bool,
}

/// Long-lived handler behind the toolbar action.
#[derive(Clone)]
pub struct Background {
    store: Arc<dyn SettingsStore>,
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    options: Arc<dyn OptionsPage>,
}

impl Background {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        options: Arc<dyn OptionsPage>,
    ) -> Self {
        Self {
            store,
            transport,
            notifier,
            options,
        }
    }

    pub async fn handle_action_click(&self, tab_url: &str) -> Result<ActionResult> {
        let Some(settings) = check_settings(self.store.as_ref()).await? else {
            let notification = Notification::titled(CONFIG_REQUIRED_TITLE, CONFIG_REQUIRED_MESSAGE, true);
            self.notifier.notify(&notification);
            self.options.open();
            return Ok(ActionResult {
                notification,
                outcome: None,
                opened_settings: true,
            });
        };

        let outcome = send_url_to_api(self.transport.as_ref(), tab_url, &settings).await;
        let notification = outcome.system_notification();
        self.notifier.notify(&notification);
        Ok(ActionResult {
            notification,
            outcome: Some(outcome),
            opened_settings: false,
        })
    }
}
