use crate::error::Result;
use crate::form::{self, FormInput, SAVED_MESSAGE};
use crate::import::{send_url_to_api, Outcome};
use crate::notify::{Notification, Notifier};
use crate::settings::{check_settings, Settings};
use crate::store::SettingsStore;
use crate::transport::Transport;

pub const SENDING_MESSAGE: &str = "Sending recipe to NutriPlan...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedRun {
    /// Settings were present and one import request was made.
    Imported(Outcome),
    /// Settings were missing; the form ran. `None` when it was cancelled.
    Configured(Option<Settings>),
}

/// One-shot importer run against the page-local store.
pub struct Injected<'a> {
    store: &'a dyn SettingsStore,
    transport: &'a dyn Transport,
    notifier: &'a dyn Notifier,
}

impl<'a> Injected<'a> {
    pub fn new(store: &'a dyn SettingsStore, transport: &'a dyn Transport, notifier: &'a dyn Notifier) -> Self {
        Self {
            store,
            transport,
            notifier,
        }
    }

    pub async fn run(&self, page_url: &str, form: &mut dyn FormInput) -> Result<InjectedRun> {
        let Some(settings) = check_settings(self.store).await? else {
            tracing::info!("no local settings, opening configuration form");
            let saved = form::run_form(self.store, form).await?;
            if saved.is_some() {
                self.notifier.notify(&Notification::info(SAVED_MESSAGE));
            }
            return Ok(InjectedRun::Configured(saved));
        };

        self.notifier.notify(&Notification::info(SENDING_MESSAGE));
        let outcome = send_url_to_api(self.transport, page_url, &settings).await;
        self.notifier.notify(&outcome.panel_notification());
        Ok(InjectedRun::Imported(outcome))
    }
}
