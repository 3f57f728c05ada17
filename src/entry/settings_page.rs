use crate::error::Result;
use crate::form::{self, FormInput, FormValues, ValidationOutcome};
use crate::settings::Settings;
use crate::store::SettingsStore;

/// Settings form bound to the synced store. Stays open after saving.
pub struct SettingsPage<'a> {
    store: &'a dyn SettingsStore,
}

impl<'a> SettingsPage<'a> {
    pub fn new(store: &'a dyn SettingsStore) -> Self {
        Self { store }
    }

    /// Values the page opens with.
    pub async fn load(&self) -> Result<FormValues> {
        form::load_form(self.store).await
    }

    pub async fn save(&self, raw_token: &str, raw_url: &str) -> Result<ValidationOutcome> {
        form::validate_and_save(self.store, raw_token, raw_url).await
    }

    pub async fn edit(&self, input: &mut dyn FormInput) -> Result<Option<Settings>> {
        form::run_form(self.store, input).await
    }
}
