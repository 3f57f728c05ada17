use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::SettingsStore;

pub const API_TOKEN_KEY: &str = "apiToken";
pub const APP_URL_KEY: &str = "appUrl";
pub const SETTINGS_KEYS: [&str; 2] = [API_TOKEN_KEY, APP_URL_KEY];

/// The persisted pair every import needs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub api_token: String,
    pub app_url: String,
}

impl Settings {
    pub fn new(api_token: impl Into<String>, app_url: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            app_url: app_url.into(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_token", &"<redacted>")
            .field("app_url", &self.app_url)
            .finish()
    }
}

/// Reads both keys and returns them only when neither is missing or empty.
/// Values are returned exactly as stored.
pub async fn check_settings(store: &dyn SettingsStore) -> Result<Option<Settings>> {
    let mut values = store.get(&SETTINGS_KEYS).await?;
    let api_token = values.remove(API_TOKEN_KEY).filter(|v| !v.is_empty());
    let app_url = values.remove(APP_URL_KEY).filter(|v| !v.is_empty());

    match (api_token, app_url) {
        (Some(api_token), Some(app_url)) => Ok(Some(Settings { api_token, app_url })),
        _ => {
            tracing::debug!("settings incomplete");
            Ok(None)
        }
    }
}
