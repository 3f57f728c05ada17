use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::import::Outcome;
use crate::notify::Notification;

/// Toolbar activation: the URL of the tab the user is looking at.
#[derive(Deserialize)]
pub struct ActionRequest {
    pub url: String,
}

#[derive(Serialize)]
pub struct ActionResponse {
    pub url: String,
    pub outcome: Option<Outcome>,
    pub notification: Notification,
    pub open_settings: bool,
    pub handled_at: DateTime<Utc>,
}
