use serde::Serialize;

use crate::notify::Notification;
use crate::settings::Settings;
use crate::transport::Transport;

pub const IMPORT_PATH: &str = "/api/recipes/import-via-extension";

/// Drops one trailing slash from the application URL and appends the import path.
pub fn build_endpoint(app_url: &str) -> String {
    let base = app_url.strip_suffix('/').unwrap_or(app_url);
    let mut endpoint = String::with_capacity(base.len() + IMPORT_PATH.len());
    endpoint.push_str(base);
    endpoint.push_str(IMPORT_PATH);
    endpoint
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ImportBody<'a> {
    pub url: &'a str,
}

/// One page handed to the remote app. Built per invocation, never stored.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub page_url: String,
    pub settings: Settings,
}

impl ImportRequest {
    pub fn new(page_url: impl Into<String>, settings: Settings) -> Self {
        Self {
            page_url: page_url.into(),
            settings,
        }
    }

    pub fn endpoint(&self) -> String {
        build_endpoint(&self.settings.app_url)
    }

    pub fn body(&self) -> ImportBody<'_> {
        ImportBody { url: &self.page_url }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success,
    AuthError,
    ValidationError,
    ServerError,
    UnexpectedError(u16),
    ConnectionError,
}

impl Outcome {
    pub fn from_status(status: u16) -> Self {
        match status {
            200..=299 => Outcome::Success,
            401 => Outcome::AuthError,
            422 => Outcome::ValidationError,
            s if s >= 500 => Outcome::ServerError,
            s => Outcome::UnexpectedError(s),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Outcome::Success)
    }

    /// Titled form used by the background variant.
    pub fn system_notification(&self) -> Notification {
        let (title, message) = match self {
            Outcome::Success => (
                "Success",
                "Recipe import started! Check your NutriPlan app shortly.".to_string(),
            ),
            Outcome::AuthError => (
                "Authentication Error",
                "Invalid API token. Please check your settings.".to_string(),
            ),
            Outcome::ValidationError => (
                "Validation Error",
                "The URL provided could not be processed. Please try a different page.".to_string(),
            ),
            Outcome::ServerError => (
                "Server Error",
                "There was an error processing your request. Please try again later.".to_string(),
            ),
            Outcome::UnexpectedError(status) => (
                "Error",
                format!("Unexpected error ({}). Please try again.", status),
            ),
            Outcome::ConnectionError => (
                "Connection Error",
                "Could not connect to your NutriPlan app. Please check your application URL and network connection."
                    .to_string(),
            ),
        };
        Notification::titled(title, message, self.is_error())
    }

    /// Untitled, single-line form used by the injected panel.
    pub fn panel_notification(&self) -> Notification {
        let message = match self {
            Outcome::Success => "Recipe import started! Check your NutriPlan app shortly.".to_string(),
            Outcome::AuthError => {
                "Authentication Error: Invalid API token. Please check your settings.".to_string()
            }
            Outcome::ValidationError => {
                "Validation Error: The URL provided could not be processed.".to_string()
            }
            Outcome::ServerError => {
                "Server Error: There was an error processing your request.".to_string()
            }
            Outcome::UnexpectedError(status) => format!("Error: Unexpected error ({}).", status),
            Outcome::ConnectionError => "Connection Error: Could not connect to NutriPlan.".to_string(),
        };
        Notification {
            title: None,
            message,
            is_error: self.is_error(),
        }
    }
}

/// Sends exactly one import request and classifies the result. Never retries.
pub async fn send_url_to_api(transport: &dyn Transport, page_url: &str, settings: &Settings) -> Outcome {
    let request = ImportRequest::new(page_url, settings.clone());
    tracing::info!(endpoint = %request.endpoint(), page_url, "sending import request");

    match transport.send(&request).await {
        Ok(status) => {
            let outcome = Outcome::from_status(status);
            tracing::info!(status, ?outcome, "import request answered");
            outcome
        }
        Err(e) => {
            tracing::error!("Error sending URL to API: {}", e);
            Outcome::ConnectionError
        }
    }
}
