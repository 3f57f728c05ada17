//! Settings form: validation, persistence and the interactive loop shared by
//! the injected importer and the settings page.

use std::io::{self, BufRead, Write};

use url::Url;

use crate::error::Result;
use crate::settings::{Settings, API_TOKEN_KEY, APP_URL_KEY, SETTINGS_KEYS};
use crate::store::{SettingsStore, Values};

pub const SAVED_MESSAGE: &str = "Settings saved successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Saved(Settings),
    MissingToken,
    MissingUrl,
    InvalidUrl,
}

impl ValidationOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, ValidationOutcome::Saved(_))
    }

    pub fn message(&self) -> &'static str {
        match self {
            ValidationOutcome::Saved(_) => SAVED_MESSAGE,
            ValidationOutcome::MissingToken => "Please enter your API token.",
            ValidationOutcome::MissingUrl => "Please enter your NutriPlan application URL.",
            ValidationOutcome::InvalidUrl => "Please enter a valid URL including http:// or https://.",
        }
    }
}

/// Checks raw form input without touching storage. First failure wins.
pub fn validate(raw_token: &str, raw_url: &str) -> ValidationOutcome {
    let api_token = raw_token.trim();
    let app_url = raw_url.trim();

    if api_token.is_empty() {
        return ValidationOutcome::MissingToken;
    }
    if app_url.is_empty() {
        return ValidationOutcome::MissingUrl;
    }
    // Url::parse only accepts absolute URLs.
    if Url::parse(app_url).is_err() {
        return ValidationOutcome::InvalidUrl;
    }

    ValidationOutcome::Saved(Settings::new(api_token, app_url))
}

/// Validates and, on success, persists the trimmed values.
pub async fn validate_and_save(
    store: &dyn SettingsStore,
    raw_token: &str,
    raw_url: &str,
) -> Result<ValidationOutcome> {
    let outcome = validate(raw_token, raw_url);
    if let ValidationOutcome::Saved(settings) = &outcome {
        let values: Values = [
            (API_TOKEN_KEY.to_string(), settings.api_token.clone()),
            (APP_URL_KEY.to_string(), settings.app_url.clone()),
        ]
        .into_iter()
        .collect();
        store.set(values).await?;
        tracing::info!(app_url = %settings.app_url, "settings saved");
    } else {
        tracing::debug!(?outcome, "settings rejected");
    }
    Ok(outcome)
}

/// Values a form opens with. Empty stored values are not pre-filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub api_token: Option<String>,
    pub app_url: Option<String>,
}

pub async fn load_form(store: &dyn SettingsStore) -> Result<FormValues> {
    let mut values = store.get(&SETTINGS_KEYS).await?;
    Ok(FormValues {
        api_token: values.remove(API_TOKEN_KEY).filter(|v| !v.is_empty()),
        app_url: values.remove(APP_URL_KEY).filter(|v| !v.is_empty()),
    })
}

/// Source of raw form submissions.
pub trait FormInput: Send {
    /// Shows the form pre-filled with `current`. `None` means the user cancelled.
    fn read(&mut self, current: &FormValues) -> io::Result<Option<(String, String)>>;

    /// Shows a status line under the form.
    fn show_status(&mut self, message: &str, is_error: bool);
}

/// Runs the form until the settings are saved or the user cancels. Entries are
/// kept between attempts so a validation error only asks for a correction.
pub async fn run_form(store: &dyn SettingsStore, input: &mut dyn FormInput) -> Result<Option<Settings>> {
    let mut current = load_form(store).await?;
    loop {
        let Some((raw_token, raw_url)) = input.read(&current)? else {
            tracing::debug!("settings form cancelled");
            return Ok(None);
        };

        let outcome = validate_and_save(store, &raw_token, &raw_url).await?;
        input.show_status(outcome.message(), !outcome.is_saved());
        if let ValidationOutcome::Saved(settings) = outcome {
            return Ok(Some(settings));
        }

        current = FormValues {
            api_token: Some(raw_token).filter(|v| !v.is_empty()),
            app_url: Some(raw_url).filter(|v| !v.is_empty()),
        };
    }
}

/// Line-oriented form over any reader/writer pair, used when input is piped.
/// A stored token is shown as `[saved]`; pressing Enter keeps the pre-filled
/// value and end of input cancels.
pub struct TerminalForm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead + Send, W: Write + Send> TerminalForm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, label: &str, shown: Option<&str>) -> io::Result<Option<String>> {
        match shown {
            Some(shown) => write!(self.output, "{} [{}]: ", label, shown)?,
            None => write!(self.output, "{}: ", label)?,
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead + Send, W: Write + Send> FormInput for TerminalForm<R, W> {
    fn read(&mut self, current: &FormValues) -> io::Result<Option<(String, String)>> {
        writeln!(self.output, "NutriPlan Settings")?;
        writeln!(self.output, "Please enter your NutriPlan API token and application URL:")?;

        let masked = current.api_token.as_ref().map(|_| "saved");
        let Some(token) = self.prompt("API Token", masked)? else {
            return Ok(None);
        };
        let Some(url) = self.prompt("Application URL", current.app_url.as_deref())? else {
            return Ok(None);
        };

        Ok(Some((
            keep_or_replace(token, &current.api_token),
            keep_or_replace(url, &current.app_url),
        )))
    }

    fn show_status(&mut self, message: &str, is_error: bool) {
        let prefix = if is_error { "error" } else { "ok" };
        if let Err(e) = writeln!(self.output, "{}: {}", prefix, message) {
            tracing::warn!("failed to write form status: {}", e);
        }
    }
}

/// An empty entry keeps the pre-filled value.
fn keep_or_replace(entered: String, current: &Option<String>) -> String {
    match (entered.is_empty(), current) {
        (true, Some(existing)) => existing.clone(),
        _ => entered,
    }
}

fn dialog_error(err: dialoguer::Error) -> io::Error {
    io::Error::other(err.to_string())
}

pub const TOKEN_PROMPT: &str = "API Token (input hidden)";
pub const SAVED_TOKEN_PROMPT: &str = "API Token (input hidden, Enter keeps the saved token)";

/// Interactive form for a real terminal. The token is read without echo.
#[derive(Debug, Default)]
pub struct ConsoleForm;

impl ConsoleForm {
    pub fn new() -> Self {
        Self
    }

    pub fn token_prompt(current: &FormValues) -> &'static str {
        if current.api_token.is_some() {
            SAVED_TOKEN_PROMPT
        } else {
            TOKEN_PROMPT
        }
    }
}

impl FormInput for ConsoleForm {
    fn read(&mut self, current: &FormValues) -> io::Result<Option<(String, String)>> {
        println!("NutriPlan Settings");
        println!("Please enter your NutriPlan API token and application URL:");

        let token = dialoguer::Password::new()
            .with_prompt(Self::token_prompt(current))
            .allow_empty_password(true)
            .interact()
            .map_err(dialog_error)?;

        let mut url_input = dialoguer::Input::<String>::new()
            .with_prompt("Application URL")
            .allow_empty(true);
        if let Some(app_url) = &current.app_url {
            url_input = url_input.with_initial_text(app_url.clone());
        }
        let url = url_input.interact_text().map_err(dialog_error)?;

        Ok(Some((
            keep_or_replace(token, &current.api_token),
            keep_or_replace(url, &current.app_url),
        )))
    }

    fn show_status(&mut self, message: &str, is_error: bool) {
        if is_error {
            eprintln!("error: {}", message);
        } else {
            println!("ok: {}", message);
        }
    }
}
