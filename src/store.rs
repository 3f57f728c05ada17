//! Key-value settings storage.
//!
//! Every entry point talks to storage through [`SettingsStore`]; the adapters
//! differ only in where the two string keys end up:
//!
//! - [`LocalStore`]: a dotenv-style file next to where the importer runs,
//!   mirroring the page-local storage of the injected variant.
//! - [`SyncedStore`]: a JSON document with one namespace per extension
//!   identity, meant to live in a directory the user synchronises.
//! - [`MemoryStore`]: process-local, for embedding and tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};

pub type Values = HashMap<String, String>;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the stored value for each requested key that is present.
    async fn get(&self, keys: &[&str]) -> Result<Values>;

    /// Writes the given values, leaving other keys untouched.
    async fn set(&self, values: Values) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<Values>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { values: Mutex::new(values) }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Values>> {
        self.values
            .lock()
            .map_err(|_| AppError::StoreError("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<Values> {
        let values = self.lock()?;
        Ok(keys
            .iter()
            .filter_map(|key| values.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, values: Values) -> Result<()> {
        self.lock()?.extend(values);
        Ok(())
    }
}

/// Dotenv-format file store. Logical keys are stored as prefixed
/// screaming-snake variables (`apiToken` becomes `NUTRIPLAN_API_TOKEN`).
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_contents(&self) -> Result<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Variable assigned on a dotenv line. Blank lines and comments assign nothing.
fn assigned_name(line: &str) -> Option<&str> {
    let line = line.trim_start();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);
    let (name, _) = line.split_once('=')?;
    let name = name.trim_end();
    (!name.is_empty()).then_some(name)
}

/// Parses the value of one of our own lines. Other lines are never parsed.
fn parse_line_value(line: &str) -> Result<Option<String>> {
    match dotenv::Iter::new(line.as_bytes()).next() {
        Some(item) => Ok(Some(item?.1)),
        None => Ok(None),
    }
}

pub fn env_key(key: &str) -> String {
    let mut out = String::from("NUTRIPLAN");
    let mut word_start = true;
    for c in key.chars() {
        if c.is_ascii_uppercase() || word_start {
            out.push('_');
            word_start = false;
        }
        if c == '-' || c == '_' {
            word_start = true;
            continue;
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}

fn quote_env_value(value: &str) -> String {
    if !value.contains('\'') && !value.contains('\n') {
        return format!("'{}'", value);
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' | '"' | '$' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn env_line(name: &str, value: &str) -> String {
    format!("{}={}\n", name, quote_env_value(value))
}

#[async_trait]
impl SettingsStore for LocalStore {
    async fn get(&self, keys: &[&str]) -> Result<Values> {
        let contents = self.read_contents().await?;
        let wanted: HashMap<String, &str> = keys.iter().map(|key| (env_key(key), *key)).collect();

        let mut found = Values::new();
        for line in contents.lines() {
            let Some(key) = assigned_name(line).and_then(|name| wanted.get(name)) else {
                continue;
            };
            if let Some(value) = parse_line_value(line)? {
                found.insert(key.to_string(), value);
            }
        }
        Ok(found)
    }

    /// Rewrites only our own assignments. Every other line, including
    /// comments and lines dotenv cannot parse, is copied byte for byte.
    async fn set(&self, values: Values) -> Result<()> {
        let contents = self.read_contents().await?;
        let pending: BTreeMap<String, String> =
            values.into_iter().map(|(key, value)| (env_key(&key), value)).collect();

        let mut written = HashSet::new();
        let mut out = String::with_capacity(contents.len() + 128);
        for line in contents.split_inclusive('\n') {
            let bare = line.trim_end_matches(['\r', '\n']);
            match assigned_name(bare).and_then(|name| pending.get_key_value(name)) {
                Some((name, value)) => {
                    // Later duplicates of a replaced variable are dropped.
                    if written.insert(name.as_str()) {
                        out.push_str(&env_line(name, value));
                    }
                }
                None => out.push_str(line),
            }
        }

        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        for (name, value) in &pending {
            if !written.contains(name.as_str()) {
                out.push_str(&env_line(name, value));
            }
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, out).await?;
        tracing::debug!(path = %self.path.display(), "local settings written");
        Ok(())
    }
}

type SyncDocument = BTreeMap<String, BTreeMap<String, String>>;

/// JSON file store holding one namespace per extension identity.
#[derive(Debug, Clone)]
pub struct SyncedStore {
    path: PathBuf,
    identity: String,
}

impl SyncedStore {
    pub fn new(path: impl Into<PathBuf>, identity: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            identity: identity.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<SyncDocument> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(SyncDocument::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SyncDocument::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SettingsStore for SyncedStore {
    async fn get(&self, keys: &[&str]) -> Result<Values> {
        let mut document = self.read_document().await?;
        let Some(namespace) = document.remove(&self.identity) else {
            return Ok(Values::new());
        };
        Ok(keys
            .iter()
            .filter_map(|key| namespace.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, values: Values) -> Result<()> {
        let mut document = self.read_document().await?;
        document.entry(self.identity.clone()).or_default().extend(values);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&document)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::debug!(path = %self.path.display(), identity = %self.identity, "synced settings written");
        Ok(())
    }
}
