pub mod api;
pub mod config;
pub mod entry;
pub mod error;
pub mod form;
pub mod import;
pub mod logging;
pub mod notify;
pub mod settings;
pub mod store;
pub mod transport;

use std::sync::Arc;
use entry::background::Background;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub background: Arc<Background>,
}
