//! Composition roots. Each entry point is built from its own store, transport
//! and notifier and shares no runtime state with the others.

pub mod background;
pub mod injected;
pub mod settings_page;
