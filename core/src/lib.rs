//! Core state and domain logic for Primer.
//!
//! - [`registry`]: immutable topic map, built once at startup
//! - [`navigation`]: Listing / Loading / Detail state machine
//! - [`gate`]: time-derived access code check and its persisted flag
//! - [`store`]: key-value persistence behind the gate
//! - [`theme`]: dark/light state seeded from the host preference
//! - [`config`]: `~/.primer/config.toml`
//! - [`App`]: the single owner of all of the above

mod app;
pub mod config;
pub mod gate;
pub mod navigation;
pub mod registry;
pub mod store;
pub mod theme;
pub mod view;

pub use app::{App, Screen};
pub use config::{ConfigError, PrimerConfig, ThemeSetting};
pub use gate::{AccessDenied, AccessGate, GateTime};
pub use navigation::{LoadTicket, NavigationState, Navigator, PendingLoad, Transition};
pub use registry::{Registry, RegistryError};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
pub use theme::{ColorSchemeSource, EnvColorScheme, FixedColorScheme, ThemeState};
pub use view::{CopyFeedback, DetailLayout, ViewState};
