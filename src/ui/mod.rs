// src/ui/mod.rs
//! Framework-free page models: each page owns its local state and exposes
//! the events a browser would deliver to it.

pub mod dashboard;
pub mod header;
pub mod render;
pub mod router;
pub mod settings;
pub mod text;

pub use dashboard::DashboardPage;
pub use header::{Header, HeaderAction, HeaderEvent, Key, NavItem, SearchBar, SearchField, SearchQuery};
pub use router::{Page, Route, Shell};
pub use settings::{SaveState, SettingsPage};
pub use text::ControlledText;
