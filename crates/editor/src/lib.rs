pub use crate::{config::EditorConfig, route_editor::RouteEditor};

pub mod config;
pub mod list;
pub mod markers;
pub mod route;
pub mod route_editor;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod surface;
