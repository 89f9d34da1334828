use std::{env, error, fmt, fs, io, path::Path, sync::Arc};

use model::{map::MapOptions, marker::IconSet, route::OverlayStyle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum ConfigError {
    Io(Arc<io::Error>),
    Json(Arc<serde_json::Error>),
}

impl error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Could not read editor config: {}", e),
            Self::Json(e) => write!(f, "Invalid editor config: {}", e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(Arc::new(e))
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(Arc::new(e))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub map: MapOptions,
    pub icons: IconSet,
    pub overlay: OverlayStyle,
    /// Ignore directions responses that answer an outdated request instead
    /// of applying every response in arrival order.
    pub discard_stale_routes: bool,
}

impl EditorConfig {
    /// Reads the JSON file named by `ROUTE_EDITOR_CONFIG`, or starts from the
    /// defaults. `ROUTE_EDITOR_ICON_BASE_URL` fills in the icon set when the
    /// file did not configure any icons.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("ROUTE_EDITOR_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        if config.icons == IconSet::default() {
            if let Ok(base_url) = env::var("ROUTE_EDITOR_ICON_BASE_URL") {
                config.icons = IconSet::from_base_url(&base_url);
            }
        }

        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path.as_ref())?;
        log::info!("Loaded editor config from {}", path.as_ref().display());
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use model::marker::MarkerStyle;

    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();

        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.overlay.color, "#ff5e5e");
        assert_eq!(config.overlay.width, 4.0);
        assert_eq!(config.map.zoom, 4.5);
        assert!(!config.discard_stale_routes);
    }

    #[test]
    fn partial_documents_keep_remaining_defaults() {
        let config = EditorConfig::from_json(
            r##"{
                "map": { "zoom": 9 },
                "icons": { "pinOne": "/pins/1.png", "logoUrl": "/logo.png" },
                "overlay": { "color": "#00f" },
                "discardStaleRoutes": true
            }"##,
        )
        .unwrap();

        assert_eq!(config.map.zoom, 9.0);
        assert_eq!(config.map.center, MapOptions::default().center);
        assert_eq!(config.icons.waypoint_style(0), MarkerStyle::icon("/pins/1.png"));
        assert_eq!(config.icons.waypoint_style(10), MarkerStyle::icon("/logo.png"));
        assert_eq!(config.overlay.color, "#00f");
        assert_eq!(config.overlay.width, 4.0);
        assert!(config.discard_stale_routes);
    }

    #[test]
    fn malformed_documents_are_errors() {
        assert!(matches!(
            EditorConfig::from_json("{ \"map\": 3 }"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            EditorConfig::from_file("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
