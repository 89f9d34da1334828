use std::{collections::BTreeMap, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Every marker the editor places carries this class, so it can tear all of
/// them down without consulting its registry.
pub const MANAGED_MARKER_CLASS: &str = "custom-marker";

pub const ICON_SIZE_PX: u32 = 42;

pub const START_COLOR: &str = "#3887be";
pub const WAYPOINT_COLOR: &str = "#f30";
pub const LANDMARK_COLOR: &str = "#000";

/// Icon keys of the first ten waypoints, by index.
pub const WAYPOINT_ICON_KEYS: [&str; 10] = [
    "pinOne", "pinTwo", "pinThree", "pinFour", "pinFive", "pinSix", "pinSeven",
    "pinEight", "pinNine", "pinTen",
];
pub const FALLBACK_ICON_KEY: &str = "logoUrl";
pub const LANDMARK_ICON_KEY: &str = "pinPurple";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum MarkerKind {
    Waypoint,
    Landmark,
}

impl MarkerKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Waypoint => "waypoint",
            Self::Landmark => "landmark",
        }
    }
}

/// Positional marker identity: `waypoint-3` is whatever waypoint currently
/// sits at index 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId {
    pub kind: MarkerKind,
    pub index: usize,
}

impl MarkerId {
    pub fn waypoint(index: usize) -> Self {
        Self {
            kind: MarkerKind::Waypoint,
            index,
        }
    }

    pub fn landmark(index: usize) -> Self {
        Self {
            kind: MarkerKind::Landmark,
            index,
        }
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.kind.prefix(), self.index)
    }
}

impl Serialize for MarkerId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Appearance {
    Icon {
        url: String,
        #[serde(rename = "sizePx")]
        size_px: u32,
    },
    Color { color: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub class: String,
    pub appearance: Appearance,
}

impl MarkerStyle {
    fn managed(appearance: Appearance) -> Self {
        Self {
            class: MANAGED_MARKER_CLASS.to_owned(),
            appearance,
        }
    }

    pub fn icon<S: Into<String>>(url: S) -> Self {
        Self::managed(Appearance::Icon {
            url: url.into(),
            size_px: ICON_SIZE_PX,
        })
    }

    pub fn color<S: Into<String>>(color: S) -> Self {
        Self::managed(Appearance::Color {
            color: color.into(),
        })
    }

    pub fn icon_url(&self) -> Option<&str> {
        match &self.appearance {
            Appearance::Icon { url, .. } => Some(url.as_str()),
            Appearance::Color { .. } => None,
        }
    }
}

/// Marker icon urls by icon key (`pinOne` .. `pinTen`, `logoUrl`,
/// `pinPurple`). Keys without an url fall back to plain colored markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct IconSet {
    icons: BTreeMap<String, String>,
}

impl IconSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Icons served from a single directory, named `pin-one.png` ..
    /// `pin-ten.png`, `logo.png` and `pin-purple.png`.
    pub fn from_base_url(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let numbers = [
            "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
            "ten",
        ];
        let mut icons = WAYPOINT_ICON_KEYS
            .iter()
            .zip(numbers)
            .map(|(key, number)| (key.to_string(), format!("{base_url}/pin-{number}.png")))
            .collect::<BTreeMap<_, _>>();
        icons.insert(FALLBACK_ICON_KEY.to_owned(), format!("{base_url}/logo.png"));
        icons.insert(
            LANDMARK_ICON_KEY.to_owned(),
            format!("{base_url}/pin-purple.png"),
        );
        Self { icons }
    }

    pub fn with_icon<K: Into<String>, V: Into<String>>(mut self, key: K, url: V) -> Self {
        self.icons.insert(key.into(), url.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.icons.get(key).map(String::as_str)
    }

    pub fn waypoint_icon_key(index: usize) -> &'static str {
        WAYPOINT_ICON_KEYS
            .get(index)
            .copied()
            .unwrap_or(FALLBACK_ICON_KEY)
    }

    pub fn waypoint_style(&self, index: usize) -> MarkerStyle {
        match self.get(Self::waypoint_icon_key(index)) {
            Some(url) => MarkerStyle::icon(url),
            None if index == 0 => MarkerStyle::color(START_COLOR),
            None => MarkerStyle::color(WAYPOINT_COLOR),
        }
    }

    pub fn landmark_style(&self) -> MarkerStyle {
        match self.get(LANDMARK_ICON_KEY) {
            Some(url) => MarkerStyle::icon(url),
            None => MarkerStyle::color(LANDMARK_COLOR),
        }
    }
}
