//! Board configuration.
//!
//! # Responsibility
//! - Hold tunables for storage, layout, map widget and user-facing messages.
//! - Load them from JSON, falling back to defaults per field.
//!
//! # Invariants
//! - `BoardConfig::default()` always passes `validate()`.
//! - Loading never partially applies an invalid document.

use crate::model::card::DEFAULT_KEYWORDS;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

const MAX_ZOOM: u8 = 22;
const TILE_PLACEHOLDERS: &[&str] = &["{z}", "{x}", "{y}"];

/// Top-level board configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Storage key holding the serialized card collection.
    pub storage_key: String,
    /// Keyword tag used when a new card has none.
    pub default_keywords: String,
    /// Optional write quota applied to the key/value backend, in bytes.
    pub storage_quota_bytes: Option<usize>,
    pub map: MapConfig,
    pub layout: LayoutConfig,
    pub geocoder: GeocoderConfig,
    pub messages: MessagesConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key: "cafeCards".to_string(),
            default_keywords: DEFAULT_KEYWORDS.to_string(),
            storage_quota_bytes: None,
            map: MapConfig::default(),
            layout: LayoutConfig::default(),
            geocoder: GeocoderConfig::default(),
            messages: MessagesConfig::default(),
        }
    }
}

/// Map widget settings used by the detail panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub zoom: u8,
    pub tile_url_template: String,
    pub attribution: String,
    /// Delay between showing the panel and creating the viewport.
    pub settle_delay_ms: u64,
    pub dispose_on_close: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: 15,
            tile_url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
            settle_delay_ms: 200,
            dispose_on_close: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub card_width: f64,
    pub card_height: f64,
    /// Viewports at most this wide lock page scrolling while the panel is open.
    pub narrow_viewport_max_width: f64,
    pub base_stack_order: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 200.0,
            card_height: 300.0,
            narrow_viewport_max_width: 768.0,
            base_stack_order: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
        }
    }
}

/// User-facing notification texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    pub missing_fields: String,
    pub address_not_found: String,
    pub lookup_failed: String,
    pub storage_failed: String,
    pub keywords_prompt: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            missing_fields: "모든 항목을 입력해주세요!".to_string(),
            address_not_found: "주소를 찾을 수 없습니다.".to_string(),
            lookup_failed: "주소 검색에 실패했습니다. 다시 시도해주세요.".to_string(),
            storage_failed: "카드를 저장하지 못했습니다. 새로고침하면 사라질 수 있습니다."
                .to_string(),
            keywords_prompt: "카페 키워드 (예: #연남동 #소금빵 #뷰맛집)".to_string(),
        }
    }
}

impl BoardConfig {
    /// Parses a JSON document; absent fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key cannot be empty".to_string()));
        }
        if self.default_keywords.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_keywords cannot be empty".to_string(),
            ));
        }
        if self.map.zoom > MAX_ZOOM {
            return Err(ConfigError::Invalid(format!(
                "map.zoom {} exceeds {MAX_ZOOM}",
                self.map.zoom
            )));
        }
        for placeholder in TILE_PLACEHOLDERS {
            if !self.map.tile_url_template.contains(placeholder) {
                return Err(ConfigError::Invalid(format!(
                    "map.tile_url_template is missing `{placeholder}`"
                )));
            }
        }
        if !(self.layout.card_width > 0.0 && self.layout.card_height > 0.0) {
            return Err(ConfigError::Invalid(
                "layout card footprint must be positive".to_string(),
            ));
        }
        if self.geocoder.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "geocoder.endpoint cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}
