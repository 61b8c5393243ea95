//! Cafe card domain model.
//!
//! # Responsibility
//! - Define the persisted card record and its partial (draft) form.
//! - Validate required text fields and coordinate ranges.
//!
//! # Invariants
//! - A `CardRecord` produced by `CardDraft::validate()` has non-blank
//!   `name`, `description` and `image_url`, and finite in-range coordinates.
//! - Records are never mutated after creation; on-screen position is view
//!   state and lives outside this model.
//! - Two records with identical fields are still two distinct cards.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Keyword tag applied when the user supplies none.
pub const DEFAULT_KEYWORDS: &str = "#카페";

const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

static KEYWORD_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#[^\s#]+").expect("valid keyword tag regex"));

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks finiteness and the WGS84 degree ranges.
    pub fn validate(&self) -> Result<(), CardValidationError> {
        check_coordinate(CoordinateAxis::Latitude, self.latitude)?;
        check_coordinate(CoordinateAxis::Longitude, self.longitude)
    }
}

/// Persisted card unit.
///
/// Wire field names match the browser storage format already in use
/// (`img`, `lat`, `lng`), so boards saved before this crate existed load
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub name: String,
    pub description: String,
    #[serde(rename = "img")]
    pub image_url: String,
    #[serde(rename = "lat", deserialize_with = "lenient_f64")]
    pub latitude: f64,
    #[serde(rename = "lng", deserialize_with = "lenient_f64")]
    pub longitude: f64,
    #[serde(default = "default_keywords")]
    pub keywords: String,
}

impl CardRecord {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Re-checks record invariants, e.g. for records decoded from storage.
    pub fn validate(&self) -> Result<(), CardValidationError> {
        check_required(RequiredField::Name, &self.name)?;
        check_required(RequiredField::Description, &self.description)?;
        check_required(RequiredField::ImageUrl, &self.image_url)?;
        self.coordinates().validate()
    }

    /// Keyword tokens starting with `#`, in input order.
    pub fn keyword_tags(&self) -> Vec<String> {
        keyword_tags(&self.keywords)
    }
}

/// Partially filled card, as collected from a form or an import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub keywords: Option<String>,
}

impl CardDraft {
    /// Fills `keywords` with `tag` when absent or blank. Nothing else changes.
    pub fn with_defaults(mut self, tag: &str) -> Self {
        let missing = self
            .keywords
            .as_deref()
            .map_or(true, |value| value.trim().is_empty());
        if missing {
            self.keywords = Some(tag.to_string());
        }
        self
    }

    /// Checks only the required text fields, before coordinates are known.
    pub fn check_text_fields(&self) -> Result<(), CardValidationError> {
        check_required(RequiredField::Name, self.name.as_deref().unwrap_or_default())?;
        check_required(
            RequiredField::Description,
            self.description.as_deref().unwrap_or_default(),
        )?;
        check_required(
            RequiredField::ImageUrl,
            self.image_url.as_deref().unwrap_or_default(),
        )
    }

    /// Builds a `CardRecord` or reports the first broken invariant.
    ///
    /// Fields are checked in declaration order. Absent keywords fall back to
    /// [`DEFAULT_KEYWORDS`]; call [`CardDraft::with_defaults`] first to use a
    /// configured tag instead.
    pub fn validate(&self) -> Result<CardRecord, CardValidationError> {
        let name = required_text(RequiredField::Name, self.name.as_deref())?;
        let description = required_text(RequiredField::Description, self.description.as_deref())?;
        let image_url = required_text(RequiredField::ImageUrl, self.image_url.as_deref())?;
        let latitude = self
            .latitude
            .ok_or(CardValidationError::MissingField(RequiredField::Latitude))?;
        let longitude = self
            .longitude
            .ok_or(CardValidationError::MissingField(RequiredField::Longitude))?;
        Coordinates::new(latitude, longitude).validate()?;

        Ok(CardRecord {
            name,
            description,
            image_url,
            latitude,
            longitude,
            keywords: self
                .keywords
                .clone()
                .unwrap_or_else(|| DEFAULT_KEYWORDS.to_string()),
        })
    }
}

/// Required card fields, used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Name,
    Description,
    ImageUrl,
    Latitude,
    Longitude,
}

impl RequiredField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::ImageUrl => "image_url",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateAxis {
    Latitude,
    Longitude,
}

/// Card invariant violations.
#[derive(Debug, Clone, PartialEq)]
pub enum CardValidationError {
    MissingField(RequiredField),
    NonFiniteCoordinate(CoordinateAxis),
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl Display for CardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{}` is empty", field.as_str()),
            Self::NonFiniteCoordinate(CoordinateAxis::Latitude) => {
                write!(f, "latitude is not a finite number")
            }
            Self::NonFiniteCoordinate(CoordinateAxis::Longitude) => {
                write!(f, "longitude is not a finite number")
            }
            Self::LatitudeOutOfRange(value) => {
                write!(f, "latitude {value} is outside -90..=90")
            }
            Self::LongitudeOutOfRange(value) => {
                write!(f, "longitude {value} is outside -180..=180")
            }
        }
    }
}

impl Error for CardValidationError {}

/// Extracts `#tag` tokens from free-form keyword text.
pub fn keyword_tags(keywords: &str) -> Vec<String> {
    KEYWORD_TAG_RE
        .find_iter(keywords)
        .map(|found| found.as_str().to_string())
        .collect()
}

fn default_keywords() -> String {
    DEFAULT_KEYWORDS.to_string()
}

fn required_text(field: RequiredField, value: Option<&str>) -> Result<String, CardValidationError> {
    let value = value.unwrap_or_default();
    check_required(field, value)?;
    Ok(value.to_string())
}

fn check_required(field: RequiredField, value: &str) -> Result<(), CardValidationError> {
    if value.trim().is_empty() {
        return Err(CardValidationError::MissingField(field));
    }
    Ok(())
}

fn check_coordinate(axis: CoordinateAxis, value: f64) -> Result<(), CardValidationError> {
    if !value.is_finite() {
        return Err(CardValidationError::NonFiniteCoordinate(axis));
    }
    match axis {
        CoordinateAxis::Latitude if value < LATITUDE_RANGE.0 || value > LATITUDE_RANGE.1 => {
            Err(CardValidationError::LatitudeOutOfRange(value))
        }
        CoordinateAxis::Longitude if value < LONGITUDE_RANGE.0 || value > LONGITUDE_RANGE.1 => {
            Err(CardValidationError::LongitudeOutOfRange(value))
        }
        _ => Ok(()),
    }
}

/// Accepts a JSON number or a numeric string. `NaN` and infinities are
/// rejected even though `str::parse` would take them.
///
/// Older boards stored coordinates copied out of element attributes, which
/// are strings.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientF64;

    impl Visitor<'_> for LenientF64 {
        type Value = f64;

        fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
            match value.trim().parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => Ok(parsed),
                _ => Err(E::custom(format!("`{value}` is not a finite number"))),
            }
        }
    }

    deserializer.deserialize_any(LenientF64)
}

#[cfg(test)]
mod tests {
    use super::{keyword_tags, CardDraft, CardValidationError, CoordinateAxis, RequiredField};

    fn complete_draft() -> CardDraft {
        CardDraft {
            name: Some("Cafe Yeonnam".to_string()),
            description: Some("quiet corner".to_string()),
            image_url: Some("img.jpg".to_string()),
            latitude: Some(37.5615),
            longitude: Some(126.9259),
            keywords: None,
        }
    }

    #[test]
    fn with_defaults_fills_blank_keywords_only() {
        let filled = complete_draft().with_defaults("#tag");
        assert_eq!(filled.keywords.as_deref(), Some("#tag"));

        let mut blank = complete_draft();
        blank.keywords = Some("   ".to_string());
        assert_eq!(blank.with_defaults("#tag").keywords.as_deref(), Some("#tag"));

        let mut kept = complete_draft();
        kept.keywords = Some("#소금빵".to_string());
        assert_eq!(kept.with_defaults("#tag").keywords.as_deref(), Some("#소금빵"));
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let mut draft = complete_draft();
        draft.description = Some("  ".to_string());
        assert_eq!(
            draft.validate().expect_err("blank description must fail"),
            CardValidationError::MissingField(RequiredField::Description)
        );
    }

    #[test]
    fn validate_rejects_nan_and_out_of_range() {
        let mut draft = complete_draft();
        draft.latitude = Some(f64::NAN);
        assert_eq!(
            draft.validate().expect_err("NaN latitude must fail"),
            CardValidationError::NonFiniteCoordinate(CoordinateAxis::Latitude)
        );

        let mut draft = complete_draft();
        draft.longitude = Some(180.5);
        assert_eq!(
            draft.validate().expect_err("out of range longitude must fail"),
            CardValidationError::LongitudeOutOfRange(180.5)
        );
    }

    #[test]
    fn validate_accepts_range_boundaries() {
        let mut draft = complete_draft();
        draft.latitude = Some(-90.0);
        draft.longitude = Some(180.0);
        draft.validate().expect("boundaries are inclusive");
    }

    #[test]
    fn keyword_tags_splits_on_whitespace_and_hashes() {
        assert_eq!(
            keyword_tags("#연남동 #소금빵#뷰맛집  plain"),
            vec!["#연남동", "#소금빵", "#뷰맛집"]
        );
        assert!(keyword_tags("no tags here").is_empty());
    }
}
