//! Address-to-coordinate lookup boundary.
//!
//! # Responsibility
//! - Define the geocoder contract the creation flow depends on.
//! - Provide a Nominatim search implementation over an injected transport.
//!
//! # Invariants
//! - A lookup is a single attempt; there is no retry.
//! - Candidates keep the provider's order; callers use the first one.

use crate::model::card::Coordinates;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod nominatim;

/// One lookup result.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    pub coordinates: Coordinates,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    /// Request could not be completed (network, HTTP status).
    Transport(String),
    /// Response body did not have the expected shape.
    Malformed(String),
}

impl Display for GeocodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "geocoder request failed: {message}"),
            Self::Malformed(message) => write!(f, "geocoder response malformed: {message}"),
        }
    }
}

impl Error for GeocodeError {}

/// Resolves free-text addresses.
pub trait Geocoder {
    fn lookup(&self, address: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError>;
}

/// HTTP GET returning the response body as text.
pub trait HttpTransport {
    fn get(&self, url: &str) -> Result<String, GeocodeError>;
}
