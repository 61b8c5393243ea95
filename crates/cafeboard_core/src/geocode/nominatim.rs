//! Nominatim (OpenStreetMap) search client.

use crate::config::GeocoderConfig;
use crate::geocode::{GeocodeCandidate, GeocodeError, Geocoder, HttpTransport};
use crate::model::card::{lenient_f64, Coordinates};
use log::{info, warn};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde(deserialize_with = "lenient_f64")]
    lat: f64,
    #[serde(deserialize_with = "lenient_f64")]
    lon: f64,
    #[serde(default)]
    display_name: Option<String>,
}

pub struct NominatimGeocoder<T: HttpTransport> {
    transport: T,
    endpoint: String,
}

impl<T: HttpTransport> NominatimGeocoder<T> {
    pub fn new(transport: T, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    /// Client for the endpoint configured in `config`.
    pub fn from_config(transport: T, config: &GeocoderConfig) -> Self {
        Self::new(transport, config.endpoint.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Search URL for `address`, JSON output format.
    pub fn search_url(&self, address: &str) -> String {
        format!(
            "{}?format=json&q={}",
            self.endpoint.trim_end_matches('?'),
            urlencoding::encode(address)
        )
    }
}

impl<T: HttpTransport> Geocoder for NominatimGeocoder<T> {
    fn lookup(&self, address: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let body = self.transport.get(&self.search_url(address)).inspect_err(|err| {
            warn!("event=geocode_lookup module=geocode status=error stage=transport error={err}");
        })?;
        let candidates = parse_search_response(&body)?;
        info!(
            "event=geocode_lookup module=geocode status=ok address_chars={} candidates={}",
            address.chars().count(),
            candidates.len()
        );
        Ok(candidates)
    }
}

/// Parses a Nominatim `format=json` search body.
///
/// Coordinates arrive as decimal strings; numbers are accepted too.
pub fn parse_search_response(body: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|err| GeocodeError::Malformed(err.to_string()))?;
    Ok(places
        .into_iter()
        .map(|place| GeocodeCandidate {
            coordinates: Coordinates::new(place.lat, place.lon),
            display_name: place.display_name,
        })
        .collect())
}
