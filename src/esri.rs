//! The [Esri ArcGIS World](https://developers.arcgis.com/rest/geocode/api-reference/overview-world-geocoding-service.htm)
//! geocoding service.
//!
//! Supports forward geocoding with discrete address fields and any output spatial reference,
//! and reverse geocoding of a single point.
//!
//! ### Example
//!
//! ```no_run
//! use geocoder_facade::{Esri, GeocodeRequest, Geocoder, SpatialReference};
//!
//! let geocoder = Geocoder::new(Esri::new()).unwrap();
//! let request = GeocodeRequest::new("1375 E Buena Vista Dr", SpatialReference::WGS84)
//!     .with_city("Orlando")
//!     .with_region("FL")
//!     .with_country("USA");
//! let candidates = geocoder.geocode(&request).unwrap();
//! assert!(!candidates.is_empty());
//! ```
use crate::provider::{deserialize_lenient_f64, Provider, Query, ReverseProvider};
use crate::{Candidate, GeocodeRequest, GeocodingError, Location, Point, ProviderError, Score};
use serde::Deserialize;
use serde_json::Value;

const FIND_CANDIDATES_PATH: &str = "arcgis/rest/services/World/GeocodeServer/findAddressCandidates";
const REVERSE_PATH: &str = "arcgis/rest/services/World/GeocodeServer/reverseGeocode";

// Reverse lookups with no address nearby answer with this error code
const ADDRESS_NOT_FOUND: i64 = 400;

/// An instance of the Esri ArcGIS World geocoding service
#[derive(Clone, Debug)]
pub struct Esri {
    endpoint: String,
    path: String,
    reverse_path: String,
}

impl Esri {
    /// Create a new Esri instance using the default endpoint
    pub fn new() -> Self {
        Esri {
            endpoint: "https://geocode.arcgis.com/".to_string(),
            path: FIND_CANDIDATES_PATH.to_string(),
            reverse_path: REVERSE_PATH.to_string(),
        }
    }

    /// Set a custom endpoint
    ///
    /// Endpoint should include a trailing slash (i.e. "https://geocode.arcgis.com/")
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_owned();
        self
    }

    /// Set a custom `findAddressCandidates` path, e.g. for a self-hosted locator
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_owned();
        self
    }
}

impl Default for Esri {
    fn default() -> Self {
        Esri::new()
    }
}

impl Provider for Esri {
    fn name(&self) -> &'static str {
        "Esri"
    }

    fn endpoint(&self, _request: &GeocodeRequest) -> String {
        format!("{}{}", self.endpoint, self.path)
    }

    fn build_query(&self, request: &GeocodeRequest) -> Query {
        let mut query = vec![
            ("f", "json".to_string()),
            ("address", request.address().to_string()),
        ];
        add_optional_param!(query, request.neighborhood(), "neighborhood");
        add_optional_param!(query, request.city(), "city");
        add_optional_param!(query, request.region(), "region");
        add_optional_param!(query, request.postal_code(), "postal");
        add_optional_param!(query, request.country(), "countryCode");
        query.push(("outSR", request.spatial_reference().to_string()));
        query
    }

    fn map_response(&self, body: Value) -> Result<Vec<Candidate>, GeocodingError> {
        let res: EsriResponse = serde_json::from_value(body)?;
        if let Some(error) = res.error {
            return Err(error.into_status().into());
        }
        if res.candidates.is_empty() {
            return Err(GeocodingError::NoCandidatesFound);
        }
        Ok(res
            .candidates
            .into_iter()
            .map(|c| {
                Candidate::new(
                    c.address,
                    Point::new(c.location.x, c.location.y),
                    Some(c.score),
                )
            })
            .collect())
    }
}

impl ReverseProvider for Esri {
    fn name(&self) -> &'static str {
        "Esri"
    }

    fn reverse_endpoint(&self) -> String {
        format!("{}{}", self.endpoint, self.reverse_path)
    }

    fn build_reverse_query(&self, location: &Location) -> Query {
        vec![
            ("location", format!("{},{}", location.x(), location.y())),
            ("f", "json".to_string()),
        ]
    }

    fn map_reverse_response(&self, body: Value) -> Result<Option<String>, GeocodingError> {
        let res: EsriReverseResponse = serde_json::from_value(body)?;
        match (res.address, res.error) {
            (Some(address), _) => Ok(address.match_addr),
            (None, Some(error)) if error.code == ADDRESS_NOT_FOUND => Ok(None),
            (None, Some(error)) => Err(error.into_status().into()),
            (None, None) => Ok(None),
        }
    }
}

/// The top-level JSON response returned by `findAddressCandidates`
///
///```json
/// {
///   "spatialReference": { "wkid": 4326, "latestWkid": 4326 },
///   "candidates": [
///     {
///       "address": "1375 E Buena Vista Dr, Lake Buena Vista, Florida, 32830",
///       "location": { "x": -81.51982, "y": 28.37014 },
///       "score": 100,
///       "attributes": {},
///       "extent": { "xmin": -81.52082, "ymin": 28.36914, "xmax": -81.51882, "ymax": 28.37114 }
///     }
///   ]
/// }
///```
#[derive(Debug, Deserialize)]
pub struct EsriResponse {
    #[serde(default)]
    pub candidates: Vec<EsriCandidate>,
    pub error: Option<EsriError>,
}

/// A single address candidate
#[derive(Debug, Deserialize)]
pub struct EsriCandidate {
    pub address: String,
    pub location: EsriLocation,
    pub score: Score,
}

#[derive(Debug, Deserialize)]
pub struct EsriLocation {
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub x: f64,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub y: f64,
}

/// The JSON response returned by `reverseGeocode`.
///
/// When nothing is found the service answers with an `error` object instead of `address`.
#[derive(Debug, Deserialize)]
pub struct EsriReverseResponse {
    pub address: Option<EsriReverseAddress>,
    pub error: Option<EsriError>,
}

#[derive(Debug, Deserialize)]
pub struct EsriReverseAddress {
    #[serde(rename = "Match_addr")]
    pub match_addr: Option<String>,
}

/// The `error` object the service sends with an HTTP 200
///
///```json
/// { "error": { "code": 498, "message": "Invalid token.", "details": [] } }
///```
#[derive(Debug, Deserialize)]
pub struct EsriError {
    pub code: i64,
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

impl EsriError {
    fn into_status(self) -> ProviderError {
        let message = match (self.message, self.details.is_empty()) {
            (Some(message), false) => Some(format!("{} {}", message, self.details.join(" "))),
            (message, _) => message,
        };
        ProviderError::Status {
            status: self.code.to_string(),
            message,
        }
    }
}
