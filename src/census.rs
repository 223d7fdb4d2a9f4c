//! The [US Census Bureau Geocoder](https://geocoding.geo.census.gov/geocoder/).
//!
//! Only the single-line address is sent; the service does not score its matches, so every
//! candidate has a `None` score. Matched addresses come back upper-cased.
//!
//! ### Example
//!
//! ```no_run
//! use geocoder_facade::{Census, GeocodeRequest, Geocoder, SpatialReference};
//!
//! let geocoder = Geocoder::new(Census::new()).unwrap();
//! let request = GeocodeRequest::new(
//!     "4600 Silver Hill Rd, Washington, DC, 20233",
//!     SpatialReference::WGS84,
//! );
//! let candidates = geocoder.geocode(&request).unwrap();
//! assert_eq!(candidates[0].address(), "4600 SILVER HILL RD, WASHINGTON, DC, 20233");
//! ```
use crate::provider::{deserialize_lenient_f64, Provider, Query};
use crate::{Candidate, GeocodeRequest, GeocodingError, Point};
use serde::Deserialize;
use serde_json::Value;

/// An instance of the US Census geocoding service
#[derive(Clone, Debug)]
pub struct Census {
    endpoint: String,
    benchmark: String,
}

impl Census {
    /// Create a new Census instance using the current public address ranges
    pub fn new() -> Self {
        Census {
            endpoint: "https://geocoding.geo.census.gov/geocoder/locations/onelineaddress"
                .to_string(),
            benchmark: "Public_AR_Current".to_string(),
        }
    }

    /// Set a custom endpoint (the full URL)
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_owned();
        self
    }

    /// Set the address-range benchmark, e.g. `Public_AR_Census2020`
    pub fn with_benchmark(mut self, benchmark: &str) -> Self {
        self.benchmark = benchmark.to_owned();
        self
    }
}

impl Default for Census {
    fn default() -> Self {
        Census::new()
    }
}

impl Provider for Census {
    fn name(&self) -> &'static str {
        "Census"
    }

    fn endpoint(&self, _request: &GeocodeRequest) -> String {
        self.endpoint.clone()
    }

    fn build_query(&self, request: &GeocodeRequest) -> Query {
        vec![
            ("address", request.address().to_string()),
            ("benchmark", self.benchmark.clone()),
            ("format", "json".to_string()),
        ]
    }

    fn map_response(&self, body: Value) -> Result<Vec<Candidate>, GeocodingError> {
        let res: CensusResponse = serde_json::from_value(body)?;
        if res.result.address_matches.is_empty() {
            return Err(GeocodingError::NoCandidatesFound);
        }
        Ok(res
            .result
            .address_matches
            .into_iter()
            .map(|m| {
                Candidate::new(
                    m.matched_address,
                    Point::new(m.coordinates.x, m.coordinates.y),
                    None,
                )
            })
            .collect())
    }
}

/// The top-level JSON response returned by `onelineaddress`
///
///```json
/// {
///   "result": {
///     "input": {
///       "address": { "address": "4600 Silver Hill Rd, Washington, DC, 20233" },
///       "benchmark": { "benchmarkName": "Public_AR_Current" }
///     },
///     "addressMatches": [
///       {
///         "matchedAddress": "4600 SILVER HILL RD, WASHINGTON, DC, 20233",
///         "coordinates": { "x": -76.92744, "y": 38.845985 },
///         "tigerLine": { "side": "L", "tigerLineId": "76355984" }
///       }
///     ]
///   }
/// }
///```
#[derive(Debug, Deserialize)]
pub struct CensusResponse {
    pub result: CensusResult,
}

#[derive(Debug, Deserialize)]
pub struct CensusResult {
    #[serde(rename = "addressMatches", default)]
    pub address_matches: Vec<CensusMatch>,
}

#[derive(Debug, Deserialize)]
pub struct CensusMatch {
    #[serde(rename = "matchedAddress")]
    pub matched_address: String,
    pub coordinates: CensusCoordinates,
}

#[derive(Debug, Deserialize)]
pub struct CensusCoordinates {
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub x: f64,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub y: f64,
}
