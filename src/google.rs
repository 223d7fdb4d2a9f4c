//! The [Google Geocoding API](https://developers.google.com/maps/documentation/geocoding/overview).
//!
//! Google does not return a numeric match score; the candidate score is derived from the
//! result's `location_type` (see [`LocationType`](enum.LocationType.html)).
use crate::provider::{deserialize_lenient_f64, require_api_key, Provider, Query};
use crate::{
    Candidate, GeocodeRequest, GeocodingError, InvalidRequest, Point, ProviderError, Score,
};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

/// An instance of the Google geocoding service
#[derive(Clone, Debug)]
pub struct Google {
    api_key: String,
    endpoint: String,
    path: String,
}

impl Google {
    /// Create a new Google geocoding instance
    pub fn new(api_key: String) -> Self {
        Google {
            api_key,
            endpoint: "https://maps.googleapis.com/".to_string(),
            path: "maps/api/geocode/json".to_string(),
        }
    }

    /// Set a custom endpoint
    ///
    /// Endpoint should include a trailing slash (i.e. "https://maps.googleapis.com/")
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_owned();
        self
    }
}

/// How precisely Google placed a result, from best to worst
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LocationType {
    Rooftop,
    RangeInterpolated,
    GeometricCenter,
    Approximate,
}

impl LocationType {
    /// The fixed 0–100 score assigned to each category
    pub const fn score(self) -> i64 {
        match self {
            LocationType::Rooftop => 100,
            LocationType::RangeInterpolated => 80,
            LocationType::GeometricCenter => 60,
            LocationType::Approximate => 50,
        }
    }
}

impl FromStr for LocationType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROOFTOP" => Ok(LocationType::Rooftop),
            "RANGE_INTERPOLATED" => Ok(LocationType::RangeInterpolated),
            "GEOMETRIC_CENTER" => Ok(LocationType::GeometricCenter),
            "APPROXIMATE" => Ok(LocationType::Approximate),
            other => Err(ProviderError::UnknownLocationType(other.to_string())),
        }
    }
}

impl Provider for Google {
    fn name(&self) -> &'static str {
        "Google"
    }

    fn check(&self) -> Result<(), InvalidRequest> {
        require_api_key(&self.api_key)
    }

    fn endpoint(&self, _request: &GeocodeRequest) -> String {
        format!("{}{}", self.endpoint, self.path)
    }

    fn build_query(&self, request: &GeocodeRequest) -> Query {
        let address = std::iter::once(request.address())
            .chain(request.neighborhood())
            .chain(request.city())
            .chain(request.region())
            .collect::<Vec<_>>()
            .join(", ");

        let mut components = vec![];
        if let Some(country) = request.country() {
            components.push(format!("country:{}", country));
        }
        if let Some(postal_code) = request.postal_code() {
            components.push(format!("postal_code:{}", postal_code));
        }

        let mut query = vec![("address", address)];
        if !components.is_empty() {
            query.push(("components", components.join("|")));
        }
        query.push(("key", self.api_key.clone()));
        query
    }

    fn map_response(&self, body: Value) -> Result<Vec<Candidate>, GeocodingError> {
        let res: GoogleResponse = serde_json::from_value(body)?;
        match res.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Err(GeocodingError::NoCandidatesFound),
            _ => {
                return Err(ProviderError::Status {
                    status: res.status,
                    message: res.error_message,
                }
                .into())
            }
        }

        res.results
            .into_iter()
            .map(|result| -> Result<Candidate, GeocodingError> {
                let location_type: LocationType = result.geometry.location_type.parse()?;
                Ok(Candidate::new(
                    result.formatted_address,
                    Point::new(result.geometry.location.lng, result.geometry.location.lat),
                    Some(Score::Int(location_type.score())),
                ))
            })
            .collect()
    }
}

/// The top-level JSON response returned by a geocoding request
///
///```json
/// {
///   "results": [
///     {
///       "formatted_address": "1375 E Buena Vista Dr, Orlando, FL 32830, USA",
///       "geometry": {
///         "location": { "lat": 28.3701384, "lng": -81.5197974 },
///         "location_type": "ROOFTOP"
///       },
///       "place_id": "ChIJ..."
///     }
///   ],
///   "status": "OK"
/// }
///```
#[derive(Debug, Deserialize)]
pub struct GoogleResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GoogleResult>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleResult {
    pub formatted_address: String,
    pub geometry: GoogleGeometry,
}

#[derive(Debug, Deserialize)]
pub struct GoogleGeometry {
    pub location: GoogleLatLng,
    pub location_type: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleLatLng {
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub lng: f64,
}
