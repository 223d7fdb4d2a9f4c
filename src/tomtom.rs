//! The [TomTom Search API](https://developer.tomtom.com/search-api/documentation/geocoding-service/geocode)
//! geocoding endpoint.
//!
//! The free-text address is encoded into the URL path. Only `Point Address` results are kept;
//! street, geography and cross-street matches are dropped.
use crate::provider::{
    deserialize_lenient_f64, deserialize_lenient_u64, require_api_key, Provider, Query,
};
use crate::{Candidate, GeocodeRequest, GeocodingError, InvalidRequest, Point, Score};
use serde::Deserialize;
use serde_json::Value;
use url::form_urlencoded;

const POINT_ADDRESS: &str = "Point Address";

/// An instance of the TomTom geocoding service
#[derive(Clone, Debug)]
pub struct TomTom {
    api_key: String,
    endpoint: String,
    path: String,
}

impl TomTom {
    /// Create a new TomTom instance using the default endpoint
    pub fn new(api_key: String) -> Self {
        TomTom {
            api_key,
            endpoint: "https://api.tomtom.com/".to_string(),
            path: "search/2/geocode/{path}.json".to_string(),
        }
    }

    /// Set a custom endpoint
    ///
    /// Endpoint should include a trailing slash (i.e. "https://api.tomtom.com/")
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_owned();
        self
    }

    /// Set a custom path template; `{path}` is replaced by the encoded address
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_owned();
        self
    }

    fn free_text(request: &GeocodeRequest) -> String {
        std::iter::once(request.address())
            .chain(request.neighborhood())
            .chain(request.city())
            .chain(request.region())
            .chain(request.country())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Provider for TomTom {
    fn name(&self) -> &'static str {
        "TomTom"
    }

    fn required_srid(&self) -> Option<u32> {
        Some(4326)
    }

    fn check(&self) -> Result<(), InvalidRequest> {
        require_api_key(&self.api_key)
    }

    fn endpoint(&self, request: &GeocodeRequest) -> String {
        let text = TomTom::free_text(request);
        let encoded: String = form_urlencoded::byte_serialize(text.as_bytes()).collect();
        format!("{}{}", self.endpoint, self.path.replacen("{path}", &encoded, 1))
    }

    fn build_query(&self, _request: &GeocodeRequest) -> Query {
        vec![("key", self.api_key.clone())]
    }

    fn map_response(&self, body: Value) -> Result<Vec<Candidate>, GeocodingError> {
        let res: TomTomResponse = serde_json::from_value(body)?;
        if res.summary.total_results == 0 {
            return Err(GeocodingError::NoCandidatesFound);
        }
        // Other result types are dropped before any of their fields are read
        let candidates = res
            .results
            .into_iter()
            .filter(|row| row.get("type").and_then(Value::as_str) == Some(POINT_ADDRESS))
            .map(|row| -> Result<Candidate, GeocodingError> {
                let r: TomTomResult = serde_json::from_value(row)?;
                Ok(Candidate::new(
                    r.address.freeform_address,
                    Point::new(r.position.lon, r.position.lat),
                    Some(Score::Float(r.score)),
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if candidates.is_empty() {
            return Err(GeocodingError::NoCandidatesFound);
        }
        Ok(candidates)
    }
}

/// The top-level JSON response returned by the geocode endpoint
///
///```json
/// {
///   "summary": { "query": "1375 e buena vista dr orlando fl usa", "numResults": 1, "totalResults": 1 },
///   "results": [
///     {
///       "type": "Point Address",
///       "score": 11.0582933426,
///       "address": { "freeformAddress": "1375 East Buena Vista Drive, Lake Buena Vista, FL 32830" },
///       "position": { "lat": 28.37014, "lon": -81.51982 }
///     }
///   ]
/// }
///```
#[derive(Debug, Deserialize)]
pub struct TomTomResponse {
    pub summary: TomTomSummary,
    /// Raw rows; only `Point Address` rows are decoded into [`TomTomResult`]
    #[serde(default)]
    pub results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct TomTomSummary {
    #[serde(rename = "totalResults", deserialize_with = "deserialize_lenient_u64")]
    pub total_results: u64,
}

#[derive(Debug, Deserialize)]
pub struct TomTomResult {
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub score: f64,
    pub address: TomTomAddress,
    pub position: TomTomPosition,
}

#[derive(Debug, Deserialize)]
pub struct TomTomAddress {
    #[serde(rename = "freeformAddress")]
    pub freeform_address: String,
}

#[derive(Debug, Deserialize)]
pub struct TomTomPosition {
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub lon: f64,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::provider::validate;
    use crate::SpatialReference;
    use serde_json::json;

    fn tomtom() -> TomTom {
        TomTom::new("secret".to_string())
    }

    #[test]
    fn blank_api_key_test() {
        let request = GeocodeRequest::new("x", SpatialReference::WGS84);
        assert!(validate(&tomtom(), &request).is_ok());
        assert_eq!(
            validate(&TomTom::new(String::new()), &request),
            Err(InvalidRequest::MissingOption("api_key"))
        );
    }

    #[test]
    fn endpoint_encodes_free_text_test() {
        let request = GeocodeRequest::new("1375 E Buena Vista Dr", SpatialReference::WGS84)
            .with_city("Orlando")
            .with_region("FL")
            .with_country("USA");
        assert_eq!(
            tomtom().endpoint(&request),
            "https://api.tomtom.com/search/2/geocode/1375+E+Buena+Vista+Dr+Orlando+FL+USA.json"
        );
    }

    #[test]
    fn endpoint_escapes_reserved_characters_test() {
        let request = GeocodeRequest::new("3403 8a St SW #2", SpatialReference::WGS84)
            .with_city("Calgary/Alberta");
        assert_eq!(
            tomtom().with_endpoint("http://127.0.0.1/").endpoint(&request),
            "http://127.0.0.1/search/2/geocode/3403+8a+St+SW+%232+Calgary%2FAlberta.json"
        );
    }

    #[test]
    fn build_query_test() {
        let request = GeocodeRequest::new("x", SpatialReference::WGS84).with_city("y");
        assert_eq!(
            tomtom().build_query(&request),
            vec![("key", "secret".to_string())]
        );
    }

    #[test]
    fn requires_wgs84_test() {
        let request = GeocodeRequest::new("x", SpatialReference::new(102100));
        assert!(matches!(
            validate(&tomtom(), &request),
            Err(InvalidRequest::UnsupportedSrid { provider: "TomTom", .. })
        ));
    }

    #[test]
    fn map_response_keeps_point_addresses_test() {
        let body = json!({
            "summary": { "numResults": 3, "totalResults": 3 },
            "results": [
                {
                    "type": "Street",
                    "score": 9.1,
                    "address": { "freeformAddress": "East Buena Vista Drive, Lake Buena Vista, FL" },
                    "position": { "lat": 28.371, "lon": -81.52 }
                },
                {
                    "type": "Point Address",
                    "score": 11.0582933426,
                    "address": { "freeformAddress": "1375 East Buena Vista Drive, Lake Buena Vista, FL 32830" },
                    "position": { "lat": "28.37014", "lon": "-81.51982" }
                },
                {
                    "type": "Geography",
                    "score": 3.2,
                    "address": { "freeformAddress": "Orlando, FL" },
                    "position": { "lat": 28.53, "lon": -81.37 }
                }
            ]
        });
        let candidates = tomtom().map_response(body).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].address(),
            "1375 East Buena Vista Drive, Lake Buena Vista, FL 32830"
        );
        assert_eq!(candidates[0].location(), Point::new(-81.51982, 28.37014));
        assert_eq!(candidates[0].score(), Some(Score::Float(11.0582933426)));
    }

    #[test]
    fn map_response_skips_sparse_rows_test() {
        let body = json!({
            "summary": { "totalResults": 2 },
            "results": [
                {
                    "type": "Geography",
                    "address": { "country": "United States" },
                    "position": { "lat": 37.0, "lon": -95.7 }
                },
                {
                    "type": "Point Address",
                    "score": 9.0,
                    "address": { "freeformAddress": "4600 Silver Hill Road, Suitland, MD 20746" },
                    "position": { "lat": 38.84717, "lon": -76.93067 }
                }
            ]
        });
        let candidates = tomtom().map_response(body).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].score(), Some(Score::Float(9.0)));
    }

    #[test]
    fn map_response_broken_point_address_test() {
        let body = json!({
            "summary": { "totalResults": 1 },
            "results": [{ "type": "Point Address", "position": { "lat": 1.0, "lon": 2.0 } }]
        });
        assert!(matches!(
            tomtom().map_response(body),
            Err(GeocodingError::Provider(_))
        ));
    }

    #[test]
    fn map_response_zero_total_test() {
        let err = tomtom()
            .map_response(json!({ "summary": { "totalResults": 0 }, "results": [] }))
            .unwrap_err();
        assert!(err.is_no_candidates());
    }

    #[test]
    fn map_response_no_point_address_test() {
        let body = json!({
            "summary": { "totalResults": 1 },
            "results": [{
                "type": "Geography",
                "score": 3.2,
                "address": { "freeformAddress": "Orlando, FL" },
                "position": { "lat": 28.53, "lon": -81.37 }
            }]
        });
        assert!(tomtom().map_response(body).unwrap_err().is_no_candidates());
    }
}
