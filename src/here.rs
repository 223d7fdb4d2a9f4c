//! The [HERE Geocoding & Search API](https://developer.here.com/documentation/geocoding-search-api/).
//!
//! HERE only works in WGS84, so requests must use SRID 4326. Forward lookups use a free-text
//! `q` plus a qualified `qq` query; reverse lookups send `at=lat,lng` and a language tag.
use crate::provider::{
    deserialize_lenient_f64, require_api_key, Provider, Query, ReverseProvider,
};
use crate::{Candidate, GeocodeRequest, GeocodingError, InvalidRequest, Location, Point, Score};
use serde::Deserialize;
use serde_json::Value;

/// An instance of the HERE geocoding and search service
#[derive(Clone, Debug)]
pub struct Here {
    api_key: String,
    endpoint: String,
    reverse_endpoint: String,
    locale: String,
}

impl Here {
    /// Create a new HERE instance using the default endpoints and the `en-US` locale
    pub fn new(api_key: String) -> Self {
        Here {
            api_key,
            endpoint: "https://geocode.search.hereapi.com/v1/geocode".to_string(),
            reverse_endpoint: "https://revgeocode.search.hereapi.com/v1/revgeocode".to_string(),
            locale: "en-US".to_string(),
        }
    }

    /// Set a custom forward-geocoding endpoint (the full URL)
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_owned();
        self
    }

    /// Set a custom reverse-geocoding endpoint (the full URL)
    pub fn with_reverse_endpoint(mut self, endpoint: &str) -> Self {
        self.reverse_endpoint = endpoint.to_owned();
        self
    }

    /// Set the BCP 47 language tag used for reverse-geocoded addresses
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_owned();
        self
    }
}

impl Provider for Here {
    fn name(&self) -> &'static str {
        "HERE"
    }

    fn required_srid(&self) -> Option<u32> {
        Some(4326)
    }

    fn check(&self) -> Result<(), InvalidRequest> {
        require_api_key(&self.api_key)
    }

    fn endpoint(&self, _request: &GeocodeRequest) -> String {
        self.endpoint.clone()
    }

    fn build_query(&self, request: &GeocodeRequest) -> Query {
        let qualified = [
            ("city", request.city()),
            ("district", request.neighborhood()),
            ("state", request.region()),
            ("country", request.country()),
        ]
        .iter()
        .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, v)))
        .collect::<Vec<_>>()
        .join(";");

        let mut query = vec![("q", request.address().to_string())];
        if !qualified.is_empty() {
            query.push(("qq", qualified));
        }
        query.push(("apikey", self.api_key.clone()));
        query
    }

    fn map_response(&self, body: Value) -> Result<Vec<Candidate>, GeocodingError> {
        let res: HereResponse = serde_json::from_value(body)?;
        if res.items.is_empty() {
            return Err(GeocodingError::NoCandidatesFound);
        }
        Ok(res
            .items
            .into_iter()
            .map(|item| {
                let score = item.scoring.map(|s| Score::Float(s.query_score * 100.0));
                Candidate::new(
                    item.title,
                    Point::new(item.position.lng, item.position.lat),
                    score,
                )
            })
            .collect())
    }
}

impl ReverseProvider for Here {
    fn name(&self) -> &'static str {
        "HERE"
    }

    fn check(&self) -> Result<(), InvalidRequest> {
        require_api_key(&self.api_key)
    }

    fn reverse_endpoint(&self) -> String {
        self.reverse_endpoint.clone()
    }

    fn build_reverse_query(&self, location: &Location) -> Query {
        vec![
            ("at", format!("{},{}", location.y(), location.x())),
            ("lang", self.locale.clone()),
            ("apiKey", self.api_key.clone()),
        ]
    }

    fn map_reverse_response(&self, body: Value) -> Result<Option<String>, GeocodingError> {
        let res: HereReverseResponse = serde_json::from_value(body)?;
        Ok(res
            .items
            .into_iter()
            .next()
            .and_then(|item| item.address.label))
    }
}

/// The top-level JSON response returned by `/v1/geocode`
///
///```json
/// {
///   "items": [
///     {
///       "title": "1375 E Buena Vista Dr, Orlando, FL 32830-8402, United States",
///       "resultType": "houseNumber",
///       "position": { "lat": 28.37014, "lng": -81.51982 },
///       "scoring": { "queryScore": 1.0, "fieldScore": { "city": 1.0, "streets": [1.0] } }
///     }
///   ]
/// }
///```
#[derive(Debug, Deserialize)]
pub struct HereResponse {
    pub items: Vec<HereItem>,
}

#[derive(Debug, Deserialize)]
pub struct HereItem {
    pub title: String,
    pub position: HerePosition,
    pub scoring: Option<HereScoring>,
}

#[derive(Debug, Deserialize)]
pub struct HerePosition {
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "deserialize_lenient_f64")]
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct HereScoring {
    #[serde(rename = "queryScore", deserialize_with = "deserialize_lenient_f64")]
    pub query_score: f64,
}

/// The top-level JSON response returned by `/v1/revgeocode`
#[derive(Debug, Deserialize)]
pub struct HereReverseResponse {
    #[serde(default)]
    pub items: Vec<HereReverseItem>,
}

#[derive(Debug, Deserialize)]
pub struct HereReverseItem {
    pub address: HereAddress,
}

#[derive(Debug, Deserialize)]
pub struct HereAddress {
    pub label: Option<String>,
}
