//! The contract every provider adapter implements.
//!
//! Adapters are pure: they turn a validated [`GeocodeRequest`](../struct.GeocodeRequest.html) into an
//! endpoint and query, and a decoded JSON body into candidates. Sending the request is the job
//! of a transport (see the `blocking` and `async_impl` modules).
use crate::error::{GeocodingError, InvalidRequest};
use crate::request::API_KEY;
use crate::{Candidate, GeocodeRequest, Location};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Query parameters in the order they are sent
pub type Query = Vec<(&'static str, String)>;

/// A forward-geocoding provider
pub trait Provider {
    /// Short provider name used in logs and error messages
    fn name(&self) -> &'static str;

    /// The SRID this provider requires, if any
    fn required_srid(&self) -> Option<u32> {
        None
    }

    /// Check the adapter's own configuration, such as its API key
    fn check(&self) -> Result<(), InvalidRequest> {
        Ok(())
    }

    /// Absolute URL the request is sent to
    fn endpoint(&self, request: &GeocodeRequest) -> String;

    /// Translate the request into query parameters; absent values are never sent
    fn build_query(&self, request: &GeocodeRequest) -> Query;

    /// Translate a decoded response body into candidates, in provider order
    fn map_response(&self, body: Value) -> Result<Vec<Candidate>, GeocodingError>;
}

impl<P> Provider for Box<P>
where
    P: Provider + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn required_srid(&self) -> Option<u32> {
        (**self).required_srid()
    }

    fn check(&self) -> Result<(), InvalidRequest> {
        (**self).check()
    }

    fn endpoint(&self, request: &GeocodeRequest) -> String {
        (**self).endpoint(request)
    }

    fn build_query(&self, request: &GeocodeRequest) -> Query {
        (**self).build_query(request)
    }

    fn map_response(&self, body: Value) -> Result<Vec<Candidate>, GeocodingError> {
        (**self).map_response(body)
    }
}

/// A reverse-geocoding provider
pub trait ReverseProvider {
    fn name(&self) -> &'static str;

    fn check(&self) -> Result<(), InvalidRequest> {
        Ok(())
    }

    fn reverse_endpoint(&self) -> String;

    // NOTE TO IMPLEMENTERS: Location coordinates are lon, lat (x, y)
    // You may have to provide these coordinates in reverse order,
    // depending on the provider's requirements (see e.g. HERE)
    fn build_reverse_query(&self, location: &Location) -> Query;

    /// The best address at the location, `None` when the provider has none
    fn map_reverse_response(&self, body: Value) -> Result<Option<String>, GeocodingError>;
}

/// Run every check that must pass before the request leaves the process
pub fn validate<P>(provider: &P, request: &GeocodeRequest) -> Result<(), InvalidRequest>
where
    P: Provider + ?Sized,
{
    provider.check()?;
    request.validate()?;
    if let Some(srid) = provider.required_srid() {
        request.require_srid(provider.name(), srid)?;
    }
    Ok(())
}

/// Reject a blank API key; an empty `key=` parameter is never sent
pub fn require_api_key(api_key: &str) -> Result<(), InvalidRequest> {
    if api_key.trim().is_empty() {
        return Err(InvalidRequest::MissingOption(API_KEY));
    }
    Ok(())
}

/// Apply an optional caller filter; an emptied result is still "no candidates"
pub(crate) fn retain<F>(
    mut candidates: Vec<Candidate>,
    filter: Option<F>,
) -> Result<Vec<Candidate>, GeocodingError>
where
    F: FnMut(&Candidate) -> bool,
{
    if let Some(mut keep) = filter {
        candidates.retain(|c| keep(c));
    }
    if candidates.is_empty() {
        return Err(GeocodingError::NoCandidatesFound);
    }
    Ok(candidates)
}

/// Deserialize a number that may arrive as a JSON number or a numeric string
pub fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrFloat {
        String(String),
        Float(f64),
    }

    match StringOrFloat::deserialize(deserializer)? {
        StringOrFloat::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        StringOrFloat::Float(f) => Ok(f),
    }
}

/// Deserialize a count that may arrive as a JSON number or a numeric string
pub fn deserialize_lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(u64),
    }

    match StringOrInt::deserialize(deserializer)? {
        StringOrInt::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        StringOrInt::Int(i) => Ok(i),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Point;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Coordinate {
        #[serde(deserialize_with = "deserialize_lenient_f64")]
        x: f64,
        #[serde(deserialize_with = "deserialize_lenient_u64")]
        count: u64,
    }

    #[test]
    fn string_coordinates_are_coerced() {
        let c: Coordinate = serde_json::from_value(json!({ "x": "-76.93", "count": "3" })).unwrap();
        assert_eq!(c.x, -76.93);
        assert_eq!(c.count, 3);

        let c: Coordinate = serde_json::from_value(json!({ "x": -76.93, "count": 0 })).unwrap();
        assert_eq!(c.x, -76.93);
        assert_eq!(c.count, 0);
    }

    #[test]
    fn garbage_coordinates_fail() {
        assert!(serde_json::from_value::<Coordinate>(json!({ "x": "west", "count": 1 })).is_err());
    }

    #[test]
    fn blank_api_key_is_missing() {
        assert!(require_api_key("abc123").is_ok());
        assert_eq!(
            require_api_key(""),
            Err(InvalidRequest::MissingOption("api_key"))
        );
        assert_eq!(
            require_api_key("  "),
            Err(InvalidRequest::MissingOption("api_key"))
        );
    }

    #[test]
    fn retain_promotes_empty_to_error() {
        let candidates = vec![Candidate::new("A", Point::new(0.0, 0.0), None)];
        let kept = retain(candidates.clone(), None::<fn(&Candidate) -> bool>).unwrap();
        assert_eq!(kept.len(), 1);

        let err = retain(candidates, Some(|c: &Candidate| c.score().is_some())).unwrap_err();
        assert!(err.is_no_candidates());
    }
}
