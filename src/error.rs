use std::convert::Infallible;
use thiserror::Error;

/// Errors that can occur during geocoding operations
#[derive(Error, Debug)]
pub enum GeocodingError {
    /// The request was rejected before anything was sent to the provider
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] InvalidRequest),
    /// The provider answered successfully but reported zero matches
    #[error("no address candidates found")]
    NoCandidatesFound,
    /// The provider could not be reached or answered with something unusable
    #[error("unable to geocode address")]
    Provider(#[from] ProviderError),
}

impl GeocodingError {
    /// `true` for the "valid but empty" outcome of a forward lookup
    pub fn is_no_candidates(&self) -> bool {
        matches!(self, GeocodingError::NoCandidatesFound)
    }
}

impl From<reqwest::Error> for GeocodingError {
    fn from(err: reqwest::Error) -> Self {
        GeocodingError::Provider(ProviderError::Request(err))
    }
}

impl From<serde_json::Error> for GeocodingError {
    fn from(err: serde_json::Error) -> Self {
        GeocodingError::Provider(ProviderError::Decode(err))
    }
}

/// Validation failures, always raised before a network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRequest {
    #[error("missing required option `{0}`")]
    MissingOption(&'static str),
    #[error("option `{option}` must be {expected}")]
    InvalidType {
        option: &'static str,
        expected: &'static str,
    },
    #[error("option `{option}` is invalid: {reason}")]
    InvalidValue {
        option: &'static str,
        reason: String,
    },
    #[error("{provider} requires SRID {expected}, got {actual}")]
    UnsupportedSrid {
        provider: &'static str,
        expected: u32,
        actual: u32,
    },
    #[error("missing longitude")]
    MissingLongitude,
    #[error("missing latitude")]
    MissingLatitude,
    #[error("non-numeric coordinate")]
    NonNumericCoordinate,
}

impl From<Infallible> for InvalidRequest {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Service and transport failures
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request error")]
    Request(#[from] reqwest::Error),
    #[error("malformed provider response")]
    Decode(#[from] serde_json::Error),
    #[error("provider reported status `{status}`")]
    Status {
        status: String,
        message: Option<String>,
    },
    #[error("unrecognized location type `{0}`")]
    UnknownLocationType(String),
}
