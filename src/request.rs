//! Generic request types shared by every provider.
//!
//! A [`GeocodeRequest`](struct.GeocodeRequest.html) can be assembled with its builder methods or
//! resolved from a loosely typed option map with
//! [`GeocodeRequest::from_options`](struct.GeocodeRequest.html#method.from_options).
//! Either way, [`validate`](struct.GeocodeRequest.html#method.validate) runs before a provider
//! sees the request.
use crate::error::InvalidRequest;
use crate::Point;
use serde_json::{Map, Value};
use std::convert::TryFrom;
use std::fmt;

/// Option key for the street address
pub const ADDRESS: &str = "address";
/// Option key for the neighborhood (smallest administrative area)
pub const NEIGHBORHOOD: &str = "neighborhood";
/// Option key for the city or municipality
pub const CITY: &str = "city";
/// Option key for the region (state, province)
pub const REGION: &str = "region";
/// Option key for the postal code
pub const POSTAL_CODE: &str = "postal_code";
/// Option key for the country (ISO 3166-1 alpha-3)
pub const COUNTRY: &str = "country";
/// Option key for the spatial reference
pub const FACTORY: &str = "factory";
/// Option key for a provider API key
pub const API_KEY: &str = "api_key";

/// Spatial reference of the requested output locations
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpatialReference {
    srid: u32,
}

impl SpatialReference {
    /// Geographic WGS84
    pub const WGS84: SpatialReference = SpatialReference { srid: 4326 };

    pub const fn new(srid: u32) -> Self {
        SpatialReference { srid }
    }

    pub const fn srid(&self) -> u32 {
        self.srid
    }

    fn from_option(value: &Value) -> Result<Self, InvalidRequest> {
        let srid = match value {
            Value::Number(_) => value.as_u64(),
            Value::Object(map) => map.get("srid").and_then(Value::as_u64),
            _ => None,
        };
        srid.and_then(|s| u32::try_from(s).ok())
            .map(SpatialReference::new)
            .ok_or(InvalidRequest::InvalidType {
                option: FACTORY,
                expected: "an SRID or an object with an `srid` field",
            })
    }
}

impl Default for SpatialReference {
    fn default() -> Self {
        SpatialReference::WGS84
    }
}

impl fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.srid)
    }
}

/// A forward-geocoding request
///
/// # Example:
///
/// ```
/// use geocoder_facade::{GeocodeRequest, SpatialReference};
///
/// let request = GeocodeRequest::new("1375 E Buena Vista Dr", SpatialReference::WGS84)
///     .with_city("Orlando")
///     .with_region("FL")
///     .with_country("USA");
/// assert!(request.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GeocodeRequest {
    address: String,
    spatial_reference: SpatialReference,
    neighborhood: Option<String>,
    city: Option<String>,
    region: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
}

impl GeocodeRequest {
    pub fn new<S>(address: S, spatial_reference: SpatialReference) -> Self
    where
        S: Into<String>,
    {
        GeocodeRequest {
            address: address.into(),
            spatial_reference,
            neighborhood: None,
            city: None,
            region: None,
            postal_code: None,
            country: None,
        }
    }

    /// Set the `neighborhood` property
    pub fn with_neighborhood<S: Into<String>>(mut self, neighborhood: S) -> Self {
        self.neighborhood = Some(neighborhood.into());
        self
    }

    /// Set the `city` property
    pub fn with_city<S: Into<String>>(mut self, city: S) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Set the `region` property
    pub fn with_region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the `postal_code` property; must not be an extended postal code
    pub fn with_postal_code<S: ToString>(mut self, postal_code: S) -> Self {
        self.postal_code = Some(postal_code.to_string());
        self
    }

    /// Set the `country` property (ISO 3166-1 alpha-3, e.g. `USA`)
    pub fn with_country<S: Into<String>>(mut self, country: S) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Resolve a request from an option map.
    ///
    /// Required keys are checked first, then the type of every known key.
    /// Unknown keys are ignored so provider-specific options can share the map.
    ///
    /// ```
    /// use geocoder_facade::GeocodeRequest;
    /// use serde_json::json;
    ///
    /// let options = json!({
    ///     "address": "3403 8a St SW",
    ///     "city": "Calgary",
    ///     "postal_code": "T2T 3B3",
    ///     "factory": { "srid": 4326 }
    /// });
    /// let request = GeocodeRequest::from_options(options.as_object().unwrap()).unwrap();
    /// assert_eq!(request.city(), Some("Calgary"));
    /// ```
    pub fn from_options(options: &Map<String, Value>) -> Result<Self, InvalidRequest> {
        for key in &[FACTORY, ADDRESS] {
            if options.get(*key).map_or(true, Value::is_null) {
                return Err(InvalidRequest::MissingOption(*key));
            }
        }

        let spatial_reference = SpatialReference::from_option(&options[FACTORY])?;
        let address = string_option(options, ADDRESS)?.unwrap_or_default();
        let request = GeocodeRequest {
            address,
            spatial_reference,
            neighborhood: string_option(options, NEIGHBORHOOD)?,
            city: string_option(options, CITY)?,
            region: string_option(options, REGION)?,
            postal_code: postal_code_option(options)?,
            country: string_option(options, COUNTRY)?,
        };
        request.validate()?;
        Ok(request)
    }

    /// Check the value constraints shared by every provider
    pub fn validate(&self) -> Result<(), InvalidRequest> {
        if self.address.trim().is_empty() {
            return Err(InvalidRequest::InvalidValue {
                option: ADDRESS,
                reason: "address must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Check that the requested spatial reference matches what a provider supports
    pub fn require_srid(&self, provider: &'static str, expected: u32) -> Result<(), InvalidRequest> {
        let actual = self.spatial_reference.srid();
        if actual != expected {
            return Err(InvalidRequest::UnsupportedSrid {
                provider,
                expected,
                actual,
            });
        }
        Ok(())
    }

    pub fn address(&self) -> &str {
        self.address.trim()
    }

    pub fn spatial_reference(&self) -> SpatialReference {
        self.spatial_reference
    }

    pub fn neighborhood(&self) -> Option<&str> {
        present(&self.neighborhood)
    }

    pub fn city(&self) -> Option<&str> {
        present(&self.city)
    }

    pub fn region(&self) -> Option<&str> {
        present(&self.region)
    }

    pub fn postal_code(&self) -> Option<&str> {
        present(&self.postal_code)
    }

    pub fn country(&self) -> Option<&str> {
        present(&self.country)
    }
}

// Blank values count as absent so they never reach a provider query
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn string_option(
    options: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, InvalidRequest> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(InvalidRequest::InvalidType {
            option: key,
            expected: "a string",
        }),
    }
}

fn postal_code_option(options: &Map<String, Value>) -> Result<Option<String>, InvalidRequest> {
    match options.get(POSTAL_CODE) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(Some(n.to_string())),
        Some(_) => Err(InvalidRequest::InvalidType {
            option: POSTAL_CODE,
            expected: "a string or an integer",
        }),
    }
}

/// A coordinate pair to reverse-geocode, always in `[x, y]` (longitude, latitude) order
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Location {
    x: f64,
    y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Result<Self, InvalidRequest> {
        if !x.is_finite() || !y.is_finite() {
            return Err(InvalidRequest::NonNumericCoordinate);
        }
        Ok(Location { x, y })
    }

    /// Resolve a location from `[x, y]` or `{"x": .., "y": ..}`.
    ///
    /// Numeric strings are accepted; anything else that is present but not a
    /// number is rejected.
    pub fn from_value(value: &Value) -> Result<Self, InvalidRequest> {
        let (x, y) = match value {
            Value::Array(pair) => (pair.get(0), pair.get(1)),
            Value::Object(map) => (map.get("x"), map.get("y")),
            _ => (None, None),
        };
        let x = x
            .filter(|v| !v.is_null())
            .ok_or(InvalidRequest::MissingLongitude)?;
        let y = y
            .filter(|v| !v.is_null())
            .ok_or(InvalidRequest::MissingLatitude)?;
        Location::new(coordinate(x)?, coordinate(y)?)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

fn coordinate(value: &Value) -> Result<f64, InvalidRequest> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or(InvalidRequest::NonNumericCoordinate)
}

impl TryFrom<(f64, f64)> for Location {
    type Error = InvalidRequest;

    fn try_from((x, y): (f64, f64)) -> Result<Self, Self::Error> {
        Location::new(x, y)
    }
}

impl TryFrom<[f64; 2]> for Location {
    type Error = InvalidRequest;

    fn try_from(pair: [f64; 2]) -> Result<Self, Self::Error> {
        Location::new(pair[0], pair[1])
    }
}

impl TryFrom<Point<f64>> for Location {
    type Error = InvalidRequest;

    fn try_from(point: Point<f64>) -> Result<Self, Self::Error> {
        Location::new(point.x(), point.y())
    }
}

impl TryFrom<&Value> for Location {
    type Error = InvalidRequest;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Location::from_value(value)
    }
}

impl From<Location> for Point<f64> {
    fn from(location: Location) -> Point<f64> {
        Point::new(location.x, location.y)
    }
}
