//! The [Texas A&M Geoservices](https://geoservices.tamu.edu/Services/Geocode/WebService/GeocoderWebServiceDetailed.aspx)
//! geocoding web service (API version 4.01).
//!
//! US addresses only; `neighborhood` and `country` are not sent. The service works in WGS84,
//! so requests must use SRID 4326.
//!
//! Provider-specific settings live in [`TamuOptions`](struct.TamuOptions.html):
//!
//! - `census_year`: any of 1990, 2000 and 2010 (default: all three)
//! - `allow_ties`: return tied matches as-is (default: `true`)
//! - `tie_breaking_strategy`: applied when ties are not allowed; `flipACoin` picks one of the
//!   tied candidates at random, `revertToHierarchy` falls back to the next level of the
//!   geographic hierarchy (default: `revertToHierarchy`)
use crate::error::InvalidRequest;
use crate::provider::{
    deserialize_lenient_f64, deserialize_lenient_u64, require_api_key, Provider, Query,
};
use crate::{Candidate, GeocodeRequest, GeocodingError, Point, Score};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// TAMU Geocoding Service API version
pub const API_VERSION: &str = "4.01";

/// Option key for an API key overriding the one given to [`Tamu::new`](struct.Tamu.html#method.new)
pub use crate::request::API_KEY;
/// Option key for the census year selection
pub const CENSUS_YEAR: &str = "census_year";
/// Option key for the tie policy
pub const ALLOW_TIES: &str = "allow_ties";
/// Option key for the tie-breaking strategy
pub const TIE_BREAKING_STRATEGY: &str = "tie_breaking_strategy";

/// A census vintage the service can match against
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CensusYear {
    Census1990,
    Census2000,
    Census2010,
}

impl CensusYear {
    pub const ALL: [CensusYear; 3] = [
        CensusYear::Census1990,
        CensusYear::Census2000,
        CensusYear::Census2010,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CensusYear::Census1990 => "1990",
            CensusYear::Census2000 => "2000",
            CensusYear::Census2010 => "2010",
        }
    }
}

impl FromStr for CensusYear {
    type Err = InvalidRequest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1990" => Ok(CensusYear::Census1990),
            "2000" => Ok(CensusYear::Census2000),
            "2010" => Ok(CensusYear::Census2010),
            other => Err(InvalidRequest::InvalidValue {
                option: CENSUS_YEAR,
                reason: format!("unsupported census year `{}`", other),
            }),
        }
    }
}

/// How the service resolves equally-scored matches when ties are not allowed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TieBreakingStrategy {
    FlipACoin,
    RevertToHierarchy,
}

impl TieBreakingStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            TieBreakingStrategy::FlipACoin => "flipACoin",
            TieBreakingStrategy::RevertToHierarchy => "revertToHierarchy",
        }
    }
}

impl Default for TieBreakingStrategy {
    fn default() -> Self {
        TieBreakingStrategy::RevertToHierarchy
    }
}

impl fmt::Display for TieBreakingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TieBreakingStrategy {
    type Err = InvalidRequest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flipACoin" => Ok(TieBreakingStrategy::FlipACoin),
            "revertToHierarchy" => Ok(TieBreakingStrategy::RevertToHierarchy),
            other => Err(InvalidRequest::InvalidValue {
                option: TIE_BREAKING_STRATEGY,
                reason: format!(
                    "expected `flipACoin` or `revertToHierarchy`, got `{}`",
                    other
                ),
            }),
        }
    }
}

/// TAMU-specific settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TamuOptions {
    pub api_key: Option<String>,
    pub census_years: Vec<CensusYear>,
    pub allow_ties: bool,
    pub tie_breaking_strategy: TieBreakingStrategy,
}

impl Default for TamuOptions {
    fn default() -> Self {
        TamuOptions {
            api_key: None,
            census_years: CensusYear::ALL.to_vec(),
            allow_ties: true,
            tie_breaking_strategy: TieBreakingStrategy::default(),
        }
    }
}

impl TamuOptions {
    /// Resolve TAMU settings from an option map, defaulting whatever is absent.
    ///
    /// `census_year` may be an integer (`2010`) or a pipe-joined string (`"2000|2010"`).
    pub fn from_options(options: &Map<String, Value>) -> Result<Self, InvalidRequest> {
        let mut resolved = TamuOptions::default();

        match options.get(API_KEY) {
            None | Some(Value::Null) => {}
            Some(Value::String(key)) if key.trim().is_empty() => {
                return Err(InvalidRequest::MissingOption(API_KEY))
            }
            Some(Value::String(key)) => resolved.api_key = Some(key.clone()),
            Some(_) => {
                return Err(InvalidRequest::InvalidType {
                    option: API_KEY,
                    expected: "a string",
                })
            }
        }

        match options.get(CENSUS_YEAR) {
            None | Some(Value::Null) => {}
            Some(Value::String(years)) => resolved.census_years = parse_census_years(years)?,
            Some(Value::Number(year)) if year.is_u64() => {
                resolved.census_years = vec![year.to_string().parse()?]
            }
            Some(_) => {
                return Err(InvalidRequest::InvalidType {
                    option: CENSUS_YEAR,
                    expected: "a string or an integer",
                })
            }
        }

        match options.get(ALLOW_TIES) {
            None | Some(Value::Null) => {}
            Some(Value::Bool(allow)) => resolved.allow_ties = *allow,
            Some(_) => {
                return Err(InvalidRequest::InvalidType {
                    option: ALLOW_TIES,
                    expected: "a boolean",
                })
            }
        }

        match options.get(TIE_BREAKING_STRATEGY) {
            None | Some(Value::Null) => {}
            Some(Value::String(strategy)) => resolved.tie_breaking_strategy = strategy.parse()?,
            Some(_) => {
                return Err(InvalidRequest::InvalidType {
                    option: TIE_BREAKING_STRATEGY,
                    expected: "a string",
                })
            }
        }

        Ok(resolved)
    }

    fn census_year_param(&self) -> Option<String> {
        if self.census_years.is_empty() {
            return None;
        }
        let mut years = self.census_years.clone();
        years.sort();
        years.dedup();
        Some(
            years
                .iter()
                .map(|y| y.as_str())
                .collect::<Vec<_>>()
                .join("|"),
        )
    }
}

fn parse_census_years(years: &str) -> Result<Vec<CensusYear>, InvalidRequest> {
    years
        .split('|')
        .filter(|y| !y.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// An instance of the Texas A&M geocoding service
#[derive(Clone, Debug)]
pub struct Tamu {
    api_key: String,
    endpoint: String,
    path: String,
    options: TamuOptions,
}

impl Tamu {
    /// Create a new TAMU instance with the default endpoint and options
    pub fn new(api_key: String) -> Self {
        Tamu {
            api_key,
            endpoint: "https://geoservices.tamu.edu/".to_string(),
            path: "Services/Geocode/WebService/GeocoderWebServiceHttpNonParsed_V04_01.aspx"
                .to_string(),
            options: TamuOptions::default(),
        }
    }

    /// Set a custom endpoint
    ///
    /// Endpoint should include a trailing slash (i.e. "https://geoservices.tamu.edu/")
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_owned();
        self
    }

    /// Replace all TAMU-specific options
    pub fn with_options(mut self, options: TamuOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the census years to match against
    pub fn with_census_years(mut self, years: &[CensusYear]) -> Self {
        self.options.census_years = years.to_vec();
        self
    }

    /// Allow or disallow tied matches
    pub fn with_allow_ties(mut self, allow_ties: bool) -> Self {
        self.options.allow_ties = allow_ties;
        self
    }

    /// Set the strategy used when ties are disallowed
    pub fn with_tie_breaking_strategy(mut self, strategy: TieBreakingStrategy) -> Self {
        self.options.tie_breaking_strategy = strategy;
        self
    }

    pub fn options(&self) -> &TamuOptions {
        &self.options
    }

    // The options override wins over the constructor key
    fn api_key(&self) -> &str {
        self.options.api_key.as_deref().unwrap_or(&self.api_key)
    }
}

impl Provider for Tamu {
    fn name(&self) -> &'static str {
        "TAMU"
    }

    fn required_srid(&self) -> Option<u32> {
        Some(4326)
    }

    fn check(&self) -> Result<(), InvalidRequest> {
        require_api_key(self.api_key())
    }

    fn endpoint(&self, _request: &GeocodeRequest) -> String {
        format!("{}{}", self.endpoint, self.path)
    }

    fn build_query(&self, request: &GeocodeRequest) -> Query {
        let mut query = vec![("version", API_VERSION.to_string())];
        add_optional_param!(query, request.city(), "city");
        add_optional_param!(query, request.region(), "state");
        add_optional_param!(query, request.postal_code(), "zip");
        if self.options.allow_ties {
            query.push(("allowTies", "true".to_string()));
        } else {
            query.push((
                "tieBreakingStrategy",
                self.options.tie_breaking_strategy.to_string(),
            ));
        }
        add_optional_param!(query, self.options.census_year_param(), "censusYear");
        query.push(("streetAddress", request.address().to_string()));
        query.push(("apiKey", self.api_key().to_string()));
        query.push(("format", "json".to_string()));
        query
    }

    fn map_response(&self, body: Value) -> Result<Vec<Candidate>, GeocodingError> {
        let res: TamuResponse = serde_json::from_value(body)?;
        if res.feature_matching_result_count == 0 {
            return Err(GeocodingError::NoCandidatesFound);
        }
        let address = res.input_address.street_address;
        Ok(res
            .output_geocodes
            .into_iter()
            .map(|g| {
                Candidate::new(
                    address.clone(),
                    Point::new(g.output_geocode.longitude, g.output_geocode.latitude),
                    Some(Score::Float(g.output_geocode.match_score)),
                )
            })
            .collect())
    }
}

/// The top-level JSON response returned by the non-parsed HTTP web service
///
///```json
/// {
///   "version": "4.01",
///   "TransactionId": "0b5e2c4a-...",
///   "QueryStatusCodeValue": "200",
///   "FeatureMatchingResultType": "Success",
///   "FeatureMatchingResultCount": "1",
///   "InputAddress": { "StreetAddress": "1375 E BUENA VISTA DR", "City": "ORLANDO", "State": "FL", "Zip": "" },
///   "OutputGeocodes": [
///     {
///       "OutputGeocode": {
///         "Latitude": "28.3701384",
///         "Longitude": "-81.5197974",
///         "MatchScore": "97.33",
///         "MatchType": "Relaxed"
///       }
///     }
///   ]
/// }
///```
#[derive(Debug, Deserialize)]
pub struct TamuResponse {
    #[serde(
        rename = "FeatureMatchingResultCount",
        deserialize_with = "deserialize_lenient_u64"
    )]
    pub feature_matching_result_count: u64,
    #[serde(rename = "InputAddress")]
    pub input_address: TamuInputAddress,
    #[serde(rename = "OutputGeocodes", default)]
    pub output_geocodes: Vec<TamuOutputGeocodes>,
}

#[derive(Debug, Deserialize)]
pub struct TamuInputAddress {
    #[serde(rename = "StreetAddress")]
    pub street_address: String,
}

#[derive(Debug, Deserialize)]
pub struct TamuOutputGeocodes {
    #[serde(rename = "OutputGeocode")]
    pub output_geocode: TamuOutputGeocode,
}

#[derive(Debug, Deserialize)]
pub struct TamuOutputGeocode {
    #[serde(rename = "Latitude", deserialize_with = "deserialize_lenient_f64")]
    pub latitude: f64,
    #[serde(rename = "Longitude", deserialize_with = "deserialize_lenient_f64")]
    pub longitude: f64,
    #[serde(rename = "MatchScore", deserialize_with = "deserialize_lenient_f64")]
    pub match_score: f64,
}
