use super::transport::{HttpTransport, Transport};
use super::{Forward, Reverse};
use crate::provider::{retain, validate, Provider, ReverseProvider};
use crate::{
    Candidate, GeocodeRequest, GeocodingError, InvalidRequest, Location, Point, TransportConfig,
};
use std::convert::TryInto;
use tracing::{debug, warn};

/// Forward-geocoding facade over one provider
///
/// ```no_run
/// use geocoder_facade::{Esri, GeocodeRequest, Geocoder, SpatialReference};
///
/// let geocoder = Geocoder::new(Esri::new()).unwrap();
/// let request = GeocodeRequest::new("380 New York St", SpatialReference::WGS84)
///     .with_city("Redlands")
///     .with_region("CA");
/// let exact = geocoder
///     .geocode_filtered(&request, |c| c.score().map_or(false, |s| s.as_f64() >= 90.0))
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct Geocoder<P, T = HttpTransport> {
    provider: P,
    transport: T,
}

impl<P> Geocoder<P, HttpTransport>
where
    P: Provider,
{
    /// Create a facade using the default HTTP transport
    pub fn new(provider: P) -> Result<Self, GeocodingError> {
        Geocoder::with_config(provider, &TransportConfig::default())
    }

    /// Create a facade using an HTTP transport built from `config`
    pub fn with_config(provider: P, config: &TransportConfig) -> Result<Self, GeocodingError> {
        Ok(Geocoder {
            provider,
            transport: HttpTransport::new(config)?,
        })
    }
}

impl<P, T> Geocoder<P, T>
where
    P: Provider,
    T: Transport,
{
    /// Create a facade sending its requests through `transport`
    pub fn with_transport(provider: P, transport: T) -> Self {
        Geocoder {
            provider,
            transport,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Geocode a request, returning the provider's candidates in provider order
    pub fn geocode(&self, request: &GeocodeRequest) -> Result<Vec<Candidate>, GeocodingError> {
        self.run(request, None::<fn(&Candidate) -> bool>)
    }

    /// Geocode a request and keep only the candidates matching `filter`
    pub fn geocode_filtered<F>(
        &self,
        request: &GeocodeRequest,
        filter: F,
    ) -> Result<Vec<Candidate>, GeocodingError>
    where
        F: FnMut(&Candidate) -> bool,
    {
        self.run(request, Some(filter))
    }

    fn run<F>(
        &self,
        request: &GeocodeRequest,
        filter: Option<F>,
    ) -> Result<Vec<Candidate>, GeocodingError>
    where
        F: FnMut(&Candidate) -> bool,
    {
        let name = self.provider.name();
        validate(&self.provider, request)?;
        let url = self.provider.endpoint(request);
        let query = self.provider.build_query(request);

        debug!(provider = name, url = %url, "sending geocode request");
        let body = self.transport.get(&url, &query).map_err(|err| {
            warn!(provider = name, error = %err, "geocode request failed");
            err
        })?;

        let candidates = retain(self.provider.map_response(body)?, filter)?;
        debug!(provider = name, count = candidates.len(), "geocode candidates mapped");
        Ok(candidates)
    }
}

impl<P, T> Forward for Geocoder<P, T>
where
    P: Provider,
    T: Transport,
{
    fn forward(&self, request: &GeocodeRequest) -> Result<Vec<Candidate>, GeocodingError> {
        self.geocode(request)
    }
}

/// Reverse-geocoding facade over one provider
#[derive(Debug)]
pub struct ReverseGeocoder<P, T = HttpTransport> {
    provider: P,
    transport: T,
}

impl<P> ReverseGeocoder<P, HttpTransport>
where
    P: ReverseProvider,
{
    /// Create a facade using the default HTTP transport
    pub fn new(provider: P) -> Result<Self, GeocodingError> {
        ReverseGeocoder::with_config(provider, &TransportConfig::default())
    }

    /// Create a facade using an HTTP transport built from `config`
    pub fn with_config(provider: P, config: &TransportConfig) -> Result<Self, GeocodingError> {
        Ok(ReverseGeocoder {
            provider,
            transport: HttpTransport::new(config)?,
        })
    }
}

impl<P, T> ReverseGeocoder<P, T>
where
    P: ReverseProvider,
    T: Transport,
{
    /// Create a facade sending its requests through `transport`
    pub fn with_transport(provider: P, transport: T) -> Self {
        ReverseGeocoder {
            provider,
            transport,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Find the address at a location.
    ///
    /// Accepts anything convertible to a [`Location`](../struct.Location.html): a `(x, y)`
    /// tuple, an `[x, y]` array, a `Point`, or a JSON value. Returns `Ok(None)` when the
    /// provider has no address there.
    pub fn reverse_geocode<L>(&self, location: L) -> Result<Option<Candidate>, GeocodingError>
    where
        L: TryInto<Location>,
        InvalidRequest: From<L::Error>,
    {
        let location = location.try_into().map_err(InvalidRequest::from)?;
        self.lookup(&location)
    }

    fn lookup(&self, location: &Location) -> Result<Option<Candidate>, GeocodingError> {
        let name = self.provider.name();
        self.provider.check()?;
        let url = self.provider.reverse_endpoint();
        let query = self.provider.build_reverse_query(location);

        debug!(provider = name, url = %url, "sending reverse geocode request");
        let body = self.transport.get(&url, &query).map_err(|err| {
            warn!(provider = name, error = %err, "reverse geocode request failed");
            err
        })?;

        let address = self.provider.map_reverse_response(body)?;
        if address.is_none() {
            debug!(provider = name, "no address at location");
        }
        Ok(address.map(|a| Candidate::new(a, Point::from(*location), None)))
    }
}

impl<P, T> Reverse for ReverseGeocoder<P, T>
where
    P: ReverseProvider,
    T: Transport,
{
    fn reverse(&self, location: &Location) -> Result<Option<Candidate>, GeocodingError> {
        self.lookup(location)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        Census, Esri, Google, Here, ProviderError, Score, SpatialReference, Tamu, TomTom,
    };
    use serde_json::{json, Value};
    use std::cell::RefCell;

    /// Answers every request with the same body and remembers what was asked
    struct Recorded {
        body: Value,
        calls: RefCell<Vec<(String, Vec<(&'static str, String)>)>>,
    }

    impl Recorded {
        fn new(body: Value) -> Self {
            Recorded {
                body,
                calls: RefCell::new(vec![]),
            }
        }
    }

    impl Transport for &Recorded {
        fn get(
            &self,
            url: &str,
            query: &[(&'static str, String)],
        ) -> Result<Value, ProviderError> {
            self.calls
                .borrow_mut()
                .push((url.to_string(), query.to_vec()));
            Ok(self.body.clone())
        }
    }

    struct Unreachable;

    impl Transport for Unreachable {
        fn get(&self, _url: &str, _query: &[(&'static str, String)]) -> Result<Value, ProviderError> {
            Err(serde_json::from_str::<Value>("<html>502 Bad Gateway</html>")
                .unwrap_err()
                .into())
        }
    }

    fn orlando() -> GeocodeRequest {
        GeocodeRequest::new("1375 E Buena Vista Dr", SpatialReference::WGS84)
            .with_city("Orlando")
            .with_region("FL")
            .with_country("USA")
    }

    fn esri_body() -> Value {
        json!({
            "spatialReference": { "wkid": 4326, "latestWkid": 4326 },
            "candidates": [
                {
                    "address": "1375 E Buena Vista Dr, Lake Buena Vista, Florida, 32830",
                    "location": { "x": -81.51982, "y": 28.37014 },
                    "score": 100
                },
                {
                    "address": "E Buena Vista Dr, Lake Buena Vista, Florida, 32830",
                    "location": { "x": -81.5189, "y": 28.3712 },
                    "score": 81.4
                }
            ]
        })
    }

    #[test]
    fn geocode_test() {
        let transport = Recorded::new(esri_body());
        let geocoder = Geocoder::with_transport(Esri::new(), &transport);
        let candidates = geocoder.geocode(&orlando()).unwrap();
        assert_eq!(candidates.len(), 2);
        for candidate in &candidates {
            assert!(!candidate.address().is_empty());
            let score = candidate.score().unwrap().as_f64();
            assert!((0.0..=100.0).contains(&score));
        }

        let calls = transport.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].0,
            "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer/findAddressCandidates"
        );
        assert!(calls[0].1.contains(&("countryCode", "USA".to_string())));
    }

    #[test]
    fn geocode_filtered_test() {
        let transport = Recorded::new(esri_body());
        let geocoder = Geocoder::with_transport(Esri::new(), &transport);
        let exact = geocoder
            .geocode_filtered(&orlando(), |c| c.score() == Some(Score::Int(100)))
            .unwrap();
        assert_eq!(exact.len(), 1);

        let err = geocoder
            .geocode_filtered(&orlando(), |c| c.address().starts_with("Nowhere"))
            .unwrap_err();
        assert!(err.is_no_candidates());
    }

    #[test]
    fn empty_address_never_reaches_transport() {
        let transport = Recorded::new(esri_body());
        let geocoder = Geocoder::with_transport(Esri::new(), &transport);
        let err = geocoder
            .geocode(&GeocodeRequest::new("", SpatialReference::WGS84))
            .unwrap_err();
        assert!(matches!(err, GeocodingError::InvalidRequest(_)));
        assert!(transport.calls.borrow().is_empty());
    }

    #[test]
    fn unsupported_srid_never_reaches_transport() {
        let transport = Recorded::new(json!({ "items": [] }));
        let geocoder = Geocoder::with_transport(Here::new("key".to_string()), &transport);
        let request = GeocodeRequest::new("1375 E Buena Vista Dr", SpatialReference::new(3857));
        let err = geocoder.geocode(&request).unwrap_err();
        assert!(matches!(
            err,
            GeocodingError::InvalidRequest(InvalidRequest::UnsupportedSrid { .. })
        ));
        assert!(transport.calls.borrow().is_empty());
    }

    #[test]
    fn blank_api_key_never_reaches_transport() {
        let transport = Recorded::new(json!({ "status": "OK", "results": [] }));
        let geocoder = Geocoder::with_transport(Google::new(String::new()), &transport);
        let err = geocoder.geocode(&orlando()).unwrap_err();
        assert!(matches!(
            err,
            GeocodingError::InvalidRequest(InvalidRequest::MissingOption("api_key"))
        ));

        let reverse = ReverseGeocoder::with_transport(Here::new(" ".to_string()), &transport);
        let err = reverse.reverse_geocode([-76.93, 38.84]).unwrap_err();
        assert!(matches!(
            err,
            GeocodingError::InvalidRequest(InvalidRequest::MissingOption("api_key"))
        ));
        assert!(transport.calls.borrow().is_empty());
    }

    #[test]
    fn zero_results_is_an_error() {
        let bodies: Vec<(Box<dyn Provider>, Value)> = vec![
            (Box::new(Esri::new()) as Box<dyn Provider>, json!({ "candidates": [] })),
            (
                Box::new(Google::new("key".to_string())) as Box<dyn Provider>,
                json!({ "status": "ZERO_RESULTS", "results": [] }),
            ),
            (Box::new(Here::new("key".to_string())) as Box<dyn Provider>, json!({ "items": [] })),
            (
                Box::new(TomTom::new("key".to_string())) as Box<dyn Provider>,
                json!({ "summary": { "totalResults": 0 }, "results": [] }),
            ),
            (
                Box::new(Tamu::new("key".to_string())) as Box<dyn Provider>,
                json!({
                    "FeatureMatchingResultCount": 0,
                    "InputAddress": { "StreetAddress": "" },
                    "OutputGeocodes": []
                }),
            ),
            (
                Box::new(Census::new()) as Box<dyn Provider>,
                json!({ "result": { "addressMatches": [] } }),
            ),
        ];
        for (provider, body) in bodies {
            let transport = Recorded::new(body);
            let geocoder = Geocoder::with_transport(provider, &transport);
            let err = geocoder.geocode(&orlando()).unwrap_err();
            assert!(
                err.is_no_candidates(),
                "{} returned {:?}",
                geocoder.provider().name(),
                err
            );
        }
    }

    #[test]
    fn absent_options_are_never_sent() {
        let providers: Vec<Box<dyn Provider>> = vec![
            Box::new(Esri::new()),
            Box::new(Google::new("key".to_string())),
            Box::new(Here::new("key".to_string())),
            Box::new(TomTom::new("key".to_string())),
            Box::new(Tamu::new("key".to_string())),
            Box::new(Census::new()),
        ];
        let bare = GeocodeRequest::new("4600 Silver Hill Rd", SpatialReference::WGS84)
            .with_city("")
            .with_country(" ");
        let optional = [
            "neighborhood",
            "city",
            "region",
            "postal",
            "countryCode",
            "components",
            "qq",
            "state",
            "zip",
        ];
        for provider in &providers {
            for (key, value) in provider.build_query(&bare) {
                assert!(!value.is_empty(), "{} sent empty `{}`", provider.name(), key);
                assert!(
                    !optional.contains(&key),
                    "{} sent absent `{}`",
                    provider.name(),
                    key
                );
            }
        }
    }

    #[test]
    fn transport_failure_is_a_provider_error() {
        let geocoder = Geocoder::with_transport(Esri::new(), Unreachable);
        let err = geocoder.geocode(&orlando()).unwrap_err();
        assert!(matches!(err, GeocodingError::Provider(ProviderError::Decode(_))));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn reverse_geocode_test() {
        let transport = Recorded::new(json!({
            "address": { "Match_addr": "4600 Silver Hill Road, Suitland, Maryland, 20746" },
            "location": { "x": -76.93067, "y": 38.84717 }
        }));
        let reverse = ReverseGeocoder::with_transport(Esri::new(), &transport);
        let candidate = reverse
            .reverse_geocode([-76.93067442482834, 38.84717175217679])
            .unwrap()
            .unwrap();
        assert_eq!(
            candidate.address(),
            "4600 Silver Hill Road, Suitland, Maryland, 20746"
        );
        assert_eq!(
            candidate.location(),
            Point::new(-76.93067442482834, 38.84717175217679)
        );
        assert_eq!(candidate.score(), None);
        assert_eq!(
            transport.calls.borrow()[0].1[0],
            ("location", "-76.93067442482834,38.84717175217679".to_string())
        );
    }

    #[test]
    fn reverse_geocode_no_address_is_none() {
        let transport = Recorded::new(json!({ "items": [] }));
        let reverse = ReverseGeocoder::with_transport(Here::new("key".to_string()), &transport);
        let location = Location::new(0.0, 0.0).unwrap();
        assert_eq!(reverse.reverse(&location).unwrap(), None);
    }

    #[test]
    fn reverse_geocode_rejects_bad_coordinates() {
        let transport = Recorded::new(json!({}));
        let reverse = ReverseGeocoder::with_transport(Esri::new(), &transport);

        let err = reverse.reverse_geocode(&json!({ "y": 38.8 })).unwrap_err();
        assert!(matches!(
            err,
            GeocodingError::InvalidRequest(InvalidRequest::MissingLongitude)
        ));
        let err = reverse.reverse_geocode(&json!([-76.9])).unwrap_err();
        assert!(matches!(
            err,
            GeocodingError::InvalidRequest(InvalidRequest::MissingLatitude)
        ));
        let err = reverse.reverse_geocode((f64::INFINITY, 1.0)).unwrap_err();
        assert!(matches!(
            err,
            GeocodingError::InvalidRequest(InvalidRequest::NonNumericCoordinate)
        ));
        assert!(transport.calls.borrow().is_empty());
    }
}
