use super::transport::{AsyncTransport, HttpTransport};
use super::{Forward, Reverse};
use crate::provider::{retain, validate, Provider, ReverseProvider};
use crate::{
    Candidate, GeocodeRequest, GeocodingError, InvalidRequest, Location, Point, TransportConfig,
};
use async_trait::async_trait;
use std::convert::TryInto;
use tracing::{debug, warn};

/// Async forward-geocoding facade over one provider
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
    T: AsyncTransport,
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
    pub async fn geocode(
        &self,
        request: &GeocodeRequest,
    ) -> Result<Vec<Candidate>, GeocodingError> {
        self.run(request, None::<fn(&Candidate) -> bool>).await
    }

    /// Geocode a request and keep only the candidates matching `filter`
    pub async fn geocode_filtered<F>(
        &self,
        request: &GeocodeRequest,
        filter: F,
    ) -> Result<Vec<Candidate>, GeocodingError>
    where
        F: FnMut(&Candidate) -> bool,
    {
        self.run(request, Some(filter)).await
    }

    async fn run<F>(
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
        let body = match self.transport.get(&url, &query).await {
            Ok(body) => body,
            Err(err) => {
                warn!(provider = name, error = %err, "geocode request failed");
                return Err(err.into());
            }
        };

        let candidates = retain(self.provider.map_response(body)?, filter)?;
        debug!(provider = name, count = candidates.len(), "geocode candidates mapped");
        Ok(candidates)
    }
}

#[async_trait]
impl<P, T> Forward for Geocoder<P, T>
where
    P: Provider + Send + Sync,
    T: AsyncTransport,
{
    async fn forward(&self, request: &GeocodeRequest) -> Result<Vec<Candidate>, GeocodingError> {
        self.geocode(request).await
    }
}

/// Async reverse-geocoding facade over one provider
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
    T: AsyncTransport,
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

    /// Find the address at a location; `Ok(None)` when the provider has none
    pub async fn reverse_geocode<L>(
        &self,
        location: L,
    ) -> Result<Option<Candidate>, GeocodingError>
    where
        L: TryInto<Location>,
        InvalidRequest: From<L::Error>,
    {
        let location = location.try_into().map_err(InvalidRequest::from)?;
        self.lookup(&location).await
    }

    async fn lookup(&self, location: &Location) -> Result<Option<Candidate>, GeocodingError> {
        let name = self.provider.name();
        self.provider.check()?;
        let url = self.provider.reverse_endpoint();
        let query = self.provider.build_reverse_query(location);

        debug!(provider = name, url = %url, "sending reverse geocode request");
        let body = match self.transport.get(&url, &query).await {
            Ok(body) => body,
            Err(err) => {
                warn!(provider = name, error = %err, "reverse geocode request failed");
                return Err(err.into());
            }
        };

        let address = self.provider.map_reverse_response(body)?;
        Ok(address.map(|a| Candidate::new(a, Point::from(*location), None)))
    }
}

#[async_trait]
impl<P, T> Reverse for ReverseGeocoder<P, T>
where
    P: ReverseProvider + Send + Sync,
    T: AsyncTransport,
{
    async fn reverse(&self, location: &Location) -> Result<Option<Candidate>, GeocodingError> {
        self.lookup(location).await
    }
}
