//! Async facades with the same contract as [`blocking`](../blocking/index.html): one request per
//! call, no retries, no caching.
use async_trait::async_trait;

use crate::{Candidate, GeocodeRequest, GeocodingError, Location};

mod geocoder;
mod transport;

pub use self::geocoder::{Geocoder, ReverseGeocoder};
pub use self::transport::{AsyncTransport, HttpTransport};

#[async_trait]
pub trait Reverse {
    // NOTE TO IMPLEMENTERS: Location coordinates are lon, lat (x, y)
    // You may have to provide these coordinates in reverse order,
    // depending on the provider's requirements (see e.g. HERE)
    async fn reverse(&self, location: &Location) -> Result<Option<Candidate>, GeocodingError>;
}

#[async_trait]
pub trait Forward {
    async fn forward(&self, request: &GeocodeRequest) -> Result<Vec<Candidate>, GeocodingError>;
}
