//! Blocking facades: every call sends exactly one request and waits for it.
mod geocoder;
mod transport;

pub use self::geocoder::{Geocoder, ReverseGeocoder};
pub use self::transport::{HttpTransport, Transport};

use crate::{Candidate, GeocodeRequest, GeocodingError, Location};

/// Reverse-geocode a location.
///
/// This trait represents the most simple and minimal implementation
/// available from a given geocoding provider: at most one address, as a `Candidate`
/// without a score.
///
/// Examples
///
/// ```no_run
/// use geocoder_facade::blocking::{Reverse, ReverseGeocoder};
/// use geocoder_facade::{Esri, Location};
///
/// let esri = ReverseGeocoder::new(Esri::new()).unwrap();
/// let location = Location::new(-76.93067442482834, 38.84717175217679).unwrap();
/// let res = esri.reverse(&location).unwrap();
/// assert_eq!(
///     res.unwrap().address(),
///     "4600 Silver Hill Road, Suitland, Maryland, 20746"
/// );
/// ```
pub trait Reverse {
    fn reverse(&self, location: &Location) -> Result<Option<Candidate>, GeocodingError>;
}

/// Forward-geocode an address.
///
/// Returns one or more candidates; a provider answering with zero matches yields
/// `GeocodingError::NoCandidatesFound` rather than an empty `Vec`.
///
/// Examples
///
/// ```no_run
/// use geocoder_facade::blocking::{Forward, Geocoder};
/// use geocoder_facade::{Census, GeocodeRequest, SpatialReference};
///
/// let census = Geocoder::new(Census::new()).unwrap();
/// let request = GeocodeRequest::new(
///     "4600 Silver Hill Rd, Washington, DC, 20233",
///     SpatialReference::WGS84,
/// );
/// let res = census.forward(&request).unwrap();
/// assert_eq!(res.len(), 1);
/// ```
pub trait Forward {
    fn forward(&self, request: &GeocodeRequest) -> Result<Vec<Candidate>, GeocodingError>;
}
