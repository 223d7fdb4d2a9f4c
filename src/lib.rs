//! This crate provides a uniform facade over several forward and reverse geocoding web services.
//! A caller builds one [`GeocodeRequest`](struct.GeocodeRequest.html) and gets back
//! [`Candidate`](struct.Candidate.html)s of the same shape whichever provider answers.
//!
//! Supported providers: Esri ArcGIS World, Google, HERE, TomTom, Texas A&M Geoservices (TAMU)
//! and the US Census Bureau. Each provider implements the [`Provider`](trait.Provider.html)
//! trait, which is pure: it builds a query and maps a decoded response. Esri and HERE also
//! implement [`ReverseProvider`](trait.ReverseProvider.html).
//!
//! The facades in [`blocking`](blocking/index.html) (and `async_impl`, behind the `async`
//! feature) validate the request, send exactly one GET, and normalize the result. Matching
//! happens at the provider; nothing is cached, retried or rate-limited here.
//!
//! ### A note on Coordinate Order
//! While individual providers may specify coordinates in either `[Longitude, Latitude]` **or**
//! `[Latitude, Longitude`] order,
//! this crate **always** takes and returns locations in `[Longitude, Latitude]` (`x, y`) order.
//!
//! ### Errors
//!
//! - [`GeocodingError::InvalidRequest`](enum.GeocodingError.html) is raised before anything is sent.
//! - [`GeocodingError::NoCandidatesFound`](enum.GeocodingError.html) means the provider answered
//!   with zero matches. Reverse lookups report that case as `Ok(None)` instead.
//! - [`GeocodingError::Provider`](enum.GeocodingError.html) wraps transport, decoding and
//!   service failures.
//!
//! ### Usage of rustls
//!
//! If you like to use [rustls](https://github.com/ctz/rustls) instead of OpenSSL
//! you can enable the `rustls-tls` feature in your `Cargo.toml`:
//!
//!```toml
//![dependencies]
//!geocoder-facade = { version = "*", default-features = false, features = ["rustls-tls", "blocking"] }
//!```

static UA_STRING: &str = "Rust-Geocoding";

macro_rules! add_optional_param {
    ($query:expr, $param:expr, $name:expr) => {
        if let Some(p) = $param {
            $query.push(($name, p.to_string()))
        }
    };
}

pub use geo_types::Point;

#[cfg(feature = "async")]
pub mod async_impl;
#[cfg(feature = "blocking")]
pub mod blocking;

pub mod candidate;
pub mod config;
pub mod error;
pub mod provider;
pub mod request;

pub use crate::candidate::{Candidate, Score};
pub use crate::config::TransportConfig;
pub use crate::error::{GeocodingError, InvalidRequest, ProviderError};
pub use crate::provider::{Provider, Query, ReverseProvider};
pub use crate::request::{GeocodeRequest, Location, SpatialReference};

// The Esri ArcGIS World geocoding provider
pub mod esri;
pub use crate::esri::Esri;

// The Google Maps geocoding provider
pub mod google;
pub use crate::google::Google;

// The HERE geocoding and search provider
pub mod here;
pub use crate::here::Here;

// The TomTom search provider
pub mod tomtom;
pub use crate::tomtom::TomTom;

// The Texas A&M Geoservices provider
pub mod tamu;
pub use crate::tamu::Tamu;

// The US Census Bureau geocoding provider
pub mod census;
pub use crate::census::Census;

#[cfg(feature = "blocking")]
pub use crate::blocking::{Geocoder, ReverseGeocoder};
