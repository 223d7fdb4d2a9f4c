//! HTTP transport configuration
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the default `reqwest`-backed transports
///
/// ```
/// use geocoder_facade::TransportConfig;
///
/// let config: TransportConfig = serde_json::from_str(r#"{ "timeout_secs": 10 }"#).unwrap();
/// assert_eq!(config.max_redirects, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Whole-request timeout in seconds (default: none)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Maximum redirects followed before failing (default: 20)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Value of the `User-Agent` header (default: `Rust-Geocoding`)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_max_redirects() -> usize {
    20
}

fn default_user_agent() -> String {
    crate::UA_STRING.to_string()
}

impl TransportConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            timeout_secs: None,
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }
}
