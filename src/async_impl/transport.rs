use crate::{ProviderError, TransportConfig};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Sends a GET request and resolves to the decoded JSON body.
///
/// Implementations must fail on network errors, non-2xx statuses and bodies that are not JSON.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<Value, ProviderError>;
}

/// The default transport, backed by an async `reqwest` client
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::limited(config.max_redirects));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(HttpTransport {
            client: builder.build()?,
        })
    }

    /// Wrap an already configured client
    pub fn with_client(client: Client) -> Self {
        HttpTransport { client }
    }
}

#[async_trait]
impl AsyncTransport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<Value, ProviderError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        debug!(status = %resp.status(), "provider responded");
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
