use anyhow::{Context, Result};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use purifier_skill_types::{Endpoint, EndpointList, RequestEnvelope};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Where and how to ask the platform about the gadgets paired with the
/// device that sent the request.
#[derive(Debug)]
pub struct DeviceContext {
    pub api_endpoint: String,
    pub api_access_token: SecretString,
}

impl DeviceContext {
    pub fn new(api_endpoint: &str, api_access_token: &str) -> Self {
        Self {
            api_endpoint: api_endpoint.to_string(),
            api_access_token: SecretString::from(api_access_token.to_string()),
        }
    }

    pub fn from_envelope(envelope: &RequestEnvelope) -> Result<Self> {
        let system = &envelope.context.system;
        let token = system
            .api_access_token
            .as_deref()
            .context("Request context carries no API access token")?;
        Ok(Self::new(&system.api_endpoint, token))
    }
}

// Which gadgets are connected to the requesting device right now.
//
// An empty list is a valid answer and means no gadget is available; `Err` is
// reserved for the lookup itself failing.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GadgetDirectory: Send + Sync {
    async fn connected_endpoints(&self, context: &DeviceContext) -> Result<Vec<Endpoint>>;
}

/// Queries `GET {apiEndpoint}/v1/endpoints/` with the request's access token.
pub struct HttpGadgetDirectory {
    client: Client,
}

impl HttpGadgetDirectory {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for the endpoint API")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl GadgetDirectory for HttpGadgetDirectory {
    async fn connected_endpoints(&self, context: &DeviceContext) -> Result<Vec<Endpoint>> {
        let url = format!("{}/v1/endpoints/", context.api_endpoint.trim_end_matches('/'));
        tracing::debug!("Looking up connected endpoints at {}", url);

        let list = self
            .client
            .get(&url)
            .bearer_auth(context.api_access_token.expose_secret())
            .send()
            .await
            .with_context(|| format!("Endpoint lookup request to {url} failed"))?
            .error_for_status()
            .context("Endpoint API returned an error status")?
            .json::<EndpointList>()
            .await
            .context("Failed to parse endpoint listing")?;

        tracing::debug!("Endpoint API reported {} endpoint(s)", list.endpoints.len());
        Ok(list.endpoints)
    }
}

/// A directory that always reports the same endpoints.
#[derive(Debug, Clone, Default)]
pub struct StaticGadgetDirectory {
    endpoints: Vec<Endpoint>,
}

impl StaticGadgetDirectory {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }
}

#[async_trait]
impl GadgetDirectory for StaticGadgetDirectory {
    async fn connected_endpoints(&self, _context: &DeviceContext) -> Result<Vec<Endpoint>> {
        Ok(self.endpoints.clone())
    }
}
