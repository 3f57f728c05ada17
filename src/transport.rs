use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use crate::error::TransportError;
use crate::import::ImportRequest;

// Shared client so repeated invocations in one process reuse connections.
// No timeouts are set: requests inherit reqwest's defaults.
static CLIENT: Lazy<Client> = Lazy::new(Client::new);

/// Delivers an [`ImportRequest`] and reports the HTTP status it got back.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ImportRequest) -> Result<u16, TransportError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: CLIENT.clone(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ImportRequest) -> Result<u16, TransportError> {
        let response = self
            .client
            .post(request.endpoint())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .bearer_auth(&request.settings.api_token)
            .json(&request.body())
            .send()
            .await?;

        // The body is never interpreted.
        Ok(response.status().as_u16())
    }
}
