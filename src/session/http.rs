//! HTTP transport to the gateway's chat proxy

use super::traits::{QueryTransport, TransportError};
use super::wire::{ProxyEnvelope, ProxyRequest, WidgetConfig};
use crate::api::{AJAX_ACTION, WIDGET_CONFIG_PATH};
use async_trait::async_trait;
use reqwest::Client;

/// Posts queries to the admin-ajax style endpoint with the page nonce
pub struct HttpTransport {
    client: Client,
    config: WidgetConfig,
}

impl HttpTransport {
    pub fn new(config: WidgetConfig) -> Result<Self, TransportError> {
        // Per-request timeouts belong to the session, not the client
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Fetch the endpoint URL and a fresh nonce from a running gateway
    pub async fn discover(gateway_url: &str) -> Result<Self, TransportError> {
        let url = format!("{}{WIDGET_CONFIG_PATH}", gateway_url.trim_end_matches('/'));
        let response = reqwest::get(&url).await.map_err(|e| map_reqwest(&e))?;
        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }
        let config = response
            .json::<WidgetConfig>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        tracing::debug!(ajax_url = %config.ajax_url, "Discovered widget config");
        Self::new(config)
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }
}

/// Form fields for one query, with the context as repeated `context[]` keys
pub fn form_fields<'a>(nonce: &'a str, request: &'a ProxyRequest) -> Vec<(&'static str, &'a str)> {
    let mut fields = vec![
        ("action", AJAX_ACTION),
        ("nonce", nonce),
        ("query", request.query.as_str()),
    ];
    fields.extend(request.context.iter().map(|c| ("context[]", c.as_str())));
    fields
}

fn map_reqwest(err: &reqwest::Error) -> TransportError {
    if err.is_decode() {
        TransportError::Decode(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}

#[async_trait]
impl QueryTransport for HttpTransport {
    async fn send(&self, request: &ProxyRequest) -> Result<ProxyEnvelope, TransportError> {
        let response = self
            .client
            .post(&self.config.ajax_url)
            .form(&form_fields(&self.config.nonce, request))
            .send()
            .await
            .map_err(|e| map_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<ProxyEnvelope>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}
