//! HTTP implementation of the RAG backend

use super::{ContentDocument, QueryRequest, RagBackend, RagError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Talks JSON over HTTP to the RAG service at `base_url`
pub struct HttpRagBackend {
    client: Client,
    base_url: String,
}

impl HttpRagBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RagError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RagError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn post(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<reqwest::Response, RagError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| RagError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::status(
                status.as_u16(),
                format!("RAG service returned {status}: {body}"),
            ));
        }
        Ok(response)
    }
}

#[async_trait]
impl RagBackend for HttpRagBackend {
    async fn query(&self, request: &QueryRequest) -> Result<Value, RagError> {
        let response = self.post("query", request).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| RagError::decode(format!("Invalid JSON from RAG service: {e}")))
    }

    async fn push_content(&self, document: &ContentDocument) -> Result<(), RagError> {
        // The service acknowledges with a status body nobody reads
        self.post("content", document).await.map(|_| ())
    }
}
