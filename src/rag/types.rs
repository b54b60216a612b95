//! Wire types for the external RAG service

use serde::{Deserialize, Serialize};

/// Body of `POST /query`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub text: String,
    pub context: Vec<String>,
}

/// Body of `POST /content`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDocument {
    pub id: String,
    pub text: String,
    pub metadata: ContentMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMetadata {
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub url: String,
}
