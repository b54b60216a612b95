//! Request and envelope types exchanged with the chat proxy

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the widget renderer hands to a client at page load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub ajax_url: String,
    pub nonce: String,
}

/// What the session sends for one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRequest {
    pub query: String,
    pub context: Vec<String>,
}

/// Envelope the proxy wraps every answer in.
///
/// On success `data` is the RAG service's JSON body; on failure it is a
/// short error code or message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProxyEnvelope {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }

    pub fn error(data: impl Into<Value>) -> Self {
        Self {
            success: false,
            data: Some(data.into()),
        }
    }

    /// Decode the answer, or `None` if the envelope is not a well-formed
    /// success.
    pub fn reply(&self) -> Option<QueryReply> {
        if !self.success {
            return None;
        }
        match &self.data {
            None | Some(Value::Null) => None,
            Some(data) => serde_json::from_value(data.clone()).ok(),
        }
    }
}

/// The part of the RAG answer the session understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryReply {
    pub response: String,
    #[serde(default, deserialize_with = "lenient_steps")]
    pub thought_process: Option<Vec<String>>,
}

/// Accept any JSON for the reasoning trace. Non-string steps are shown as
/// their JSON text, nulls are skipped and a non-array trace is ignored.
fn lenient_steps<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let Value::Array(steps) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        steps
            .into_iter()
            .filter_map(|step| match step {
                Value::Null => None,
                Value::String(text) => Some(text),
                other => Some(other.to_string()),
            })
            .collect(),
    ))
}

impl QueryReply {
    /// Reasoning steps worth showing (empty when absent)
    pub fn thoughts(&self) -> &[String] {
        self.thought_process.as_deref().unwrap_or(&[])
    }
}
