//! HTTP client for the component query backend.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Backend reply, normalized.
///
/// The backend's canonical answer is `{"response": "<text>"}`; that shape is
/// unwrapped to its text. Any other JSON is kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendResult {
    Unwrapped(String),
    Structured(Value),
}

impl BackendResult {
    /// ```
    /// use applique_relay::forwarder::BackendResult;
    /// use serde_json::json;
    ///
    /// assert_eq!(
    ///     BackendResult::from_json(json!({"response": "Blue lace trim"})),
    ///     BackendResult::Unwrapped("Blue lace trim".to_string()),
    /// );
    /// assert_eq!(
    ///     BackendResult::from_json(json!({"response": 3})),
    ///     BackendResult::Structured(json!({"response": 3})),
    /// );
    /// ```
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(mut map) => match map.remove("response") {
                Some(Value::String(text)) => BackendResult::Unwrapped(text),
                Some(other) => {
                    map.insert("response".to_string(), other);
                    BackendResult::Structured(Value::Object(map))
                }
                None => BackendResult::Structured(Value::Object(map)),
            },
            other => BackendResult::Structured(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned HTTP {0}")]
    Status(StatusCode),

    #[error("backend returned an unparsable body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

/// Posts queries to the backend, one request per call, no retries.
#[derive(Debug, Clone)]
pub struct QueryForwarder {
    client: Client,
    url: Url,
}

impl QueryForwarder {
    /// Forwarder for `url`; `timeout` bounds the whole request when set.
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self, ForwardError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// POST `{"query": query}` and normalize the JSON reply.
    ///
    /// The query is sent as given, including when empty.
    pub async fn forward(&self, query: &str) -> Result<BackendResult, ForwardError> {
        debug!(url = %self.url, query_len = query.len(), "Forwarding query");

        let response = self
            .client
            .post(self.url.clone())
            .json(&QueryRequest { query })
            .send()
            .await
            .inspect_err(|e| warn!(url = %self.url, error = %e, "Backend unreachable"))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, %status, "Backend returned error status");
            return Err(ForwardError::Status(status));
        }

        let body = response
            .bytes()
            .await
            .inspect_err(|e| warn!(error = %e, "Failed to read backend body"))?;
        let value: Value = serde_json::from_slice(&body)
            .inspect_err(|e| warn!(error = %e, "Backend body is not JSON"))?;

        Ok(BackendResult::from_json(value))
    }
}
