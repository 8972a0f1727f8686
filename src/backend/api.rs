//! HTTP client for the recommendation backend API

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::types::{FeedbackEvent, Recommendation, SearchItem};

/// Failure of a single backend call.
///
/// Kept cloneable so it can ride along in UI messages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Network, DNS or connection failure before a status line arrived
    #[error("{0}")]
    Transport(String),

    /// Non-2xx response, with the `detail` field of the body when present
    #[error("{}", server_message(.status, .detail))]
    Server { status: u16, detail: Option<String> },

    /// 2xx response whose body could not be decoded
    #[error("Invalid response from backend: {0}")]
    Decode(String),
}

fn server_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("Request failed with status code {}", status),
    }
}

impl BackendError {
    /// Message shown in the UI; `fallback` covers errors with no usable text
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}

/// Client for communicating with the search/recommend backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Backend-hosted API documentation
    pub fn docs_url(&self) -> String {
        self.endpoint("docs")
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/api/{}", self.base_url, name)
    }

    /// `GET /api/search?q=&limit=`
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchItem>, BackendError> {
        tracing::debug!("search q={:?} limit={}", query, limit);
        let response = self
            .client
            .get(self.endpoint("search"))
            .query(&[("q", query.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;
        read_list(response).await
    }

    /// `GET /api/recommend?uid=&q=&k=`
    pub async fn recommend(
        &self,
        uid: &str,
        query: &str,
        k: u32,
    ) -> Result<Vec<Recommendation>, BackendError> {
        tracing::debug!("recommend uid={:?} q={:?} k={}", uid, query, k);
        let response = self
            .client
            .get(self.endpoint("recommend"))
            .query(&[
                ("uid", uid.to_string()),
                ("q", query.to_string()),
                ("k", k.to_string()),
            ])
            .send()
            .await?;
        read_list(response).await
    }

    /// `POST /api/feedback`; any 2xx counts as success and the body is ignored
    pub async fn send_feedback(&self, event: &FeedbackEvent) -> Result<(), BackendError> {
        tracing::debug!("feedback uid={:?} item={} action={}", event.uid, event.item_id, event.action);
        let response = self
            .client
            .post(self.endpoint("feedback"))
            .json(event)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(server_error(status, &body))
        }
    }
}

async fn read_list<T: DeserializeOwned>(response: reqwest::Response) -> Result<Vec<T>, BackendError> {
    let status = response.status();
    let body = response.text().await?;
    decode_list(status, &body)
}

/// Interpret a list endpoint response.
///
/// A 2xx body that is not a JSON array yields an empty list, not an error.
pub fn decode_list<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<Vec<T>, BackendError> {
    if !status.is_success() {
        return Err(server_error(status, body));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .map(serde_json::from_value::<T>)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| BackendError::Decode(e.to_string())),
        Ok(other) => {
            tracing::warn!("Expected a JSON array, got {}; treating as empty", json_kind(&other));
            Ok(Vec::new())
        }
        Err(e) => {
            tracing::warn!("Response body is not JSON ({}); treating as empty", e);
            Ok(Vec::new())
        }
    }
}

/// Build a [`BackendError::Server`], pulling `detail` out of a JSON body.
pub fn server_error(status: StatusCode, body: &str) -> BackendError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned())
        .and_then(|detail| match detail {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        });

    BackendError::Server {
        status: status.as_u16(),
        detail,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
