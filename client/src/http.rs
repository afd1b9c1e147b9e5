//! Shared request plumbing: bearer header, status checks, body decoding

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::session::Session;
use hm_core::{Error, Result};

#[derive(Clone)]
pub(crate) struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub(crate) fn new(base_url: &str, session: Session) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// Start a request, attaching the bearer token when the session has one
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and turn transport failures and non-2xx answers into errors
    pub(crate) async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to {}: {}", action, e)))?;
        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::rejection(status.as_u16(), rejection_message(status, &body)))
}

/// Message for a rejected request
///
/// Services answer with `{"error": ..}` or `{"detail": ..}` JSON, or plain
/// text. An empty body falls back to the status reason.
pub(crate) fn rejection_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::Network(format!("Failed to read response body: {}", e)))?;
    serde_json::from_slice(&bytes).map_err(|e| Error::Decode(e.to_string()))
}

/// Decode a body that may be empty or not JSON at all
pub(crate) async fn decode_lenient(response: Response) -> serde_json::Value {
    match response.bytes().await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null),
        Err(_) => serde_json::Value::Null,
    }
}
