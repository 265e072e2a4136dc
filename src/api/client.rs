//! HTTP client for the focus session API.
//!
//! Wraps `reqwest` with bearer authentication, the `{data: ...}` envelope and
//! status-code mapping. A 401 triggers one credential refresh and one replay.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::auth::Credentials;
use super::error::ApiError;
use super::types::{
    Badge, CreateSessionRequest, Envelope, FocusSession, Plan, SessionId, SessionStatus,
    SessionType, StatusUpdate, Tag,
};
use super::SessionApi;

/// Path of the focus session resource, relative to the base URL
pub const FOCUS_SESSION_PATH: &str = "FocusSession";

/// Client for the remote session API
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `https://host/api`)
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Whether the server rejected our credentials for good
    pub fn is_signed_out(&self) -> bool {
        self.credentials.is_signed_out()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: &str,
    ) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .bearer_auth(token)
            .header("Accept", "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder
    }

    /// Send a request, replaying it once with refreshed credentials on 401
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response, ApiError> {
        let token = self.credentials.token()?;
        let response = self
            .request(method.clone(), path, body, &token)
            .send()
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(%method, path, "Request unauthorized, refreshing token");
        let token = self.credentials.refresh()?;
        let response = self.request(method, path, body, &token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.credentials.sign_out();
            return Err(ApiError::Unauthorized);
        }
        Ok(response)
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = check_status(self.send(Method::GET, path, None).await?)?;
        decode_data(response).await
    }
}

/// Map HTTP status to result, handling error status codes.
fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status().as_u16();

    match status {
        200..=299 => Ok(response),
        401 => Err(ApiError::Unauthorized),
        404 => Err(ApiError::NotFound),
        500..=599 => Err(ApiError::Server(status)),
        _ => Err(ApiError::Unexpected(status)),
    }
}

async fn decode_data<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let envelope: Envelope<T> = response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(envelope.data)
}

/// Accept either an enveloped or a bare session; empty or `null` means none
fn session_from_body(body: &str) -> Result<Option<FocusSession>, ApiError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    let inner = match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    if inner.is_null() {
        return Ok(None);
    }
    serde_json::from_value(inner)
        .map(Some)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

impl SessionApi for ApiClient {
    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<FocusSession, ApiError> {
        let body = to_body(request)?;
        let response = check_status(
            self.send(Method::POST, FOCUS_SESSION_PATH, Some(&body))
                .await?,
        )?;
        decode_data(response).await
    }

    async fn update_status(&self, id: SessionId, status: SessionStatus) -> Result<(), ApiError> {
        let body = to_body(&StatusUpdate { status })?;
        let path = format!("{}/{}/status", FOCUS_SESSION_PATH, id);
        check_status(self.send(Method::PATCH, &path, Some(&body)).await?)?;
        Ok(())
    }

    async fn transition_state(&self, id: SessionId) -> Result<FocusSession, ApiError> {
        let path = format!("{}/{}/transition-state", FOCUS_SESSION_PATH, id);
        let response = check_status(self.send(Method::POST, &path, None).await?)?;
        decode_data(response).await
    }

    async fn fetch_ongoing(&self) -> Result<Option<FocusSession>, ApiError> {
        let path = format!("{}/ongoing", FOCUS_SESSION_PATH);
        let response = match check_status(self.send(Method::GET, &path, None).await?) {
            Ok(response) => response,
            Err(ApiError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        let body = response.text().await?;
        session_from_body(&body)
    }

    async fn list_session_types(&self) -> Result<Vec<SessionType>, ApiError> {
        self.get_data("SessionType").await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.get_data("Tag").await
    }

    async fn list_plans(&self) -> Result<Vec<Plan>, ApiError> {
        self.get_data("ToDoItem").await
    }

    async fn list_badges(&self) -> Result<Vec<Badge>, ApiError> {
        self.get_data("Badge").await
    }
}
