//! The asynchronous element store trait and its HTTP implementation.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error};

use panolot_core::{AuthError, EntityId, Error, ProjectId, Result, TransportError};

use crate::records::{ElementPayload, ElementRecord};

/// Asynchronous persistence collaborator.
///
/// Every operation fails with the core error taxonomy: transport failures
/// carry an HTTP-derived message, expired sessions surface as auth errors
/// and must not be retried.
#[async_trait]
pub trait ElementStore: Send + Sync {
    /// Lists every persisted annotation of a project.
    async fn list(&self, project_id: ProjectId) -> Result<Vec<ElementRecord>>;

    /// Creates a new annotation, returning its record.
    async fn create(&self, payload: ElementPayload) -> Result<ElementRecord>;

    /// Updates an existing annotation.
    async fn update(&self, id: EntityId, payload: ElementPayload) -> Result<ElementRecord>;

    /// Deletes an annotation.
    async fn delete(&self, id: EntityId) -> Result<()>;
}

/// HTTP-backed [`ElementStore`] speaking the backend's REST dialect.
pub struct HttpElementStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpElementStore {
    /// Creates a store for the given API base URL (for example
    /// `https://backend.example.com/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Sets the bearer token used on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Clears the stored credentials, typically after a session expiry.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}/{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Value> {
        let response = builder.send().await.map_err(|e| {
            error!(error = %e, "backend unreachable");
            TransportError::Unreachable {
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        // Responses may legitimately carry no body (deletes).
        let value: Value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).unwrap_or(Value::Null)
        };

        if status.is_success() {
            debug!(%status, "backend call ok");
            return Ok(value);
        }

        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);

        Err(error_for_status(status.as_u16(), message))
    }

    fn decode_record(value: Value) -> Result<ElementRecord> {
        serde_json::from_value(value)
            .map_err(|e| Error::other(format!("unexpected backend record: {e}")))
    }
}

/// Maps a non-success HTTP status to the error taxonomy.
///
/// 401 means the session expired and is never retried; everything else is
/// a transport failure carrying the backend's message when one was given.
fn error_for_status(status: u16, message: Option<String>) -> Error {
    if status == 401 {
        return AuthError::SessionExpired.into();
    }
    TransportError::Api {
        status,
        message: message.unwrap_or_else(|| format!("Backend returned {status}")),
    }
    .into()
}

#[async_trait]
impl ElementStore for HttpElementStore {
    async fn list(&self, project_id: ProjectId) -> Result<Vec<ElementRecord>> {
        let value = self
            .send(self.request(reqwest::Method::GET, &format!("lotes/{project_id}")))
            .await?;
        serde_json::from_value(value)
            .map_err(|e| Error::other(format!("unexpected backend listing: {e}")))
    }

    async fn create(&self, payload: ElementPayload) -> Result<ElementRecord> {
        let value = self
            .send(self.request(reqwest::Method::POST, "lotes").json(&payload))
            .await?;
        Self::decode_record(value)
    }

    async fn update(&self, id: EntityId, payload: ElementPayload) -> Result<ElementRecord> {
        let value = self
            .send(
                self.request(reqwest::Method::PUT, &format!("lotes/{id}"))
                    .json(&payload),
            )
            .await?;
        Self::decode_record(value)
    }

    async fn delete(&self, id: EntityId) -> Result<()> {
        self.send(self.request(reqwest::Method::DELETE, &format!("lotes/{id}")))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_auth_error() {
        let err = error_for_status(401, Some("token expired".to_string()));
        assert!(err.is_auth());
    }

    #[test]
    fn other_statuses_map_to_transport_errors() {
        let err = error_for_status(500, None);
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Backend error (500): Backend returned 500");

        let err = error_for_status(422, Some("bad polygon".to_string()));
        assert_eq!(err.to_string(), "Backend error (422): bad polygon");
    }
}
