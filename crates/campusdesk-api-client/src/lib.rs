//! HTTP client for the campusdesk API.
//!
//! Provides a small client with optional Bearer auth, generic request helpers
//! that turn HTTP failures into `ClientError`, and the backend trait
//! implementations (students, signup, login) in [`api`].

pub mod api;

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use campusdesk_core::models::ApiMessage;
use campusdesk_core::{ClientConfig, ClientError};

/// HTTP client for the campusdesk API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            config.api_url(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Send `Authorization: Bearer {token}` on every request when set.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.build_url(path);
        tracing::debug!(%method, %url, "Sending API request");
        self.apply_auth(self.client.request(method, url))
    }

    /// Send the request; any non-2xx status becomes `ClientError::Server`
    /// carrying the body's `message` when it has one.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiMessage>(&error_text)
            .ok()
            .and_then(|body| body.message);
        tracing::warn!(
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "API request failed"
        );
        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        decode_json(response).await
    }

    /// GET request returning the raw body.
    pub async fn get_bytes(&self, path: &str) -> Result<Bytes, ClientError> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        response
            .bytes()
            .await
            .map_err(|e| {
                ClientError::InvalidResponse(format!("Failed to read response body: {}", e))
            })
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.request(Method::POST, path).json(body);
        let response = self.execute(request).await?;
        decode_json(response).await
    }

    /// POST JSON body, ignoring whatever the server answers on success.
    pub async fn post_json_unit<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError> {
        let request = self.request(Method::POST, path).json(body);
        self.execute(request).await?;
        Ok(())
    }

    /// Send a multipart form with `method` (POST or PUT).
    pub async fn send_multipart(
        &self,
        method: Method,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<(), ClientError> {
        let request = self.request(method, path).multipart(form);
        self.execute(request).await?;
        Ok(())
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Transport("Request timed out".to_string())
    } else {
        ClientError::Transport(err.to_string())
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response
        .bytes()
        .await
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to read response body: {}", e)))?;
    Ok(serde_json::from_slice(&body)?)
}
