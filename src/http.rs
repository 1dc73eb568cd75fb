use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, header};
use serde_json::Value;

use crate::{Result, error::NmfError};

/// One outgoing API call, transport-agnostic.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// Full `Authorization` header value (`Bearer ...` or `Basic ...`).
    pub authorization: Option<String>,
    /// JSON body; implies `Content-Type: application/json`.
    pub json: Option<Value>,
    /// Form-encoded body, used for the token endpoint.
    pub form: Option<Vec<(String, String)>>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn new(method: Method, url: impl Into<String>) -> Self {
        ApiRequest {
            method,
            url: url.into(),
            authorization: None,
            json: None,
            form: None,
        }
    }
}

/// The parts of a response the client cares about: status, `Retry-After`
/// (seconds, when the server sent one) and the raw body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub retry_after: Option<u64>,
    pub body: String,
}

/// Seam between the Spotify client and the network.
///
/// Production uses [`HttpTransport`] over reqwest; tests drive the client
/// with a scripted transport instead.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport {
            client: Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = self.client.request(request.method, &request.url);
        if let Some(authorization) = &request.authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }
        if let Some(json) = &request.json {
            builder = builder.json(json);
        }
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| NmfError::Http(e.to_string()))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = response
            .text()
            .await
            .map_err(|e| NmfError::Http(e.to_string()))?;

        Ok(ApiResponse {
            status,
            retry_after,
            body,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Scripted transport: answers each call with the next queued response
    /// and records every request it saw. Calls are strictly sequential in
    /// this client, so a single FIFO queue is enough.
    pub(crate) struct FakeTransport {
        responses: Mutex<VecDeque<ApiResponse>>,
        pub requests: Mutex<Vec<ApiRequest>>,
    }

    impl FakeTransport {
        pub fn new(responses: Vec<ApiResponse>) -> Self {
            FakeTransport {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn ok(body: &str) -> ApiResponse {
            Self::status(200, body)
        }

        pub fn status(code: u16, body: &str) -> ApiResponse {
            ApiResponse {
                status: StatusCode::from_u16(code).unwrap(),
                retry_after: None,
                body: body.to_string(),
            }
        }

        pub fn rate_limited(retry_after: u64) -> ApiResponse {
            ApiResponse {
                status: StatusCode::TOO_MANY_REQUESTS,
                retry_after: Some(retry_after),
                body: String::new(),
            }
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| NmfError::Http("scripted transport exhausted".to_string()))
        }
    }
}
