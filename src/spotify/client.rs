use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::{
    Result,
    cancel::{self, CancellationState},
    config,
    error::NmfError,
    http::{ApiRequest, HttpTransport, Transport},
    management::{TokenManager, TokenStore},
    spotify::auth::PromptCodeProvider,
};

/// Shared retry budget for 401 and 429 recovery on one logical request:
/// three retries, four attempts total.
const MAX_RETRIES: u32 = 3;

/// Authenticated Spotify Web API client.
///
/// Every request goes through [`SpotifyClient::execute`], which consults the
/// token manager for a valid bearer credential, classifies the response and
/// recovers locally from exactly two conditions: 401 (forced refresh) and
/// 429 (`Retry-After` back-off). Endpoint wrappers live in the sibling
/// modules as further `impl` blocks.
pub struct SpotifyClient {
    transport: Arc<dyn Transport>,
    tokens: TokenManager,
    api_url: String,
    cancel: CancellationState,
}

impl SpotifyClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        tokens: TokenManager,
        api_url: String,
        cancel: CancellationState,
    ) -> Self {
        SpotifyClient {
            transport,
            tokens,
            api_url,
            cancel,
        }
    }

    /// Production wiring: reqwest transport, token cache from configuration,
    /// interactive code prompt.
    pub async fn connect(cancel: CancellationState) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new());
        let store = TokenStore::new(config::token_cache_path());
        let code_provider = Box::new(PromptCodeProvider::new(cancel.clone()));
        let tokens =
            TokenManager::new(config::auth_config(), store, Arc::clone(&transport), code_provider)
                .await?;

        Ok(SpotifyClient::new(
            transport,
            tokens,
            config::spotify_api_url(),
            cancel,
        ))
    }

    pub fn token_manager(&mut self) -> &mut TokenManager {
        &mut self.tokens
    }

    /// Joins a path onto the configured API base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    pub async fn get(&mut self, url: &str) -> Result<Value> {
        self.execute(Method::GET, url, None).await
    }

    pub async fn post(&mut self, url: &str, body: Value) -> Result<Value> {
        self.execute(Method::POST, url, Some(body)).await
    }

    /// Issues one logical request with local recovery.
    ///
    /// - 200/201/202/204: parse the body as the response document (an empty
    ///   body is an empty document) and return.
    /// - 401: force a token refresh, then retry the identical request. The
    ///   server's verdict wins over our own expiry arithmetic.
    /// - 429: wait the server-specified `Retry-After`, then retry.
    /// - anything else: fail with `RemoteApi`, non-retryable.
    ///
    /// 401s and 429s share one bounded retry counter; exhausting it fails
    /// with `RetryExhausted` rather than looping forever.
    pub(crate) async fn execute(
        &mut self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<Value> {
        let mut attempts: u32 = 0;

        loop {
            let access_token = self.tokens.current_access_token().await?;
            let mut request = ApiRequest::new(method.clone(), url);
            request.authorization = Some(format!("Bearer {}", access_token));
            request.json = body.clone();

            let response = self.transport.send(request).await?;
            attempts += 1;

            match response.status.as_u16() {
                200 | 201 | 202 | 204 => return parse_document(&response.body),
                401 => {
                    if attempts > MAX_RETRIES {
                        return Err(NmfError::RetryExhausted { attempts });
                    }
                    self.tokens.force_refresh().await?;
                }
                429 => {
                    if attempts > MAX_RETRIES {
                        return Err(NmfError::RetryExhausted { attempts });
                    }
                    let wait = response.retry_after.unwrap_or(1);
                    cancel::sleep_with_cancel(
                        self.cancel.subscribe(),
                        Duration::from_secs(wait),
                    )
                    .await?;
                }
                status => {
                    return Err(NmfError::RemoteApi {
                        status,
                        body: response.body,
                    });
                }
            }
        }
    }

    /// Splits an oversized collection into consecutive chunks of at most
    /// `chunk_size` and issues one request per chunk, concatenating the
    /// response fragments in chunk order.
    ///
    /// No deduplication, no reordering, no rollback: a mid-batch failure
    /// aborts the operation and leaves earlier chunks' effects applied.
    pub(crate) async fn run_batched<T, F>(
        &mut self,
        items: &[T],
        chunk_size: usize,
        mut request_for: F,
    ) -> Result<Vec<Value>>
    where
        F: FnMut(&[T]) -> (Method, String, Option<Value>),
    {
        let mut fragments = Vec::new();
        for chunk in items.chunks(chunk_size.max(1)) {
            let (method, url, body) = request_for(chunk);
            fragments.push(self.execute(method, &url, body).await?);
        }
        Ok(fragments)
    }
}

fn parse_document(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| NmfError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::config::AuthConfig;
    use crate::http::ApiResponse;
    use crate::http::testing::FakeTransport;
    use crate::spotify::auth::CodeProvider;
    use crate::types::Token;

    struct NoPromptProvider;

    #[async_trait]
    impl CodeProvider for NoPromptProvider {
        async fn obtain_code(&self, _authorize_url: &str) -> Result<String> {
            panic!("interactive authorization must not run in these tests");
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("nmfbot-client-{}-{}", name, std::process::id()))
    }

    fn test_auth_config() -> AuthConfig {
        AuthConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://localhost/".to_string(),
            scope: "playlist-modify-public".to_string(),
            auth_url: "https://accounts.test/authorize".to_string(),
            token_url: "https://accounts.test/api/token".to_string(),
        }
    }

    fn valid_token() -> Token {
        Token {
            access_token: "valid-access".to_string(),
            refresh_token: Some("valid-refresh".to_string()),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            scope: "playlist-modify-public".to_string(),
            created: Utc::now().timestamp() as u64,
        }
    }

    /// Refresh responses keep returning a refresh token so repeated forced
    /// refreshes stay on the refresh grant.
    fn refresh_response() -> ApiResponse {
        FakeTransport::ok(
            r#"{"access_token":"re-access","refresh_token":"re-refresh","token_type":"Bearer","expires_in":3600,"scope":"s"}"#,
        )
    }

    async fn client_with(
        name: &str,
        responses: Vec<ApiResponse>,
    ) -> (SpotifyClient, Arc<FakeTransport>, PathBuf) {
        let dir = scratch_dir(name);
        let store = TokenStore::new(dir.join("token.json"));
        store.save(&valid_token()).await.unwrap();

        let transport = Arc::new(FakeTransport::new(responses));
        let tokens = TokenManager::new(
            test_auth_config(),
            TokenStore::new(dir.join("token.json")),
            transport.clone(),
            Box::new(NoPromptProvider),
        )
        .await
        .unwrap();

        let client = SpotifyClient::new(
            transport.clone(),
            tokens,
            "https://api.test/v1".to_string(),
            CancellationState::new(),
        );
        (client, transport, dir)
    }

    #[tokio::test]
    async fn success_returns_parsed_document() {
        let (mut client, transport, dir) =
            client_with("ok", vec![FakeTransport::ok(r#"{"id":"me"}"#)]).await;

        let doc = client.get("https://api.test/v1/me").await.unwrap();
        assert_eq!(doc["id"], "me");
        assert_eq!(transport.request_count(), 1);

        let requests = transport.requests.lock().unwrap();
        assert_eq!(
            requests[0].authorization.as_deref(),
            Some("Bearer valid-access")
        );
        drop(requests);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn empty_body_is_empty_document() {
        let (mut client, _transport, dir) =
            client_with("empty", vec![FakeTransport::status(204, "")]).await;

        let doc = client.get("https://api.test/v1/whatever").await.unwrap();
        assert!(doc.is_null());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn unauthorized_forces_one_refresh_and_retries_identically() {
        let (mut client, transport, dir) = client_with(
            "401",
            vec![
                FakeTransport::status(401, ""),
                refresh_response(),
                FakeTransport::ok(r#"{"ok":true}"#),
            ],
        )
        .await;

        let doc = client.get("https://api.test/v1/me").await.unwrap();
        assert_eq!(doc["ok"], true);

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        // 1st: original call, 2nd: forced refresh, 3rd: identical retry with
        // the refreshed bearer.
        assert_eq!(requests[1].url, "https://accounts.test/api/token");
        assert_eq!(requests[2].url, requests[0].url);
        assert_eq!(requests[2].authorization.as_deref(), Some("Bearer re-access"));
        drop(requests);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn persistent_unauthorized_exhausts_shared_retry_budget() {
        // Four total attempts, each answered 401; three refreshes in
        // between. The fourth 401 must surface as RetryExhausted.
        let (mut client, transport, dir) = client_with(
            "401loop",
            vec![
                FakeTransport::status(401, ""),
                refresh_response(),
                FakeTransport::status(401, ""),
                refresh_response(),
                FakeTransport::status(401, ""),
                refresh_response(),
                FakeTransport::status(401, ""),
            ],
        )
        .await;

        let result = client.get("https://api.test/v1/me").await;
        assert!(matches!(
            result,
            Err(NmfError::RetryExhausted { attempts: 4 })
        ));
        assert_eq!(transport.request_count(), 7);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_waits_at_least_retry_after() {
        let (mut client, transport, dir) = client_with(
            "429",
            vec![
                FakeTransport::rate_limited(3),
                FakeTransport::ok(r#"{"ok":true}"#),
            ],
        )
        .await;

        let started = tokio::time::Instant::now();
        let doc = client.get("https://api.test/v1/albums").await.unwrap();
        assert_eq!(doc["ok"], true);
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(transport.request_count(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn cancelled_rate_limit_wait_surfaces_cancellation() {
        let dir = scratch_dir("cancel");
        let store = TokenStore::new(dir.join("token.json"));
        store.save(&valid_token()).await.unwrap();

        let transport = Arc::new(FakeTransport::new(vec![FakeTransport::rate_limited(3600)]));
        let tokens = TokenManager::new(
            test_auth_config(),
            TokenStore::new(dir.join("token.json")),
            transport.clone(),
            Box::new(NoPromptProvider),
        )
        .await
        .unwrap();

        let cancel = CancellationState::new();
        cancel.cancel();
        let mut client = SpotifyClient::new(
            transport,
            tokens,
            "https://api.test/v1".to_string(),
            cancel,
        );

        let result = client.get("https://api.test/v1/me").await;
        assert!(matches!(result, Err(NmfError::Cancelled)));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn other_statuses_fail_fast() {
        let (mut client, transport, dir) = client_with(
            "fatal",
            vec![FakeTransport::status(500, "server on fire")],
        )
        .await;

        let result = client.get("https://api.test/v1/me").await;
        match result {
            Err(NmfError::RemoteApi { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "server on fire");
            }
            other => panic!("expected RemoteApi, got {:?}", other),
        }
        assert_eq!(transport.request_count(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn run_batched_chunks_in_order() {
        let (mut client, _transport, dir) = client_with(
            "batch",
            vec![
                FakeTransport::ok(r#"{"chunk":0}"#),
                FakeTransport::ok(r#"{"chunk":1}"#),
                FakeTransport::ok(r#"{"chunk":2}"#),
            ],
        )
        .await;

        let items: Vec<u32> = (0..45).collect();
        let mut sizes = Vec::new();
        let fragments = client
            .run_batched(&items, 20, |chunk| {
                sizes.push(chunk.len());
                (
                    Method::GET,
                    format!("https://api.test/v1/albums?ids={}", chunk.len()),
                    None,
                )
            })
            .await
            .unwrap();

        assert_eq!(sizes, vec![20, 20, 5]);
        assert_eq!(fragments.len(), 3);
        for (i, fragment) in fragments.iter().enumerate() {
            assert_eq!(fragment["chunk"], json!(i as u64));
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn mid_batch_failure_aborts_without_rollback() {
        let (mut client, transport, dir) = client_with(
            "batchfail",
            vec![
                FakeTransport::ok(r#"{"chunk":0}"#),
                FakeTransport::status(500, "nope"),
            ],
        )
        .await;

        let items: Vec<u32> = (0..45).collect();
        let result = client
            .run_batched(&items, 20, |chunk| {
                (
                    Method::POST,
                    "https://api.test/v1/playlists/p/tracks".to_string(),
                    Some(json!({ "count": chunk.len() })),
                )
            })
            .await;

        assert!(matches!(result, Err(NmfError::RemoteApi { status: 500, .. })));
        // The first chunk's effect stands; the third chunk never ran.
        assert_eq!(transport.request_count(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
