use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::Method;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    Result, cancel,
    cancel::CancellationState,
    config::AuthConfig,
    error::NmfError,
    http::{ApiRequest, Transport},
    info, types::Token,
    utils, warning,
};

/// Builds the authorization URL a human must visit to grant access.
///
/// Response type is fixed to "code"; the redirected URL carries the
/// single-use authorization code back to us.
pub fn authorize_url(auth: &AuthConfig) -> String {
    format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}",
        auth_url = auth.auth_url,
        client_id = auth.client_id,
        redirect_uri = utils::webify_url(&auth.redirect_uri),
        scope = auth.scope,
    )
}

/// Exchanges an authorization code for a token record.
///
/// The record is stamped with the current wall-clock time and normally
/// carries a refresh token; the caller persists it.
pub async fn exchange_code(
    transport: &dyn Transport,
    auth: &AuthConfig,
    code: &str,
) -> Result<Token> {
    token_request(
        transport,
        auth,
        vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), auth.redirect_uri.clone()),
        ],
    )
    .await
}

/// Exchanges a refresh token for a fresh access token.
///
/// The response record carries no refresh token and must not be persisted;
/// overwriting a stored authorization-code record with it would destroy the
/// still-valid refresh token.
pub async fn refresh(
    transport: &dyn Transport,
    auth: &AuthConfig,
    refresh_token: &str,
) -> Result<Token> {
    token_request(
        transport,
        auth,
        vec![
            ("grant_type".to_string(), "refresh_token".to_string()),
            ("refresh_token".to_string(), refresh_token.to_string()),
        ],
    )
    .await
}

/// POSTs a form-encoded grant to the token endpoint, authenticated with
/// HTTP Basic `client_id:client_secret`.
async fn token_request(
    transport: &dyn Transport,
    auth: &AuthConfig,
    form: Vec<(String, String)>,
) -> Result<Token> {
    let credentials = STANDARD.encode(format!("{}:{}", auth.client_id, auth.client_secret));

    let mut request = ApiRequest::new(Method::POST, auth.token_url.clone());
    request.authorization = Some(format!("Basic {}", credentials));
    request.form = Some(form);

    let response = transport.send(request).await?;
    if !response.status.is_success() {
        return Err(NmfError::AuthExchange {
            status: response.status.as_u16(),
            body: response.body,
        });
    }

    let mut token: Token =
        serde_json::from_str(&response.body).map_err(|e| NmfError::Parse(e.to_string()))?;
    token.created = Utc::now().timestamp() as u64;
    Ok(token)
}

/// Source of the authorization code for the human-in-the-loop step.
///
/// A trait seam so the token manager can run in tests without a terminal.
#[async_trait]
pub trait CodeProvider: Send + Sync {
    async fn obtain_code(&self, authorize_url: &str) -> Result<String>;
}

/// Production code provider: opens the authorize URL in a browser, then
/// reads the redirected URL from stdin. The wait is cancellable, since a
/// deployment cannot tolerate an indefinite block on human input.
pub struct PromptCodeProvider {
    cancel: CancellationState,
}

impl PromptCodeProvider {
    pub fn new(cancel: CancellationState) -> Self {
        PromptCodeProvider { cancel }
    }
}

#[async_trait]
impl CodeProvider for PromptCodeProvider {
    async fn obtain_code(&self, authorize_url: &str) -> Result<String> {
        if webbrowser::open(authorize_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                authorize_url
            );
        } else {
            info!("Opened the authorization page in your browser:\n{}", authorize_url);
        }
        info!("After granting access, paste the URL you were redirected to:");

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        let mut cancel_rx = self.cancel.subscribe();

        tokio::select! {
            read = reader.read_line(&mut line) => {
                read?;
            }
            _ = cancel::cancelled(&mut cancel_rx) => {
                return Err(NmfError::Cancelled);
            }
        }

        utils::code_from_redirect(&line)
            .ok_or_else(|| NmfError::Parse("no code parameter in redirect URL".to_string()))
    }
}
