use std::sync::Arc;

use chrono::Utc;

use crate::{
    Result,
    config::AuthConfig,
    http::Transport,
    management::TokenStore,
    spotify::auth::{self, CodeProvider},
    types::Token,
};

enum AuthState {
    Unauthenticated,
    Authenticated(Token),
}

enum Step {
    Fresh(String),
    Refresh,
    Authorize,
}

/// Owns the OAuth token lifecycle: authorization-code exchange, refresh,
/// expiry checks and persistence.
///
/// The manager is either `Unauthenticated` or `Authenticated`; a refresh or
/// exchange in flight is the transient third state. Construction consults
/// the credential store, so after the first run the human step is skipped
/// entirely.
pub struct TokenManager {
    auth: AuthConfig,
    store: TokenStore,
    transport: Arc<dyn Transport>,
    code_provider: Box<dyn CodeProvider>,
    state: AuthState,
}

impl TokenManager {
    pub async fn new(
        auth: AuthConfig,
        store: TokenStore,
        transport: Arc<dyn Transport>,
        code_provider: Box<dyn CodeProvider>,
    ) -> Result<Self> {
        let state = match store.load().await? {
            Some(token) => AuthState::Authenticated(token),
            None => AuthState::Unauthenticated,
        };
        Ok(TokenManager {
            auth,
            store,
            transport,
            code_provider,
            state,
        })
    }

    /// Returns a currently valid bearer credential.
    ///
    /// Runs the expiry check on every call; the caller has no other way to
    /// learn a token has gone stale. An expired token is refreshed before
    /// returning; an unauthenticated manager runs the full human flow.
    pub async fn current_access_token(&mut self) -> Result<String> {
        let now = Utc::now().timestamp() as u64;
        let step = match &self.state {
            AuthState::Unauthenticated => Step::Authorize,
            AuthState::Authenticated(token) => {
                if token.is_expired(now) {
                    Step::Refresh
                } else {
                    Step::Fresh(token.access_token.clone())
                }
            }
        };

        match step {
            Step::Fresh(access_token) => Ok(access_token),
            Step::Refresh => Ok(self.refresh().await?.access_token),
            Step::Authorize => Ok(self.authorize().await?.access_token),
        }
    }

    /// Refreshes regardless of the local clock. The server's 401 verdict is
    /// authoritative over our own elapsed-time arithmetic.
    pub async fn force_refresh(&mut self) -> Result<()> {
        self.refresh().await?;
        Ok(())
    }

    /// Runs the full authorization-code flow and persists the result.
    ///
    /// Public so the `auth` command can re-authorize on demand even when a
    /// stored record exists.
    pub async fn authorize(&mut self) -> Result<Token> {
        let url = auth::authorize_url(&self.auth);
        let code = self.code_provider.obtain_code(&url).await?;
        let token = auth::exchange_code(self.transport.as_ref(), &self.auth, &code).await?;

        self.store.save(&token).await?;
        self.state = AuthState::Authenticated(token.clone());
        Ok(token)
    }

    /// Obtains a replacement record via the refresh grant and adopts it in
    /// memory only. When the current record has no refresh token (it came
    /// from an earlier refresh grant itself), falls back to the full
    /// authorization flow instead of failing.
    async fn refresh(&mut self) -> Result<Token> {
        let refresh_token = match &self.state {
            AuthState::Authenticated(token) => token.refresh_token.clone(),
            AuthState::Unauthenticated => None,
        };

        match refresh_token {
            Some(refresh_token) => {
                let token =
                    auth::refresh(self.transport.as_ref(), &self.auth, &refresh_token).await?;
                // Not persisted: the refresh response lacks a refresh token
                // and would clobber the durable authorization-code record.
                self.state = AuthState::Authenticated(token.clone());
                Ok(token)
            }
            None => self.authorize().await,
        }
    }
}
