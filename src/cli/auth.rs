use crate::{cancel::CancellationState, error, spotify::client::SpotifyClient, success};

pub async fn auth(cancel: CancellationState) {
    let mut spotify = match SpotifyClient::connect(cancel).await {
        Ok(client) => client,
        Err(e) => error!("Failed to initialize Spotify client: {}", e),
    };

    // Always run the full flow, even with a stored record; `auth` exists to
    // re-consent or switch accounts.
    match spotify.token_manager().authorize().await {
        Ok(_) => success!("Authentication successful!"),
        Err(e) => error!("Authentication failed: {}", e),
    }
}
