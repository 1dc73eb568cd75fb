//! Configuration management for nmfbot.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and a `.env` file in the application's local data
//! directory. Spotify credentials must be provided; endpoint URLs, the
//! subreddit, batch limits and the token cache location all carry defaults
//! and only need overriding for testing or unusual deployments.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `nmfbot/.env` in the platform-specific local
/// data directory. A missing `.env` file is not an error; credentials may
/// come from the process environment instead.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/nmfbot/.env`
/// - macOS: `~/Library/Application Support/nmfbot/.env`
/// - Windows: `%LOCALAPPDATA%/nmfbot/.env`
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("nmfbot/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the Spotify API client ID for authentication.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_CLIENT_ID").expect("SPOTIFY_CLIENT_ID must be set")
}

/// Returns the Spotify API client secret for authentication.
///
/// The secret authenticates the token-endpoint requests (HTTP Basic) and
/// should never appear in logs or version control.
///
/// # Panics
///
/// Panics if the `SPOTIFY_CLIENT_SECRET` environment variable is not set.
pub fn spotify_client_secret() -> String {
    env::var("SPOTIFY_CLIENT_SECRET").expect("SPOTIFY_CLIENT_SECRET must be set")
}

/// Returns the OAuth redirect URI registered for the application.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_REDIRECT_URI").unwrap_or_else(|_| "http://localhost/".to_string())
}

/// Returns the Spotify scope requested during authorization.
///
/// Creating and filling the weekly playlist only needs
/// `playlist-modify-public`.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_SCOPE").unwrap_or_else(|_| "playlist-modify-public".to_string())
}

/// Returns the Spotify OAuth authorization URL (human-visited).
pub fn spotify_auth_url() -> String {
    env::var("SPOTIFY_AUTH_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/authorize".to_string())
}

/// Returns the Spotify OAuth token exchange URL.
pub fn spotify_token_url() -> String {
    env::var("SPOTIFY_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string())
}

/// Returns the Spotify Web API base URL.
pub fn spotify_api_url() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| "https://api.spotify.com/v1".to_string())
}

/// Returns the reddit JSON API base URL.
pub fn reddit_api_url() -> String {
    env::var("REDDIT_API_URL").unwrap_or_else(|_| "https://www.reddit.com".to_string())
}

/// Returns the subreddit hosting the weekly New Music Friday thread.
pub fn subreddit() -> String {
    env::var("NMFBOT_SUBREDDIT").unwrap_or_else(|_| "indieheads".to_string())
}

/// Maximum number of album ids per multi-album lookup request.
///
/// A property of the `/albums` endpoint, kept as configuration rather than a
/// constant buried in request logic.
pub fn album_lookup_limit() -> usize {
    env::var("NMFBOT_ALBUM_LOOKUP_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(20)
}

/// Maximum number of track URIs per playlist-append request.
pub fn playlist_add_limit() -> usize {
    env::var("NMFBOT_PLAYLIST_ADD_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(100)
}

/// How many of an album's most popular tracks end up on the playlist.
pub fn tracks_per_album() -> usize {
    env::var("NMFBOT_TRACKS_PER_ALBUM")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(2)
}

/// Returns the location of the persisted token record.
///
/// Defaults to `nmfbot/cache/token.json` under the local data directory;
/// `NMFBOT_TOKEN_CACHE` overrides it (tests redirect storage this way).
pub fn token_cache_path() -> PathBuf {
    if let Ok(path) = env::var("NMFBOT_TOKEN_CACHE") {
        return PathBuf::from(path);
    }
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("nmfbot/cache/token.json");
    path
}

/// Returns the description attached to created playlists.
pub fn playlist_description() -> String {
    format!(
        "The most popular tracks from this week's New Music Friday on /r/{}",
        subreddit()
    )
}

/// Everything the token lifecycle needs to talk to the authorization server.
///
/// Passed into the token manager explicitly so tests can point it at a
/// scripted endpoint instead of the real accounts host.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
}

/// Builds the [`AuthConfig`] from the environment.
pub fn auth_config() -> AuthConfig {
    AuthConfig {
        client_id: spotify_client_id(),
        client_secret: spotify_client_secret(),
        redirect_uri: spotify_redirect_uri(),
        scope: spotify_scope(),
        auth_url: spotify_auth_url(),
        token_url: spotify_token_url(),
    }
}
