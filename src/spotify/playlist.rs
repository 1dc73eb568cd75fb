use reqwest::Method;
use serde_json::json;

use crate::{
    Result, config,
    error::NmfError,
    spotify::client::SpotifyClient,
    types::{CreatePlaylistRequest, Playlist, SnapshotResponse, UserPlaylistsResponse},
};

impl SpotifyClient {
    /// Checks whether the user already owns a playlist with this name, so a
    /// re-run of the bot does not create a duplicate.
    pub async fn playlist_exists(&mut self, name: &str) -> Result<bool> {
        let url = self.endpoint("/me/playlists?limit=50");
        let doc = self.get(&url).await?;
        let response: UserPlaylistsResponse =
            serde_json::from_value(doc).map_err(|e| NmfError::Parse(e.to_string()))?;
        Ok(response.items.iter().any(|p| p.name == name))
    }

    /// Creates a public playlist with the weekly description.
    pub async fn create_playlist(&mut self, user_id: &str, name: &str) -> Result<Playlist> {
        let url = self.endpoint(&format!("/users/{}/playlists", user_id));
        let request = CreatePlaylistRequest {
            name: name.to_string(),
            description: config::playlist_description(),
            public: true,
        };
        let body = serde_json::to_value(&request).map_err(|e| NmfError::Parse(e.to_string()))?;
        let doc = self.post(&url, body).await?;
        serde_json::from_value(doc).map_err(|e| NmfError::Parse(e.to_string()))
    }

    /// Appends track URIs to a playlist, batched to the collection-append
    /// limit. Chunks already applied are not rolled back when a later chunk
    /// fails; re-running the whole operation may duplicate them.
    pub async fn add_tracks(
        &mut self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<Vec<SnapshotResponse>> {
        let url = self.endpoint(&format!("/playlists/{}/tracks", playlist_id));
        let fragments = self
            .run_batched(uris, config::playlist_add_limit(), |chunk| {
                (Method::POST, url.clone(), Some(json!({ "uris": chunk })))
            })
            .await?;

        let mut snapshots = Vec::new();
        for fragment in fragments {
            snapshots.push(
                serde_json::from_value(fragment).map_err(|e| NmfError::Parse(e.to_string()))?,
            );
        }
        Ok(snapshots)
    }
}
