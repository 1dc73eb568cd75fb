use reqwest::Method;

use crate::{
    Result, config,
    error::NmfError,
    spotify::client::SpotifyClient,
    types::{
        AlbumDetail, AlbumSummary, SearchResponse, SeveralAlbumsResponse, SeveralTracksResponse,
        Track, UserProfile,
    },
};

impl SpotifyClient {
    /// Returns the authenticated user's profile.
    pub async fn me(&mut self) -> Result<UserProfile> {
        let url = self.endpoint("/me");
        let doc = self.get(&url).await?;
        serde_json::from_value(doc).map_err(|e| NmfError::Parse(e.to_string()))
    }

    /// Searches for an album and returns the first result whose primary
    /// artist and album name both contain the queried strings,
    /// case-insensitively.
    ///
    /// Thread entries are free text and often differ from catalog spelling
    /// in punctuation or casing; no match returns `Ok(None)` rather than an
    /// error.
    pub async fn search_album(
        &mut self,
        artist: &str,
        album: &str,
    ) -> Result<Option<AlbumSummary>> {
        let query = format!("q=album:{} artist:{}&type=album", album, artist).replace(' ', "+");
        let url = self.endpoint(&format!("/search?{}", query));
        let doc = self.get(&url).await?;
        let response: SearchResponse =
            serde_json::from_value(doc).map_err(|e| NmfError::Parse(e.to_string()))?;

        let artist_lower = artist.to_lowercase();
        let album_lower = album.to_lowercase();
        Ok(response.albums.items.into_iter().find(|candidate| {
            let artist_matches = candidate
                .artists
                .first()
                .map(|a| a.name.to_lowercase().contains(&artist_lower))
                .unwrap_or(false);
            artist_matches && candidate.name.to_lowercase().contains(&album_lower)
        }))
    }

    /// Fetches full album objects (with track listings) for a list of album
    /// ids, batched to the multi-album lookup limit.
    pub async fn albums(&mut self, ids: &[String]) -> Result<Vec<AlbumDetail>> {
        let base = self.endpoint("/albums");
        let fragments = self
            .run_batched(ids, config::album_lookup_limit(), |chunk| {
                (Method::GET, format!("{}?ids={}", base, chunk.join(",")), None)
            })
            .await?;

        let mut albums = Vec::new();
        for fragment in fragments {
            let page: SeveralAlbumsResponse =
                serde_json::from_value(fragment).map_err(|e| NmfError::Parse(e.to_string()))?;
            albums.extend(page.albums);
        }
        Ok(albums)
    }

    /// Returns the `quantity` most popular tracks of an album.
    ///
    /// The album's track listing only carries simplified track objects, so
    /// a second lookup fetches the full objects with popularity scores.
    pub async fn top_tracks(&mut self, album: &AlbumDetail, quantity: usize) -> Result<Vec<Track>> {
        let ids = album
            .tracks
            .items
            .iter()
            .map(|t| t.id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let url = self.endpoint(&format!("/tracks?ids={}", ids));
        let doc = self.get(&url).await?;
        let response: SeveralTracksResponse =
            serde_json::from_value(doc).map_err(|e| NmfError::Parse(e.to_string()))?;

        let mut tracks = response.tracks;
        tracks.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        tracks.truncate(quantity);
        Ok(tracks)
    }
}
