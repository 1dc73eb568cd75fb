use serde::{Deserialize, Serialize};
use tabled::Tabled;

fn bearer() -> String {
    "Bearer".to_string()
}

/// One OAuth token record.
///
/// `created` is the wall-clock second the record was obtained, assigned by
/// this client (the server only reports `expires_in`). Records produced by a
/// refresh grant carry no `refresh_token`; only authorization-code records do,
/// and only those are ever persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default = "bearer")]
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub created: u64,
}

impl Token {
    /// A token is expired once the elapsed time exceeds `expires_in`.
    ///
    /// The comparison direction matters: `now - created > expires_in`, not
    /// the inverted form. Pinned by a regression test.
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.created) > self.expires_in
    }
}

/// One `**Artist - [Album]**` entry extracted from the thread body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePair {
    pub artist: String,
    pub album: String,
}

#[derive(Tabled)]
pub struct ReleaseTableRow {
    pub artist: String,
    pub album: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub albums: AlbumPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumPage {
    pub items: Vec<AlbumSummary>,
}

/// Simplified album object as returned by the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveralAlbumsResponse {
    pub albums: Vec<AlbumDetail>,
}

/// Full album object from the multi-album lookup, including track listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumDetail {
    pub id: String,
    pub name: String,
    pub tracks: TrackPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPage {
    pub items: Vec<TrackRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveralTracksResponse {
    pub tracks: Vec<Track>,
}

/// Full track object, carrying the popularity score used for selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub popularity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPlaylistsResponse {
    pub items: Vec<Playlist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(created: u64, expires_in: u64) -> Token {
        Token {
            access_token: "tok".to_string(),
            refresh_token: None,
            token_type: "Bearer".to_string(),
            expires_in,
            scope: String::new(),
            created,
        }
    }

    #[test]
    fn expiry_uses_elapsed_greater_than_lifetime() {
        let t = token(1_000, 3600);

        // Still valid while elapsed <= expires_in, including the boundary.
        assert!(!t.is_expired(1_000));
        assert!(!t.is_expired(4_600));

        // Expired one second past the lifetime.
        assert!(t.is_expired(4_601));
    }

    #[test]
    fn expiry_tolerates_clock_before_creation() {
        // A record stamped in the future must not underflow into "expired".
        let t = token(10_000, 60);
        assert!(!t.is_expired(9_000));
    }

    #[test]
    fn persisted_shape_roundtrips() {
        let t = Token {
            access_token: "a".to_string(),
            refresh_token: Some("r".to_string()),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            scope: "playlist-modify-public".to_string(),
            created: 42,
        };
        let json = serde_json::to_string(&t).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }

    #[test]
    fn refresh_grant_response_parses_without_refresh_token() {
        // The token endpoint's refresh response omits refresh_token and
        // obviously knows nothing about our created stamp.
        let body = r#"{"access_token":"x","token_type":"Bearer","expires_in":3600,"scope":"s"}"#;
        let t: Token = serde_json::from_str(body).unwrap();
        assert_eq!(t.refresh_token, None);
        assert_eq!(t.created, 0);
    }
}
