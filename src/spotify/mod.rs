//! # Spotify Integration Module
//!
//! Everything that talks to the Spotify Web API. The centerpiece is
//! [`client::SpotifyClient`], an authenticated client whose request executor
//! recovers locally from expired tokens (401, forced refresh) and rate
//! limiting (429, `Retry-After` back-off) under a shared bounded retry
//! budget, and whose batch planner splits oversized id collections into
//! endpoint-compliant chunks.
//!
//! [`auth`] owns the protocol side of the token lifecycle: the authorization
//! URL a human visits, the code exchange and the refresh grant, both POSTed
//! to the token endpoint with HTTP Basic client credentials. The state
//! machine that decides *when* to exchange or refresh lives in
//! [`crate::management`].
//!
//! [`albums`] and [`playlist`] are thin endpoint wrappers over the executor:
//! album search and batched multi-album lookup, popularity-ranked track
//! selection, playlist creation and batched track addition.

pub mod albums;
pub mod auth;
pub mod client;
pub mod playlist;
