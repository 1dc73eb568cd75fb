//! # CLI Module
//!
//! User-facing command implementations. Each command wires together the
//! reddit client, the thread parser and the Spotify client, handles console
//! feedback and converts failures into terminal output; all recoverable
//! logic lives below this layer.
//!
//! - [`auth`] - runs the interactive authorization flow and stores the token
//! - [`playlist`] - full pipeline: thread → releases → albums → playlist
//! - [`releases`] - previews the parsed (artist, album) pairs as a table

mod auth;
mod playlist;
mod releases;

pub use auth::auth;
pub use playlist::playlist;
pub use releases::releases;
