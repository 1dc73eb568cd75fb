//! New Music Friday thread discovery and release extraction.
//!
//! Straight-line text work: find this week's thread link in the subreddit
//! sidebar, pull the `**Artist - [Album]**` entries out of the post body and
//! scrub them into search-safe queries. All functions here are pure; the
//! network happens in [`crate::reddit`].

use regex::Regex;
use serde_json::Value;

use crate::{types::ReleasePair, utils};

/// Finds this week's thread link in the subreddit sidebar description and
/// reduces it to an API path.
///
/// The weekly threads follow the `new_music_friday_<month>_<day>_<year>`
/// slug convention; the sidebar always links the current one.
pub fn find_thread_path(description: &str, subreddit: &str) -> Option<String> {
    let pattern = format!(
        r"https://www\.reddit\.com(/r/{}/comments/[a-z0-9]+/new_music_friday_[a-z]+_[0-9]{{1,2}}[a-z]{{1,2}}_[0-9]{{4}}/)",
        regex::escape(subreddit)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(description)
        .map(|captures| captures[1].to_string())
}

/// Extracts `(artist, album)` pairs from the thread body.
///
/// Entries look like `**Artist Name - [Album Name](link)**`; everything that
/// does not fit the pattern is ignored. Both names are scrubbed to ASCII
/// because the search endpoint cannot cope with anything else.
pub fn parse_releases(selftext: &str) -> Vec<ReleasePair> {
    let re = Regex::new(r"\*\*(.+?) - \[(.+?)\]").expect("release pattern is valid");
    re.captures_iter(selftext)
        .map(|captures| ReleasePair {
            artist: utils::ascii_scrub(&captures[1]),
            album: utils::ascii_scrub(&captures[2]),
        })
        .filter(|pair| !pair.artist.is_empty() && !pair.album.is_empty())
        .collect()
}

/// The thread title, used as the playlist name.
pub fn thread_title(thread: &Value) -> Option<String> {
    post_field(thread, "title")
}

/// The thread's selftext, holding the release listing.
pub fn thread_body(thread: &Value) -> Option<String> {
    post_field(thread, "selftext")
}

// A comments endpoint response is a two-element array of listings; the post
// itself is the first child of the first listing.
fn post_field(thread: &Value, field: &str) -> Option<String> {
    thread
        .get(0)?
        .get("data")?
        .get("children")?
        .get(0)?
        .get("data")?
        .get(field)?
        .as_str()
        .map(|s| s.to_string())
}
