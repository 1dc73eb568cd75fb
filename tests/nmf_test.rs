use nmfbot::nmf::{find_thread_path, parse_releases, thread_body, thread_title};
use nmfbot::types::ReleasePair;
use nmfbot::utils::{ascii_scrub, code_from_redirect, webify_url};
use serde_json::json;

const SIDEBAR: &str = "Welcome to /r/indieheads! Weekly threads: \
[New Music Friday](https://www.reddit.com/r/indieheads/comments/1abc23/new_music_friday_august_22nd_2025/) \
and more.";

#[test]
fn test_find_thread_path() {
    let path = find_thread_path(SIDEBAR, "indieheads").unwrap();
    assert_eq!(
        path,
        "/r/indieheads/comments/1abc23/new_music_friday_august_22nd_2025/"
    );
}

#[test]
fn test_find_thread_path_requires_matching_subreddit() {
    assert!(find_thread_path(SIDEBAR, "music").is_none());
}

#[test]
fn test_find_thread_path_ignores_other_links() {
    let description =
        "See https://www.reddit.com/r/indieheads/comments/9xy/album_discussion_thread/ for more";
    assert!(find_thread_path(description, "indieheads").is_none());
}

#[test]
fn test_parse_releases() {
    let body = "\
Happy Friday! This week's releases:\n\n\
**Big Thief - [Double Infinity](https://example.com/a)** some blurb\n\
**Sufjan Stevens - [Javelin](https://example.com/b)**\n\
Random line without an entry.\n\
**Water From Your Eyes - [Everyone's Crushed]**\n";

    let releases = parse_releases(body);
    assert_eq!(
        releases,
        vec![
            ReleasePair {
                artist: "Big Thief".to_string(),
                album: "Double Infinity".to_string()
            },
            ReleasePair {
                artist: "Sufjan Stevens".to_string(),
                album: "Javelin".to_string()
            },
            ReleasePair {
                artist: "Water From Your Eyes".to_string(),
                album: "Everyone's Crushed".to_string()
            },
        ]
    );
}

#[test]
fn test_parse_releases_scrubs_non_ascii() {
    let body = "**Sigur Rós - [Ágætis byrjun]**";
    let releases = parse_releases(body);
    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].artist, "Sigur Rs");
    assert_eq!(releases[0].album, "gtis byrjun");
}

#[test]
fn test_parse_releases_drops_entries_scrubbed_to_nothing() {
    // An entry that is entirely non-ASCII cannot be searched for.
    let body = "**宇多田ヒカル - [初恋]**\n**Beak> - [>>>>]**";
    let releases = parse_releases(body);
    assert_eq!(
        releases,
        vec![ReleasePair {
            artist: "Beak>".to_string(),
            album: ">>>>".to_string()
        }]
    );
}

#[test]
fn test_parse_releases_empty_body() {
    assert!(parse_releases("").is_empty());
    assert!(parse_releases("no entries here").is_empty());
}

#[test]
fn test_thread_title_and_body() {
    let thread = json!([
        {
            "data": {
                "children": [
                    { "data": { "title": "New Music Friday: August 22nd, 2025",
                                "selftext": "**A - [B]**" } }
                ]
            }
        },
        { "data": { "children": [] } }
    ]);

    assert_eq!(
        thread_title(&thread).unwrap(),
        "New Music Friday: August 22nd, 2025"
    );
    assert_eq!(thread_body(&thread).unwrap(), "**A - [B]**");
}

#[test]
fn test_thread_accessors_on_malformed_document() {
    assert!(thread_title(&json!({})).is_none());
    assert!(thread_body(&json!([])).is_none());
}

#[test]
fn test_webify_url() {
    assert_eq!(
        webify_url("http://localhost/callback"),
        "http%3A%2F%2Flocalhost%2Fcallback"
    );
}

#[test]
fn test_ascii_scrub() {
    assert_eq!(ascii_scrub("  Mitski  "), "Mitski");
    assert_eq!(ascii_scrub("Björk"), "Bjrk");
    assert_eq!(ascii_scrub("日本語"), "");
}

#[test]
fn test_code_from_redirect_full_url() {
    assert_eq!(
        code_from_redirect("http://localhost/?code=abc123&state=xyz\n"),
        Some("abc123".to_string())
    );
}

#[test]
fn test_code_from_redirect_bare_code() {
    assert_eq!(code_from_redirect("abc123"), Some("abc123".to_string()));
}

#[test]
fn test_code_from_redirect_rejects_garbage() {
    assert_eq!(code_from_redirect(""), None);
    assert_eq!(code_from_redirect("http://localhost/?error=access_denied"), None);
}
