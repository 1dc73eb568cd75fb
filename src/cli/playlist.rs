use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    cancel::CancellationState,
    config, error, info, nmf,
    reddit::RedditClient,
    spotify::client::SpotifyClient,
    success,
    types::ReleasePair,
    warning,
};

pub async fn playlist(cancel: CancellationState, name_override: Option<String>) {
    let mut spotify = match SpotifyClient::connect(cancel).await {
        Ok(client) => client,
        Err(e) => error!("Failed to initialize Spotify client: {}", e),
    };

    let subreddit = config::subreddit();
    let reddit = RedditClient::new(config::reddit_api_url());

    info!("Looking up this week's New Music Friday thread on /r/{}", subreddit);
    let (title, releases) = fetch_releases(&reddit, &subreddit).await;
    let playlist_name = name_override.unwrap_or(title);
    success!("Found {} releases in \"{}\"", releases.len(), playlist_name);

    match spotify.playlist_exists(&playlist_name).await {
        Ok(true) => {
            info!("Playlist \"{}\" already exists, nothing to do", playlist_name);
            return;
        }
        Ok(false) => {}
        Err(e) => warning!("Failed to check for an existing playlist: {}", e),
    }

    let pb = spinner("Searching Spotify for albums...");
    let mut album_ids = Vec::new();
    let mut missed = 0usize;
    for ReleasePair { artist, album } in &releases {
        match spotify.search_album(artist, album).await {
            Ok(Some(found)) => album_ids.push(found.id),
            Ok(None) => missed += 1,
            Err(e) => {
                pb.finish_and_clear();
                error!("Album search failed for {} - {}: {}", artist, album, e);
            }
        }
    }
    pb.finish_and_clear();

    if missed > 0 {
        warning!("{} releases were not found on Spotify", missed);
    }
    if album_ids.is_empty() {
        error!("None of the releases could be resolved; not creating an empty playlist");
    }

    let albums = match spotify.albums(&album_ids).await {
        Ok(albums) => albums,
        Err(e) => error!("Failed to fetch album details: {}", e),
    };

    let quantity = config::tracks_per_album();
    let mut track_uris = Vec::new();
    for album in &albums {
        match spotify.top_tracks(album, quantity).await {
            Ok(tracks) => track_uris.extend(tracks.into_iter().map(|t| t.uri)),
            Err(e) => warning!("Failed to rank tracks for {}: {}", album.name, e),
        }
    }
    if track_uris.is_empty() {
        error!("No tracks selected; not creating an empty playlist");
    }

    let user = match spotify.me().await {
        Ok(user) => user,
        Err(e) => error!("Failed to resolve the Spotify user: {}", e),
    };

    let playlist = match spotify.create_playlist(&user.id, &playlist_name).await {
        Ok(playlist) => playlist,
        Err(e) => error!("Failed to create playlist: {}", e),
    };

    if let Err(e) = spotify.add_tracks(&playlist.id, &track_uris).await {
        // Earlier chunks may already be applied; say so instead of
        // pretending the playlist is untouched.
        error!(
            "Failed while adding tracks (the playlist may be partially filled): {}",
            e
        );
    }

    success!(
        "Created playlist \"{}\" with {} tracks",
        playlist_name,
        track_uris.len()
    );
}

/// Discovers the thread via the sidebar and parses its release listing.
pub(crate) async fn fetch_releases(
    reddit: &RedditClient,
    subreddit: &str,
) -> (String, Vec<ReleasePair>) {
    let about = match reddit.fetch(&format!("/r/{}/about.json", subreddit)).await {
        Ok(about) => about,
        Err(e) => error!("Failed to fetch /r/{} sidebar: {}", subreddit, e),
    };

    let description = about["data"]["description"].as_str().unwrap_or_default();
    let path = match nmf::find_thread_path(description, subreddit) {
        Some(path) => path,
        None => error!(
            "No New Music Friday thread linked from the /r/{} sidebar",
            subreddit
        ),
    };

    let endpoint = format!("{}.json", path.trim_end_matches('/'));
    let thread = match reddit.fetch(&endpoint).await {
        Ok(thread) => thread,
        Err(e) => error!("Failed to fetch thread {}: {}", path, e),
    };

    let title = nmf::thread_title(&thread).unwrap_or_else(|| "New Music Friday".to_string());
    let body = nmf::thread_body(&thread).unwrap_or_default();
    let releases = nmf::parse_releases(&body);
    if releases.is_empty() {
        error!("No releases found in the thread body of \"{}\"", title);
    }

    (title, releases)
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
