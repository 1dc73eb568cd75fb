use tabled::Table;

use crate::{
    cli::playlist::fetch_releases, config, info, reddit::RedditClient, types::ReleaseTableRow,
};

/// Previews the parsed (artist, album) pairs for this week's thread without
/// touching Spotify.
pub async fn releases() {
    let subreddit = config::subreddit();
    let reddit = RedditClient::new(config::reddit_api_url());

    let (title, releases) = fetch_releases(&reddit, &subreddit).await;
    info!("{}: {} releases", title, releases.len());

    let rows: Vec<ReleaseTableRow> = releases
        .into_iter()
        .map(|pair| ReleaseTableRow {
            artist: pair.artist,
            album: pair.album,
        })
        .collect();

    let table = Table::new(rows);
    println!("{}", table);
}
