/// Percent-encodes `:` and `/` so a redirect URI survives inside a query
/// string.
pub fn webify_url(url: &str) -> String {
    url.replace(':', "%3A").replace('/', "%2F")
}

/// Drops every non-ASCII character. The Spotify search endpoint only copes
/// with ASCII queries, and thread bodies are full of unicode dashes and
/// diacritics.
pub fn ascii_scrub(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Extracts the `code` query parameter from a pasted redirect URL.
///
/// Accepts the full redirected URL, just its query string, or a bare code.
pub fn code_from_redirect(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let query = match input.split_once('?') {
        Some((_, query)) => query,
        None => input,
    };

    for pair in query.split('&') {
        if let Some(code) = pair.strip_prefix("code=") {
            let code = code.split(['#', ' ']).next().unwrap_or(code);
            if !code.is_empty() {
                return Some(code.to_string());
            }
        }
    }

    // A bare code pasted directly, without any URL around it.
    if !input.contains('=') && !input.contains('/') {
        return Some(input.to_string());
    }

    None
}
