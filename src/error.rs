use thiserror::Error;

/// Crate-wide failure taxonomy.
///
/// The executor handles 401 and 429 internally; what reaches callers is
/// either a terminal remote error, an exhausted retry budget, or a local
/// failure (transport, storage, parsing, cancellation).
#[derive(Error, Debug)]
pub enum NmfError {
    /// The request never produced an HTTP response.
    #[error("HTTP transport error: {0}")]
    Http(String),

    /// The persisted token record could not be read or written.
    #[error("token storage error: {0}")]
    Storage(String),

    /// The token endpoint rejected a grant.
    #[error("token exchange failed with status {status}: {body}")]
    AuthExchange { status: u16, body: String },

    /// The API answered with a status the executor does not recover from.
    #[error("API request failed with status {status}: {body}")]
    RemoteApi { status: u16, body: String },

    /// 401/429 recovery ran out of retries.
    #[error("request failed after {attempts} attempts")]
    RetryExhausted { attempts: u32 },

    /// A response body did not match the expected document shape.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The operation was cancelled while suspended.
    #[error("operation cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
