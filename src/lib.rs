//! New Music Friday Bot Library
//!
//! This library discovers the weekly New Music Friday discussion thread on a
//! subreddit, extracts the posted (artist, album) pairs from its body, resolves
//! them against the Spotify Web API and assembles the most popular tracks into
//! a playlist. The Spotify side is built around an authenticated client with
//! token-lifecycle management and resilient request execution.
//!
//! # Modules
//!
//! - `cancel` - Cooperative cancellation for long suspensions
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Crate-wide failure taxonomy
//! - `http` - HTTP transport seam used by the Spotify client
//! - `management` - Token lifecycle and credential persistence
//! - `nmf` - Thread discovery and release extraction
//! - `reddit` - Thin reddit JSON read client
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod management;
pub mod nmf;
pub mod reddit;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// All fallible library operations report a [`error::NmfError`]; only the CLI
/// layer converts failures into terminal output.
pub type Result<T> = std::result::Result<T, error::NmfError>;

/// Prints an informational message with a blue bullet point.
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Used to provide positive feedback when operations complete successfully.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// This macro terminates the process with exit code 1 after printing. It is
/// reserved for the CLI layer, where no recovery is possible; library code
/// propagates [`error::NmfError`] instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues or important information that users should
/// notice without terminating the program.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
