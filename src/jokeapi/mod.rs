//! JokeAPI client module
//!
//! Builds requests from the current settings, talks to the remote joke
//! service, and normalizes both response shapes into a joke record plus the
//! notification title/body derived from it.

pub mod client;
pub mod model;

pub use client::JokeClient;
pub use model::{FetchedJoke, JokeRecord};

/// Why a fetch cycle produced no joke.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network, HTTP, or body-read failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with `error: true` and a message.
    #[error("{0}")]
    Api(String),

    /// The body was not a response shape we recognize.
    #[error("unexpected response: {0}")]
    Malformed(String),
}
