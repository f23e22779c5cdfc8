//! Joke Notifier
//!
//! A small desktop utility that fetches a joke from JokeAPI on a
//! configurable cadence and raises it as an OS notification. The GUI shows
//! the recent jokes, a countdown to the next one, and a settings panel.

pub mod app;
pub mod config;
pub mod history;
pub mod jokeapi;
pub mod notify;
pub mod poller;
pub mod ui;

/// Application name used for window titles and notification attribution.
pub const APP_NAME: &str = "Joke Notifier";
