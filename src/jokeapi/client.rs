use std::time::Duration;

use crate::config::{Settings, ANY_CATEGORY};

use super::model::{FetchedJoke, JokeResponse};
use super::FetchError;

/// Production joke endpoint.
pub const JOKEAPI_BASE_URL: &str = "https://v2.jokeapi.dev/joke";

/// Flags excluded on every request, regardless of safe mode.
pub const BLACKLIST_FLAGS: &str = "religious,racist,sexist,explicit";

/// Bound on a single request so a hung server costs one cycle, not the loop.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the joke service.
pub struct JokeClient {
    http: reqwest::Client,
    base_url: String,
}

impl JokeClient {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(JOKEAPI_BASE_URL)
    }

    /// Client against an alternate endpoint. Integration tests point this at
    /// a local stub server.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("joke-notifier/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Build the request URL for the given settings.
    ///
    /// The category path segment is the literal `Any` (the service's
    /// no-filter lookup) when the sentinel is selected, otherwise the
    /// comma-joined selection in order. `lang` is only sent when it differs
    /// from the service default of English.
    pub fn joke_url(&self, settings: &Settings) -> String {
        let categories = if settings.wants_any_category() {
            ANY_CATEGORY.to_string()
        } else {
            settings.categories.join(",")
        };

        let mut url = format!(
            "{}/{}?blacklistFlags={}",
            self.base_url, categories, BLACKLIST_FLAGS
        );

        if settings.safe_mode {
            url.push_str("&safe-mode");
        }
        if let Some(kind) = settings.joke_type.query_value() {
            url.push_str("&type=");
            url.push_str(kind);
        }
        if settings.language != "en" {
            url.push_str("&lang=");
            url.push_str(&settings.language);
        }

        url
    }

    /// Fetch one joke.
    ///
    /// The service reports its own errors as JSON with `error: true`, often
    /// under a non-2xx status, so the body is decoded before the status is
    /// consulted.
    pub async fn fetch(&self, settings: &Settings) -> Result<FetchedJoke, FetchError> {
        let url = self.joke_url(settings);
        tracing::debug!(%url, "requesting joke");

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        let wire: JokeResponse = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                FetchError::Malformed(format!("invalid JSON body: {e}"))
            } else {
                FetchError::Malformed(format!("HTTP {} with non-JSON body", status.as_u16()))
            }
        })?;

        if wire.error {
            let message = wire
                .message
                .unwrap_or_else(|| "unknown API error".to_string());
            return Err(FetchError::Api(message));
        }

        FetchedJoke::from_wire(wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JokeType;

    fn client() -> JokeClient {
        JokeClient::new().unwrap()
    }

    #[test]
    fn test_any_category_omits_filter() {
        let settings = Settings::default();
        let url = client().joke_url(&settings);
        assert!(url.starts_with("https://v2.jokeapi.dev/joke/Any?"));
        assert!(!url.contains("Programming"));
    }

    #[test]
    fn test_explicit_categories_joined_in_order() {
        let settings = Settings {
            categories: vec!["Programming".to_string(), "Misc".to_string(), "Pun".to_string()],
            ..Settings::default()
        };
        let url = client().joke_url(&settings);
        assert!(url.contains("/joke/Programming,Misc,Pun?"));
    }

    #[test]
    fn test_blacklist_always_present() {
        let unsafe_settings = Settings {
            safe_mode: false,
            ..Settings::default()
        };
        let url = client().joke_url(&unsafe_settings);
        assert!(url.contains("blacklistFlags=religious,racist,sexist,explicit"));
        assert!(!url.contains("safe-mode"));
    }

    #[test]
    fn test_safe_mode_flag() {
        let url = client().joke_url(&Settings::default());
        assert!(url.contains("&safe-mode"));
    }

    #[test]
    fn test_type_filter_only_when_selected() {
        let mut settings = Settings::default();
        assert!(!client().joke_url(&settings).contains("&type="));

        settings.joke_type = JokeType::TwoPart;
        assert!(client().joke_url(&settings).contains("&type=twopart"));

        settings.joke_type = JokeType::Single;
        assert!(client().joke_url(&settings).contains("&type=single"));
    }

    #[test]
    fn test_lang_only_when_not_english() {
        let mut settings = Settings::default();
        assert!(!client().joke_url(&settings).contains("&lang="));

        settings.language = "de".to_string();
        assert!(client().joke_url(&settings).contains("&lang=de"));
    }
}
