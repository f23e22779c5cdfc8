use serde::Deserialize;

use super::FetchError;

/// Fallback notification title when the setup is unusable as one.
pub const GENERIC_TITLE: &str = "Joke Time!";

/// Longest setup that still works as a notification title.
const MAX_TITLE_CHARS: usize = 50;

/// Raw response body from the joke endpoint.
///
/// The service reuses one shape for everything: error replies carry `error`
/// and `message`, jokes carry `type` plus either `joke` or `setup`/`delivery`.
#[derive(Debug, Clone, Deserialize)]
pub struct JokeResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub joke: Option<String>,
    #[serde(default)]
    pub setup: Option<String>,
    #[serde(default)]
    pub delivery: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
}

/// A joke normalized out of the two wire shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum JokePayload {
    Single(String),
    TwoPart { setup: String, delivery: String },
}

impl JokePayload {
    pub fn from_response(resp: &JokeResponse) -> Result<Self, FetchError> {
        match resp.kind.as_deref() {
            Some("single") => {
                let joke = resp
                    .joke
                    .clone()
                    .ok_or_else(|| FetchError::Malformed("single joke without `joke` field".into()))?;
                Ok(Self::Single(joke))
            }
            Some("twopart") => {
                let setup = resp
                    .setup
                    .clone()
                    .ok_or_else(|| FetchError::Malformed("twopart joke without `setup` field".into()))?;
                let delivery = resp
                    .delivery
                    .clone()
                    .ok_or_else(|| FetchError::Malformed("twopart joke without `delivery` field".into()))?;
                Ok(Self::TwoPart { setup, delivery })
            }
            Some(other) => Err(FetchError::Malformed(format!("unknown joke type `{other}`"))),
            None => Err(FetchError::Malformed("response has no `type` field".into())),
        }
    }

    /// Full display text: single jokes as-is, twopart with a blank line
    /// between setup and delivery.
    pub fn text(&self) -> String {
        match self {
            Self::Single(joke) => joke.clone(),
            Self::TwoPart { setup, delivery } => format!("{setup}\n\n{delivery}"),
        }
    }

    /// Notification title. The setup doubles as the title for twopart jokes
    /// unless it is too long to fit one.
    pub fn notification_title(&self) -> String {
        match self {
            Self::Single(_) => GENERIC_TITLE.to_string(),
            Self::TwoPart { setup, .. } => {
                if setup.chars().count() > MAX_TITLE_CHARS {
                    GENERIC_TITLE.to_string()
                } else {
                    setup.clone()
                }
            }
        }
    }

    /// Notification body. Twopart jokes show only the punchline, since the
    /// setup already went into the title.
    pub fn notification_body(&self) -> &str {
        match self {
            Self::Single(joke) => joke,
            Self::TwoPart { delivery, .. } => delivery,
        }
    }
}

/// One fetched joke plus its display metadata. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct JokeRecord {
    pub text: String,
    pub category: String,
    /// Human-readable capture time, e.g. `03:15 PM`.
    pub timestamp: String,
    /// Server-assigned id rendered as a string, empty when absent.
    pub id: String,
}

/// A successful fetch: the record for the history list and the title/body
/// pair for the notification.
#[derive(Debug, Clone)]
pub struct FetchedJoke {
    pub record: JokeRecord,
    pub title: String,
    pub body: String,
}

impl FetchedJoke {
    pub fn from_wire(resp: JokeResponse) -> Result<Self, FetchError> {
        let payload = JokePayload::from_response(&resp)?;
        let record = JokeRecord {
            text: payload.text(),
            category: resp.category.unwrap_or_default(),
            timestamp: chrono::Local::now().format("%I:%M %p").to_string(),
            id: resp.id.map(|id| id.to_string()).unwrap_or_default(),
        };
        Ok(Self {
            title: payload.notification_title(),
            body: payload.notification_body().to_string(),
            record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_response(joke: &str) -> JokeResponse {
        JokeResponse {
            error: false,
            message: None,
            kind: Some("single".to_string()),
            joke: Some(joke.to_string()),
            setup: None,
            delivery: None,
            category: Some("Misc".to_string()),
            id: Some(42),
        }
    }

    fn twopart_response(setup: &str, delivery: &str) -> JokeResponse {
        JokeResponse {
            error: false,
            message: None,
            kind: Some("twopart".to_string()),
            joke: None,
            setup: Some(setup.to_string()),
            delivery: Some(delivery.to_string()),
            category: Some("Pun".to_string()),
            id: Some(7),
        }
    }

    #[test]
    fn test_single_joke_text_and_notification() {
        let fetched = FetchedJoke::from_wire(single_response("X")).unwrap();
        assert_eq!(fetched.record.text, "X");
        assert_eq!(fetched.title, GENERIC_TITLE);
        assert_eq!(fetched.body, "X");
        assert_eq!(fetched.record.category, "Misc");
        assert_eq!(fetched.record.id, "42");
    }

    #[test]
    fn test_twopart_short_setup_becomes_title() {
        let fetched = FetchedJoke::from_wire(twopart_response("S", "D")).unwrap();
        assert_eq!(fetched.record.text, "S\n\nD");
        assert_eq!(fetched.title, "S");
        // The setup lives in the title, so the body is the punchline alone.
        assert_eq!(fetched.body, "D");
    }

    #[test]
    fn test_twopart_long_setup_falls_back_to_generic_title() {
        let setup = "s".repeat(51);
        let fetched = FetchedJoke::from_wire(twopart_response(&setup, "D")).unwrap();
        assert_eq!(fetched.title, GENERIC_TITLE);
        assert_eq!(fetched.body, "D");
        assert_eq!(fetched.record.text, format!("{setup}\n\nD"));
    }

    #[test]
    fn test_setup_of_exactly_fifty_chars_stays_title() {
        let setup = "s".repeat(50);
        let fetched = FetchedJoke::from_wire(twopart_response(&setup, "D")).unwrap();
        assert_eq!(fetched.title, setup);
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        let mut resp = single_response("X");
        resp.joke = None;
        assert!(matches!(
            JokePayload::from_response(&resp),
            Err(FetchError::Malformed(_))
        ));

        let mut resp = twopart_response("S", "D");
        resp.delivery = None;
        assert!(matches!(
            JokePayload::from_response(&resp),
            Err(FetchError::Malformed(_))
        ));

        let mut resp = single_response("X");
        resp.kind = Some("threepart".to_string());
        assert!(matches!(
            JokePayload::from_response(&resp),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn test_absent_category_and_id_default_to_empty() {
        let mut resp = single_response("X");
        resp.category = None;
        resp.id = None;
        let fetched = FetchedJoke::from_wire(resp).unwrap();
        assert_eq!(fetched.record.category, "");
        assert_eq!(fetched.record.id, "");
    }
}
