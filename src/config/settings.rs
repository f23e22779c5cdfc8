use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Category sentinel meaning "no category filter".
pub const ANY_CATEGORY: &str = "Any";

/// Joke type filter sent to the API.
///
/// Serialized with the exact strings the API expects so the settings file
/// and the `type` query parameter stay in agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JokeType {
    #[default]
    Any,
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "twopart")]
    TwoPart,
}

impl JokeType {
    pub fn all() -> Vec<Self> {
        vec![Self::Any, Self::Single, Self::TwoPart]
    }

    /// Value for the `type` query parameter, or `None` when unfiltered.
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::Single => Some("single"),
            Self::TwoPart => Some("twopart"),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Any => "Any Type",
            Self::Single => "Single (One-liner)",
            Self::TwoPart => "Two Part (Setup + Punchline)",
        }
    }
}

/// User-facing configuration, persisted as one pretty-printed JSON object.
///
/// Absent keys in the file fall back to the field defaults, so partially
/// written or older files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minutes between fetches. At least 1.
    pub frequency_minutes: u32,
    /// Selected categories, or the `"Any"` sentinel. Never empty.
    pub categories: Vec<String>,
    /// Ask the API to additionally filter potentially offensive jokes.
    pub safe_mode: bool,
    pub joke_type: JokeType,
    /// ISO language code for the joke text.
    pub language: String,
    /// Start the poller as soon as the app launches.
    pub autostart: bool,
    pub notification_duration_seconds: u32,
    /// Cap on the recent-jokes list.
    pub max_history: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frequency_minutes: 30,
            categories: vec![ANY_CATEGORY.to_string()],
            safe_mode: true,
            joke_type: JokeType::Any,
            language: "en".to_string(),
            autostart: false,
            notification_duration_seconds: 10,
            max_history: 15,
        }
    }
}

impl Settings {
    /// True when no category filter should be applied.
    pub fn wants_any_category(&self) -> bool {
        self.categories.iter().any(|c| c == ANY_CATEGORY)
    }

    /// Re-establish the invariants after deserializing arbitrary input.
    pub fn normalize(&mut self) {
        if self.categories.is_empty() {
            self.categories = vec![ANY_CATEGORY.to_string()];
        }
        if self.frequency_minutes < 1 {
            self.frequency_minutes = 1;
        }
        if self.max_history < 1 {
            self.max_history = 1;
        }
    }
}

/// Loads and saves [`Settings`] at a fixed path.
///
/// A missing file is not an error, just defaults. An unreadable or invalid
/// file is: the caller recovers with defaults and reports the problem as a
/// status line, so a load failure never propagates further.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store next to the executable, like the rest of the app's files.
    pub fn at_default_location() -> Self {
        let path = std::env::current_exe()
            .unwrap_or_else(|_| PathBuf::from("."))
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("joke_notifier_settings.json");
        Self::new(path)
    }

    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            tracing::info!("No settings file at {:?}, using defaults", self.path);
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let mut settings: Settings = serde_json::from_str(&content)?;
        settings.normalize();
        tracing::info!("Loaded settings from {:?}", self.path);
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;
        tracing::info!("Saved settings to {:?}", self.path);
        Ok(())
    }
}
