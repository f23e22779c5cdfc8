pub mod settings;

pub use settings::{JokeType, Settings, SettingsStore, ANY_CATEGORY};
