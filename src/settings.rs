//! User preferences
//!
//! Session-only: every page load starts from the defaults and nothing is
//! written to storage.

use crate::sim::{Controller, Level};

/// Label language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    English,
    #[default]
    Tamil,
}

impl Language {
    /// BCP 47 tag, also used for the `lang` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Tamil => "ta",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "ta" | "tamil" => Some(Language::Tamil),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Language::English => Language::Tamil,
            Language::Tamil => Language::English,
        }
    }
}

/// Preferences for the current session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub language: Language,
    /// Level the session starts on
    pub level: Level,
}

impl Settings {
    /// Controller for a fresh session on the configured level
    pub fn start_session(&self) -> Controller {
        log::info!(
            "Starting {} ({})",
            self.level.as_str(),
            self.language.as_str()
        );
        Controller::new(self.level)
    }
}
