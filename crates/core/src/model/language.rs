use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown language: {raw}")]
pub struct ParseLanguageError {
    raw: String,
}

//
// ─── LANGUAGE ──────────────────────────────────────────────────────────────────
//

/// Course languages offered to English speakers.
///
/// Closed set; the backend keys its course data by `course_key`, so adding a
/// language is a compile-time-checked change here plus content on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Spanish,
    French,
    German,
    Japanese,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Japanese,
    ];

    /// English display name, also the wire value for `?lang=`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Japanese => "Japanese",
        }
    }

    /// Flag emoji shown next to the language name.
    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            Language::Spanish => "\u{1F1EA}\u{1F1F8}",
            Language::French => "\u{1F1EB}\u{1F1F7}",
            Language::German => "\u{1F1E9}\u{1F1EA}",
            Language::Japanese => "\u{1F1EF}\u{1F1F5}",
        }
    }

    /// Key the backend uses for this course's content ("Spanish-English" form).
    #[must_use]
    pub fn course_key(self) -> String {
        format!("{}-English", self.name())
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Spanish
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLanguageError { raw: s.to_string() })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
