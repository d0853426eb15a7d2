//! Output language for user-facing text

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported output languages
///
/// # Examples
///
/// ```
/// use invest_core::Language;
///
/// assert_eq!(Language::from_code("ko"), Language::Korean);
/// assert_eq!(Language::from_code("EN"), Language::English);
/// assert_eq!(Language::Korean.code(), "ko");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    English,
    /// Korean
    Korean,
}

impl Language {
    /// ISO 639-1 language code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Korean => "ko",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Korean => "Korean",
        }
    }

    /// Parse from ISO 639-1 code or common name; unknown input is English
    pub fn from_code(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ko" | "kr" | "korean" | "한국어" | "ko-kr" => Language::Korean,
            _ => Language::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Language::from_code(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("ko"), Language::Korean);
        assert_eq!(Language::from_code("Korean"), Language::Korean);
        assert_eq!(Language::from_code("한국어"), Language::Korean);
        assert_eq!(Language::from_code("en"), Language::English);
        assert_eq!(Language::from_code("ja"), Language::English);
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Language::Korean).unwrap();
        assert_eq!(json, "\"korean\"");
        let parsed: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Language::Korean);
    }
}
