//! Locales
//!
//! The site is served in Arabic and English. Every bilingual record carries
//! an `_ar` and an `_en` variant of its text fields; [`pick`] chooses one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A supported site language
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Arabic, rendered right-to-left
    #[default]
    Ar,
    /// English
    En,
}

impl Locale {
    /// Get all locales for iteration
    pub fn all() -> &'static [Locale] {
        &[Locale::Ar, Locale::En]
    }

    /// Two-letter language code used in URLs and the `lang` attribute
    pub fn code(self) -> &'static str {
        match self {
            Locale::Ar => "ar",
            Locale::En => "en",
        }
    }

    /// Text direction for the `dir` attribute
    pub fn dir(self) -> &'static str {
        match self {
            Locale::Ar => "rtl",
            Locale::En => "ltr",
        }
    }

    /// The other language, used for the language switcher and text fallback
    pub fn other(self) -> Locale {
        match self {
            Locale::Ar => Locale::En,
            Locale::En => Locale::Ar,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a path segment is not a supported locale
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ar" => Ok(Locale::Ar),
            "en" => Ok(Locale::En),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

/// Pick the text for `locale`, falling back to the other language when blank
pub fn pick<'a>(locale: Locale, ar: &'a str, en: &'a str) -> &'a str {
    let (wanted, fallback) = match locale {
        Locale::Ar => (ar, en),
        Locale::En => (en, ar),
    };
    if wanted.trim().is_empty() {
        fallback
    } else {
        wanted
    }
}

/// Optional-text variant of [`pick`]
pub fn pick_opt(locale: Locale, ar: &Option<String>, en: &Option<String>) -> Option<String> {
    let text = pick(
        locale,
        ar.as_deref().unwrap_or_default(),
        en.as_deref().unwrap_or_default(),
    );
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// List variant of [`pick`]; an empty list falls back to the other language
pub fn pick_list(locale: Locale, ar: &[String], en: &[String]) -> Vec<String> {
    let (wanted, fallback) = match locale {
        Locale::Ar => (ar, en),
        Locale::En => (en, ar),
    };
    let chosen = if wanted.iter().all(|s| s.trim().is_empty()) {
        fallback
    } else {
        wanted
    };
    chosen
        .iter()
        .filter(|s| !s.trim().is_empty())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("ar".parse::<Locale>().unwrap(), Locale::Ar);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_direction() {
        assert_eq!(Locale::Ar.dir(), "rtl");
        assert_eq!(Locale::En.dir(), "ltr");
        assert_eq!(Locale::Ar.other(), Locale::En);
    }

    #[test]
    fn test_pick_falls_back_when_blank() {
        assert_eq!(pick(Locale::Ar, "تمر", "Dates"), "تمر");
        assert_eq!(pick(Locale::En, "تمر", "Dates"), "Dates");
        assert_eq!(pick(Locale::En, "تمر", "  "), "تمر");
    }

    #[test]
    fn test_pick_list_skips_blank_entries() {
        let ar = vec!["ملح".to_string()];
        let en = vec!["".to_string(), " ".to_string()];
        assert_eq!(pick_list(Locale::En, &ar, &en), vec!["ملح".to_string()]);
    }
}
