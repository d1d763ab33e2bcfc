//! User preferences: assistant language and colour theme.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error for an unrecognised preference value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownPreference {
    kind: &'static str,
    value: String,
}

/// Language the assistant answers in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Krio,
    NigerianPidgin,
    French,
}

impl Language {
    pub const ALL: [Self; 4] = [Self::English, Self::Krio, Self::NigerianPidgin, Self::French];

    /// Human-readable name, also used in the system instruction.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Krio => "Krio",
            Self::NigerianPidgin => "Nigerian Pidgin",
            Self::French => "French",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = UnknownPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.display_name().eq_ignore_ascii_case(wanted) || format!("{l:?}") == wanted)
            .ok_or_else(|| UnknownPreference {
                kind: "language",
                value: s.to_string(),
            })
    }
}

/// Colour theme. Persisted in the `vayama-theme` cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Cookie and CSS class value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = UnknownPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(UnknownPreference {
                kind: "theme",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parses_display_and_variant_names() {
        assert_eq!("Nigerian Pidgin".parse(), Ok(Language::NigerianPidgin));
        assert_eq!("NigerianPidgin".parse(), Ok(Language::NigerianPidgin));
        assert_eq!("krio".parse(), Ok(Language::Krio));
        assert!("Klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_theme_defaults_dark_and_toggles() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!("light".parse(), Ok(Theme::Light));
        assert!("blue".parse::<Theme>().is_err());
    }
}
