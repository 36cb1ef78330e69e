//! Instruction locales.

use serde::{Deserialize, Serialize};

/// Locale an instruction text is written in.
///
/// Wire format: the upper-case code stored in the `languages` table
/// (`"EN"`, `"ZH-HANS"`, ...). Seeded once by migration; the set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "EN")]
    En,
    #[serde(rename = "DE")]
    De,
    #[serde(rename = "ES")]
    Es,
    #[serde(rename = "FR")]
    Fr,
    #[serde(rename = "IT")]
    It,
    #[serde(rename = "ZH-HANS")]
    ZhHans,
    #[serde(rename = "ZH-HANT")]
    ZhHant,
}

impl LanguageCode {
    /// Every supported locale, in seed order.
    pub const ALL: [LanguageCode; 7] = [
        Self::En,
        Self::De,
        Self::Es,
        Self::Fr,
        Self::It,
        Self::ZhHans,
        Self::ZhHant,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "EN",
            Self::De => "DE",
            Self::Es => "ES",
            Self::Fr => "FR",
            Self::It => "IT",
            Self::ZhHans => "ZH-HANS",
            Self::ZhHant => "ZH-HANT",
        }
    }

    /// Parse a stored code. Case-insensitive; returns `None` for unknown codes.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(code))
    }

    /// English display name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::De => "German",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::It => "Italian",
            Self::ZhHans => "Mandarin Chinese, Simplified",
            Self::ZhHant => "Mandarin Chinese, Traditional",
        }
    }

    /// Key of this locale's instruction text in an upstream catalog record.
    ///
    /// English is the unsuffixed `strInstructions`.
    pub fn upstream_instruction_key(self) -> String {
        match self {
            Self::En => "strInstructions".to_owned(),
            other => format!("strInstructions{}", other.as_str()),
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
