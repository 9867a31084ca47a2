//! Target languages and their wire codes

use std::fmt;

/// Translation target languages supported at the backend boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Japanese,
    Chinese,
    Vietnamese,
}

impl Language {
    pub const ALL: [Self; 4] = [
        Self::English,
        Self::Japanese,
        Self::Chinese,
        Self::Vietnamese,
    ];

    /// Wire code used in translate/TTS exchanges
    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Japanese => "ja",
            Self::Chinese => "zh-cn",
            Self::Vietnamese => "vi",
        }
    }

    /// Display name shown to the user
    pub fn name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Japanese => "Japanese",
            Self::Chinese => "Chinese",
            Self::Vietnamese => "Vietnamese",
        }
    }

    /// Look up a language by its wire code; unknown codes yield `None`
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Parse user input: accepts either the wire code or the display name,
    /// case-insensitively
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL.into_iter().find(|lang| {
            lang.code().eq_ignore_ascii_case(input) || lang.name().eq_ignore_ascii_case(input)
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
