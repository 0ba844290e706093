use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generation style a user picks for translation output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePreference {
    #[default]
    Default,
    Cute,
    Funny,
    Formal,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown style `{0}` (expected default|cute|funny|formal)")]
pub struct UnknownStyle(pub String);

impl StylePreference {
    /// Display order used by every style picker.
    pub const ALL: [Self; 4] = [Self::Default, Self::Cute, Self::Funny, Self::Formal];

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Cute => "cute",
            Self::Funny => "funny",
            Self::Formal => "formal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "✨ Default",
            Self::Cute => "🐰 Cute",
            Self::Funny => "😂 Funny",
            Self::Formal => "💼 Formal",
        }
    }

    /// Unknown tags collapse to [`StylePreference::Default`] instead of failing.
    pub fn from_tag_lossy(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }
}

impl FromStr for StylePreference {
    type Err = UnknownStyle;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "cute" => Ok(Self::Cute),
            "funny" => Ok(Self::Funny),
            "formal" => Ok(Self::Formal),
            _ => Err(UnknownStyle(value.to_owned())),
        }
    }
}

impl fmt::Display for StylePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}
