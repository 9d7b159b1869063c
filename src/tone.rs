use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Caption style picked by the user.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Funny,
    Classic,
    Savage,
    Poetic,
    Quote,
    Shayari,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Funny,
        Tone::Classic,
        Tone::Savage,
        Tone::Poetic,
        Tone::Quote,
        Tone::Shayari,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Funny => "funny",
            Tone::Classic => "classic",
            Tone::Savage => "savage",
            Tone::Poetic => "poetic",
            Tone::Quote => "quote",
            Tone::Shayari => "shayari",
        }
    }

    /// Tones whose answers usually come back as several `**`-delimited options.
    pub fn is_list_style(&self) -> bool {
        matches!(self, Tone::Funny | Tone::Savage)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown tone: {0}")]
pub struct UnknownTone(String);

impl FromStr for Tone {
    type Err = UnknownTone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTone(s.to_string()))
    }
}
