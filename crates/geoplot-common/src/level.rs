//! Administrative granularity levels.

use crate::error::PlotError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Administrative tier at which boundaries and data keys are matched.
///
/// The set is closed: callers cannot add levels at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Top-level divisions (counties and cities).
    #[default]
    County,
    /// Sub-divisions of a county (townships and districts).
    Town,
}

impl Level {
    pub const ALL: [Level; 2] = [Level::County, Level::Town];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::County => "county",
            Level::Town => "town",
        }
    }

    /// The enclosing level, if any.
    pub fn parent(&self) -> Option<Level> {
        match self {
            Level::County => None,
            Level::Town => Some(Level::County),
        }
    }

    /// Row fields that make up a data key at this level, outermost first.
    pub fn key_fields(&self) -> &'static [&'static str] {
        match self {
            Level::County => &["county"],
            Level::Town => &["county", "town"],
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "county" => Ok(Level::County),
            "town" => Ok(Level::Town),
            _ => Err(PlotError::UnknownLevel(s.to_string())),
        }
    }
}
