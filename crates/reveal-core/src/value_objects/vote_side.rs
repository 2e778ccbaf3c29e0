//! Vote side - the two choices guests can vote for

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The side a guest votes for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteSide {
    Prince,
    Princess,
}

impl VoteSide {
    /// Counter field name in the vote ledger hash
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prince => "prince",
            Self::Princess => "princess",
        }
    }

    /// The opposite side
    #[must_use]
    pub fn other(&self) -> Self {
        match self {
            Self::Prince => Self::Princess,
            Self::Princess => Self::Prince,
        }
    }
}

impl fmt::Display for VoteSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when parsing a VoteSide from a stored string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VoteSideParseError {
    #[error("unknown vote side")]
    Unknown,
}

impl FromStr for VoteSide {
    type Err = VoteSideParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prince" => Ok(Self::Prince),
            "princess" => Ok(Self::Princess),
            _ => Err(VoteSideParseError::Unknown),
        }
    }
}
