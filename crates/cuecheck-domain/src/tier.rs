//! Tier module - confidence classification of a row-to-catalog match

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence tier assigned to a scored usage row
///
/// Tiers are ordered by strength of evidence:
/// - NoMatch: insufficient or contradicting evidence
/// - Bronze: exact title, no artist/author to corroborate
/// - Silver: exact title corroborated by artist/author tokens
/// - Gold: identifier match, or exact title plus a gold token
///
/// The derived ordering follows that list, so `Tier::Gold > Tier::Silver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// No defensible match
    NoMatch,

    /// Title-only match on a sufficiently long title
    Bronze,

    /// Title plus artist/author corroboration
    Silver,

    /// Identifier match or title plus high-stakes token
    Gold,
}

impl Tier {
    /// All tiers, strongest first
    pub const ALL: [Tier; 4] = [Tier::Gold, Tier::Silver, Tier::Bronze, Tier::NoMatch];

    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Gold => "Gold",
            Tier::Silver => "Silver",
            Tier::Bronze => "Bronze",
            Tier::NoMatch => "NoMatch",
        }
    }

    /// Parse a tier from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gold" => Some(Tier::Gold),
            "silver" => Some(Tier::Silver),
            "bronze" => Some(Tier::Bronze),
            "nomatch" | "no_match" | "none" => Some(Tier::NoMatch),
            _ => None,
        }
    }

    /// Whether this tier counts as a match for billing review
    pub fn is_match(&self) -> bool {
        *self != Tier::NoMatch
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid tier: {}", s))
    }
}
