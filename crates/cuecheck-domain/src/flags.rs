//! Evidence flags - named boolean signals behind every tier decision

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Separator used when flags are serialized as a single field
pub const FLAG_SEPARATOR: &str = ";";

/// A single piece of evidence computed for a row
///
/// Declaration order is the canonical order used when flags are listed or
/// serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EvidenceFlag {
    /// Row ISRC equals a candidate ISRC
    IsrcMatch,
    /// Row ISWC equals a candidate ISWC
    IswcMatch,
    /// Normalized row title equals a candidate's normalized title
    TitleExact,
    /// A gold token occurs in the row's combined text
    GoldTokenHit,
    /// A configured (title, token) exception fired for this row
    OwnedException,
    /// Normalized title hits a negative title trigger
    NegativeTitleTrigger,
    /// A deny token occurs in the row's combined text
    DenyTokenHit,
    /// Artist/author tokens overlap a candidate's evidence tokens
    ArtistTokenOverlap,
    /// Artist/author present but no overlap found
    ArtistPresentNoSupport,
    /// Scoring failed unexpectedly; row forced to NoMatch
    UnscorableRow,
}

impl EvidenceFlag {
    /// All flags in canonical order
    pub const ALL: [EvidenceFlag; 10] = [
        EvidenceFlag::IsrcMatch,
        EvidenceFlag::IswcMatch,
        EvidenceFlag::TitleExact,
        EvidenceFlag::GoldTokenHit,
        EvidenceFlag::OwnedException,
        EvidenceFlag::NegativeTitleTrigger,
        EvidenceFlag::DenyTokenHit,
        EvidenceFlag::ArtistTokenOverlap,
        EvidenceFlag::ArtistPresentNoSupport,
        EvidenceFlag::UnscorableRow,
    ];

    /// Wire name of the flag
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceFlag::IsrcMatch => "ISRC_MATCH",
            EvidenceFlag::IswcMatch => "ISWC_MATCH",
            EvidenceFlag::TitleExact => "TITLE_EXACT",
            EvidenceFlag::GoldTokenHit => "GOLD_TOKEN_HIT",
            EvidenceFlag::OwnedException => "OWNED_EXCEPTION",
            EvidenceFlag::NegativeTitleTrigger => "NEGATIVE_TITLE_TRIGGER",
            EvidenceFlag::DenyTokenHit => "DENY_TOKEN_HIT",
            EvidenceFlag::ArtistTokenOverlap => "ARTIST_TOKEN_OVERLAP",
            EvidenceFlag::ArtistPresentNoSupport => "ARTIST_PRESENT_NO_SUPPORT",
            EvidenceFlag::UnscorableRow => "UNSCORABLE_ROW",
        }
    }

    /// Parse a flag from its wire name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == s.trim())
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for EvidenceFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of evidence flags
///
/// Stored as a bitset, iterated in canonical order, so two sets with the same
/// members always serialize identically regardless of insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EvidenceFlags(u16);

impl EvidenceFlags {
    /// Empty set
    pub fn new() -> Self {
        Self(0)
    }

    /// Add a flag
    pub fn insert(&mut self, flag: EvidenceFlag) {
        self.0 |= flag.bit();
    }

    /// Remove a flag
    pub fn remove(&mut self, flag: EvidenceFlag) {
        self.0 &= !flag.bit();
    }

    /// Builder-style insert
    pub fn with(mut self, flag: EvidenceFlag) -> Self {
        self.insert(flag);
        self
    }

    /// Add `flag` when `condition` holds
    pub fn set_if(&mut self, flag: EvidenceFlag, condition: bool) {
        if condition {
            self.insert(flag);
        }
    }

    /// Membership test
    pub fn contains(&self, flag: EvidenceFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// Number of flags set
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// True when no flag is set
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Flags in canonical order
    pub fn iter(&self) -> impl Iterator<Item = EvidenceFlag> + '_ {
        EvidenceFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }

    /// Serialize as flag names joined by [`FLAG_SEPARATOR`]
    pub fn joined(&self) -> String {
        self.iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(FLAG_SEPARATOR)
    }

    /// Parse the joined form; unknown names are reported as an error
    pub fn parse_joined(s: &str) -> Result<Self, String> {
        let mut flags = Self::new();
        for part in s.split(FLAG_SEPARATOR).map(str::trim).filter(|p| !p.is_empty()) {
            let flag = EvidenceFlag::parse(part)
                .ok_or_else(|| format!("Unknown evidence flag: {}", part))?;
            flags.insert(flag);
        }
        Ok(flags)
    }
}

impl FromIterator<EvidenceFlag> for EvidenceFlags {
    fn from_iter<I: IntoIterator<Item = EvidenceFlag>>(iter: I) -> Self {
        let mut flags = Self::new();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

impl fmt::Display for EvidenceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl Serialize for EvidenceFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.joined())
    }
}

impl<'de> Deserialize<'de> for EvidenceFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_joined(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut flags = EvidenceFlags::new();
        assert!(flags.is_empty());

        flags.insert(EvidenceFlag::TitleExact);
        flags.insert(EvidenceFlag::TitleExact);
        assert!(flags.contains(EvidenceFlag::TitleExact));
        assert!(!flags.contains(EvidenceFlag::IsrcMatch));
        assert_eq!(flags.len(), 1);

        flags.remove(EvidenceFlag::TitleExact);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_joined_uses_canonical_order() {
        let a = EvidenceFlags::new()
            .with(EvidenceFlag::ArtistTokenOverlap)
            .with(EvidenceFlag::TitleExact);
        let b = EvidenceFlags::new()
            .with(EvidenceFlag::TitleExact)
            .with(EvidenceFlag::ArtistTokenOverlap);

        assert_eq!(a.joined(), "TITLE_EXACT;ARTIST_TOKEN_OVERLAP");
        assert_eq!(a.joined(), b.joined());
    }

    #[test]
    fn test_parse_joined() {
        let flags = EvidenceFlags::parse_joined("GOLD_TOKEN_HIT; TITLE_EXACT").unwrap();
        assert!(flags.contains(EvidenceFlag::GoldTokenHit));
        assert!(flags.contains(EvidenceFlag::TitleExact));

        assert!(EvidenceFlags::parse_joined("").unwrap().is_empty());
        assert!(EvidenceFlags::parse_joined("TITLE_FUZZY").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let flags = EvidenceFlags::new().with(EvidenceFlag::IsrcMatch);
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(json, "\"ISRC_MATCH\"");
    }
}
