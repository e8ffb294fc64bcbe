//! Tier classification
//!
//! A pure, total function over the flag set. Rules are checked in order and
//! the first that fires decides:
//!
//! 1. **Hard deny**: a negative title or deny token, with no identifier or
//!    gold evidence, is NoMatch regardless of anything else
//! 2. **Gold**: an identifier match, or an exact title backed by a gold token
//! 3. **Silver**: an exact title backed by artist/author overlap
//! 4. **Bronze**: an exact title alone, only when no artist/author was
//!    reported and the title is long enough to be distinctive
//! 5. otherwise NoMatch

use crate::resolver::RowView;
use cuecheck_domain::{EvidenceFlag, EvidenceFlags, Tier};

/// The rule that decided a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Negative title or deny token without override evidence
    HardDeny,
    /// ISRC or ISWC matched
    Identifier,
    /// Exact title with a gold token
    TitleWithGoldToken,
    /// Exact title with artist/author overlap
    TitleWithArtist,
    /// Exact distinctive title, no artist/author reported
    TitleOnly,
    /// No rule fired
    Insufficient,
}

impl Decision {
    /// Tier this decision assigns
    pub fn tier(&self) -> Tier {
        match self {
            Decision::Identifier | Decision::TitleWithGoldToken => Tier::Gold,
            Decision::TitleWithArtist => Tier::Silver,
            Decision::TitleOnly => Tier::Bronze,
            Decision::HardDeny | Decision::Insufficient => Tier::NoMatch,
        }
    }
}

/// Row facts the classifier reads besides the flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFacts {
    /// Normalized title length in characters
    pub title_len: usize,
    /// Whether an artist/author was reported
    pub artist_present: bool,
}

impl From<&RowView<'_>> for RowFacts {
    fn from(view: &RowView<'_>) -> Self {
        Self {
            title_len: view.title_len(),
            artist_present: view.artist_present,
        }
    }
}

/// Maps evidence flags to a tier
#[derive(Debug, Clone, Copy)]
pub struct TierClassifier {
    min_title_len_for_bronze: usize,
}

impl TierClassifier {
    /// Create a classifier with the Bronze length threshold
    pub fn new(min_title_len_for_bronze: usize) -> Self {
        Self {
            min_title_len_for_bronze,
        }
    }

    /// Assign a tier
    pub fn classify(&self, flags: EvidenceFlags, facts: RowFacts) -> Tier {
        self.decide(flags, facts).tier()
    }

    /// Assign a tier, reporting which rule decided it
    pub fn decide(&self, flags: EvidenceFlags, facts: RowFacts) -> Decision {
        let has = |flag| flags.contains(flag);

        let identifier = has(EvidenceFlag::IsrcMatch) || has(EvidenceFlag::IswcMatch);
        let gold_token = has(EvidenceFlag::GoldTokenHit);
        let title_exact = has(EvidenceFlag::TitleExact);

        let denied = has(EvidenceFlag::NegativeTitleTrigger) || has(EvidenceFlag::DenyTokenHit);
        if denied && !identifier && !gold_token {
            return Decision::HardDeny;
        }

        if identifier {
            return Decision::Identifier;
        }
        if title_exact && gold_token {
            return Decision::TitleWithGoldToken;
        }
        if title_exact && has(EvidenceFlag::ArtistTokenOverlap) {
            return Decision::TitleWithArtist;
        }
        if title_exact
            && !facts.artist_present
            && facts.title_len >= self.min_title_len_for_bronze
            && !has(EvidenceFlag::NegativeTitleTrigger)
        {
            return Decision::TitleOnly;
        }
        Decision::Insufficient
    }
}
