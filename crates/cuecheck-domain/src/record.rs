//! Evidence records - the auditable output of scoring one row

use crate::{CandidateSummary, EntryId, EvidenceFlag, EvidenceFlags, Tier};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reading a serialized record back
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Tier name not recognized
    #[error("Invalid tier: {0}")]
    InvalidTier(String),

    /// Flag list not recognized
    #[error("Invalid evidence flags: {0}")]
    InvalidFlags(String),

    /// `matched` disagrees with the tier
    #[error("Record {ordinal}: matched={matched} contradicts tier {tier}")]
    Inconsistent {
        /// Row ordinal
        ordinal: usize,
        /// Serialized matched value
        matched: u8,
        /// Serialized tier
        tier: String,
    },
}

/// Scoring outcome for one usage row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceRecord {
    /// Position of the row in the input stream
    pub ordinal: usize,

    /// Provenance passthrough
    pub source_ref: String,

    /// Normalized row title
    pub title_norm: String,

    /// Assigned tier
    pub match_tier: Tier,

    /// Evidence behind the tier
    pub evidence_flags: EvidenceFlags,

    /// Entries returned by whichever lookup path fired
    pub ref_match_count: usize,

    /// Candidate selected for audit display
    pub best_candidate: Option<CandidateSummary>,
}

impl EvidenceRecord {
    /// Whether the tier counts as a match
    pub fn matched(&self) -> bool {
        self.match_tier.is_match()
    }

    /// Flag membership shortcut
    pub fn has_flag(&self, flag: EvidenceFlag) -> bool {
        self.evidence_flags.contains(flag)
    }

    /// Flat serialized form
    pub fn to_flat(&self) -> FlatRecord {
        FlatRecord::from(self)
    }
}

/// Flat, column-oriented form of an [`EvidenceRecord`]
///
/// This is the output contract consumed by report tooling: `matched` is
/// `1`/`0`, flags are joined by `;`, and absent candidate fields are empty
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    /// Position of the row in the input stream
    pub ordinal: usize,
    /// Provenance passthrough
    pub source_ref: String,
    /// Normalized row title
    pub title_norm: String,
    /// Tier name
    pub match_tier: String,
    /// 1 if matched, else 0
    pub matched: u8,
    /// Joined flag names
    pub evidence_flags: String,
    /// Candidate count
    pub ref_match_count: usize,
    /// Best candidate id (absent when no candidate)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<EntryId>,
    /// Best candidate title
    pub ref_title: String,
    /// Best candidate ISRC
    pub ref_isrc: String,
    /// Best candidate ISWC
    pub ref_iswc: String,
}

impl From<&EvidenceRecord> for FlatRecord {
    fn from(record: &EvidenceRecord) -> Self {
        let candidate = record.best_candidate.as_ref();
        Self {
            ordinal: record.ordinal,
            source_ref: record.source_ref.clone(),
            title_norm: record.title_norm.clone(),
            match_tier: record.match_tier.as_str().to_string(),
            matched: u8::from(record.matched()),
            evidence_flags: record.evidence_flags.joined(),
            ref_match_count: record.ref_match_count,
            ref_id: candidate.map(|c| c.id),
            ref_title: candidate.map(|c| c.title.clone()).unwrap_or_default(),
            ref_isrc: candidate.and_then(|c| c.isrc.clone()).unwrap_or_default(),
            ref_iswc: candidate.and_then(|c| c.iswc.clone()).unwrap_or_default(),
        }
    }
}

impl TryFrom<FlatRecord> for EvidenceRecord {
    type Error = RecordError;

    fn try_from(flat: FlatRecord) -> Result<Self, Self::Error> {
        let match_tier = Tier::parse(&flat.match_tier)
            .ok_or_else(|| RecordError::InvalidTier(flat.match_tier.clone()))?;
        if flat.matched != u8::from(match_tier.is_match()) {
            return Err(RecordError::Inconsistent {
                ordinal: flat.ordinal,
                matched: flat.matched,
                tier: flat.match_tier,
            });
        }
        let evidence_flags =
            EvidenceFlags::parse_joined(&flat.evidence_flags).map_err(RecordError::InvalidFlags)?;

        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
        let best_candidate = flat.ref_id.map(|id| CandidateSummary {
            id,
            title: flat.ref_title,
            isrc: non_empty(flat.ref_isrc),
            iswc: non_empty(flat.ref_iswc),
        });

        Ok(Self {
            ordinal: flat.ordinal,
            source_ref: flat.source_ref,
            title_norm: flat.title_norm,
            match_tier,
            evidence_flags,
            ref_match_count: flat.ref_match_count,
            best_candidate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EvidenceRecord {
        EvidenceRecord {
            ordinal: 4,
            source_ref: "globo.xlsx#Sheet1#18".to_string(),
            title_norm: "ELEANOR RIGBY".to_string(),
            match_tier: Tier::Silver,
            evidence_flags: EvidenceFlags::new()
                .with(EvidenceFlag::TitleExact)
                .with(EvidenceFlag::ArtistTokenOverlap),
            ref_match_count: 1,
            best_candidate: Some(CandidateSummary {
                id: EntryId::from_value(11),
                title: "Eleanor Rigby".to_string(),
                isrc: None,
                iswc: Some("T0345246801".to_string()),
            }),
        }
    }

    #[test]
    fn test_flat_contract() {
        let flat = sample().to_flat();
        assert_eq!(flat.match_tier, "Silver");
        assert_eq!(flat.matched, 1);
        assert_eq!(flat.evidence_flags, "TITLE_EXACT;ARTIST_TOKEN_OVERLAP");
        assert_eq!(flat.ref_isrc, "");
        assert_eq!(flat.ref_iswc, "T0345246801");
    }

    #[test]
    fn test_flat_without_candidate() {
        let mut record = sample();
        record.match_tier = Tier::NoMatch;
        record.best_candidate = None;

        let json = serde_json::to_value(record.to_flat()).unwrap();
        assert_eq!(json["matched"], 0);
        assert_eq!(json["ref_title"], "");
        assert!(json.get("ref_id").is_none());
    }

    #[test]
    fn test_read_back() {
        let record = sample();
        let back = EvidenceRecord::try_from(record.to_flat()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_read_back_rejects_inconsistent_matched() {
        let mut flat = sample().to_flat();
        flat.matched = 0;
        assert!(matches!(
            EvidenceRecord::try_from(flat),
            Err(RecordError::Inconsistent { ordinal: 4, .. })
        ));
    }
}
