//! Evidence extraction
//!
//! Each flag is an independent boolean over the row and its candidate set.
//! Flags are never weighted; the classifier reads them as a set.

use crate::resolver::{Resolution, RowView};
use crate::ScoringRules;
use cuecheck_domain::{EvidenceFlag, EvidenceFlags};

/// Computes evidence flags for a resolved row
pub struct EvidenceExtractor<'a> {
    rules: &'a ScoringRules,
}

impl<'a> EvidenceExtractor<'a> {
    /// Create an extractor over a compiled rule set
    pub fn new(rules: &'a ScoringRules) -> Self {
        Self { rules }
    }

    /// Compute the flag set
    pub fn extract(&self, view: &RowView<'_>, resolution: &Resolution<'_>) -> EvidenceFlags {
        let candidates = &resolution.candidates;
        let mut flags = EvidenceFlags::new();

        flags.set_if(
            EvidenceFlag::IsrcMatch,
            view.isrc
                .as_deref()
                .is_some_and(|isrc| candidates.iter().any(|c| c.isrc.as_deref() == Some(isrc))),
        );
        flags.set_if(
            EvidenceFlag::IswcMatch,
            view.iswc
                .as_deref()
                .is_some_and(|iswc| candidates.iter().any(|c| c.iswc.as_deref() == Some(iswc))),
        );
        flags.set_if(
            EvidenceFlag::TitleExact,
            !view.title_norm.is_empty() && candidates.iter().any(|c| c.title_norm == view.title_norm),
        );

        let gold_hit = self
            .rules
            .gold_tokens()
            .iter()
            .chain(candidates.iter().flat_map(|c| c.gold_tokens.iter()))
            .any(|token| view.combined_norm.contains(token.as_str()));
        flags.set_if(EvidenceFlag::GoldTokenHit, gold_hit);

        if self.owned_exception_applies(view) {
            flags.insert(EvidenceFlag::OwnedException);
            flags.insert(EvidenceFlag::GoldTokenHit);
        }

        flags.set_if(
            EvidenceFlag::NegativeTitleTrigger,
            self.rules.is_negative_title(&view.title_norm),
        );
        flags.set_if(
            EvidenceFlag::DenyTokenHit,
            self.rules
                .deny_tokens()
                .iter()
                .any(|words| contains_all(view, words)),
        );

        // Artist support is judged against the audited candidate only, so the
        // flag and the record's best candidate describe the same entry.
        if view.artist_present {
            let overlap = resolution.best_candidate().is_some_and(|best| {
                view.artist_tokens
                    .iter()
                    .any(|token| best.evidence_tokens.contains(token))
            });
            if overlap {
                flags.insert(EvidenceFlag::ArtistTokenOverlap);
            } else {
                flags.insert(EvidenceFlag::ArtistPresentNoSupport);
            }
        }

        flags
    }

    fn owned_exception_applies(&self, view: &RowView<'_>) -> bool {
        self.rules.owned_exceptions().iter().any(|exception| {
            exception.title_norm == view.title_norm && contains_all(view, &exception.token_words)
        })
    }
}

fn contains_all(view: &RowView<'_>, words: &[String]) -> bool {
    !words.is_empty() && words.iter().all(|w| view.combined_words.contains(w))
}
