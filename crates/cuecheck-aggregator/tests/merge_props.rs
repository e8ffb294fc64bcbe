//! Partial aggregates merge to the same report in any order

use cuecheck_aggregator::{Aggregate, AggregatorConfig};
use cuecheck_domain::{CandidateSummary, EntryId, EvidenceFlag, EvidenceFlags, EvidenceRecord, Tier};
use proptest::prelude::*;

fn arb_record() -> impl Strategy<Value = (Tier, usize, Vec<EvidenceFlag>, usize, u8, usize)> {
    (
        prop::sample::select(Tier::ALL.to_vec()),
        0usize..4,
        prop::collection::vec(prop::sample::select(EvidenceFlag::ALL.to_vec()), 0..4),
        1usize..4,
        0u8..3,
        0usize..5,
    )
}

fn build(ordinal: usize, shape: &(Tier, usize, Vec<EvidenceFlag>, usize, u8, usize)) -> EvidenceRecord {
    build_in("report", ordinal, shape)
}

fn build_in(run: &str, ordinal: usize, shape: &(Tier, usize, Vec<EvidenceFlag>, usize, u8, usize)) -> EvidenceRecord {
    let (tier, title, flags, count, ids, source) = shape;
    let entry = (*title as u64) * 10 + u64::from(*ids);
    EvidenceRecord {
        ordinal,
        source_ref: format!("{run}.xlsx#{source}"),
        title_norm: format!("TITLE {title}"),
        match_tier: *tier,
        evidence_flags: flags.iter().copied().collect::<EvidenceFlags>(),
        ref_match_count: *count,
        best_candidate: Some(CandidateSummary {
            id: EntryId::from_value(entry),
            title: format!("Title {title}"),
            isrc: (*ids == 1).then(|| format!("BRXXX00000{:02}", title)),
            iswc: (*ids == 2).then(|| format!("T00000000{:02}", title)),
        }),
    }
}

proptest! {
    #[test]
    fn merge_is_order_independent(
        shapes in prop::collection::vec(arb_record(), 0..60),
        cut_a in 0usize..60,
        cut_b in 0usize..60,
        limit in 0usize..10,
    ) {
        let records: Vec<EvidenceRecord> = shapes.iter().enumerate().map(|(i, s)| build(i, s)).collect();
        let len = records.len();
        let (lo, hi) = (cut_a.min(cut_b).min(len), cut_a.max(cut_b).min(len));

        let first = Aggregate::from_records(&records[..lo]);
        let second = Aggregate::from_records(&records[lo..hi]);
        let third = Aggregate::from_records(&records[hi..]);

        let config = AggregatorConfig { silver_limit: limit, ..AggregatorConfig::default() };
        let single = Aggregate::from_records(&records).finish(&config);
        let left = first.clone().merge(second.clone()).merge(third.clone()).finish(&config);
        let right = third.merge(first.merge(second)).finish(&config);

        prop_assert_eq!(&left, &single);
        prop_assert_eq!(&right, &single);
    }

    #[test]
    fn action_sheet_bounded(shapes in prop::collection::vec(arb_record(), 0..60), limit in 0usize..10) {
        let records: Vec<EvidenceRecord> = shapes.iter().enumerate().map(|(i, s)| build(i, s)).collect();
        let config = AggregatorConfig { silver_limit: limit, ..AggregatorConfig::default() };
        let report = Aggregate::from_records(&records).finish(&config);

        prop_assert_eq!(report.action_sheet.gold, report.tier_count(Tier::Gold));
        prop_assert!(report.action_sheet.silver <= limit);
        prop_assert!(report.truth_gaps.rate >= 0.0 && report.truth_gaps.rate <= 1.0);
    }

    #[test]
    fn runs_sharing_ordinals_keep_every_record(
        first_run in prop::collection::vec(arb_record(), 0..30),
        second_run in prop::collection::vec(arb_record(), 0..30),
    ) {
        let records: Vec<EvidenceRecord> = first_run
            .iter()
            .enumerate()
            .map(|(i, s)| build_in("run-a", i, s))
            .chain(second_run.iter().enumerate().map(|(i, s)| build_in("run-b", i, s)))
            .collect();
        let report = Aggregate::from_records(&records).finish(&AggregatorConfig::lenient());

        prop_assert_eq!(report.records, first_run.len() + second_run.len());
        prop_assert_eq!(report.action_sheet.gold, report.tier_count(Tier::Gold));
        prop_assert_eq!(
            report.action_sheet.silver + report.action_sheet.silver_truncated + report.action_sheet.silver_shadowed,
            report.tier_count(Tier::Silver)
        );
    }
}
