//! End-to-end scoring scenarios over a small catalog

use cuecheck_domain::{EvidenceFlag, ReferenceEntry, Tier, UsageRow};
use cuecheck_index::ReferenceIndex;
use cuecheck_scorer::{Scorer, ScoringConfig, ScoringRules};

fn catalog() -> Vec<ReferenceEntry> {
    vec![
        ReferenceEntry::new(10, "Eleanor Rigby")
            .with_iswc("T-010.452.512-4")
            .with_evidence_tokens(["Lennon", "McCartney"]),
        ReferenceEntry::new(20, "Deja Vu").with_evidence_tokens(["Someone"]),
        ReferenceEntry::new(30, "Some Recording")
            .with_isrc("BR-XXX-00-00001")
            .with_evidence_tokens(["Orquestra"]),
        ReferenceEntry::new(40, "Common Title").with_evidence_tokens(["Maria Bethania"]),
        ReferenceEntry::new(51, "X").with_evidence_tokens(["Ana"]),
        ReferenceEntry::new(50, "X")
            .with_iswc("T0000000019")
            .with_evidence_tokens(["Bruno"]),
    ]
}

fn config() -> ScoringConfig {
    ScoringConfig::new(6)
        .with_gold_tokens(["Estelita"])
        .with_negative_trigger("Deja Vu")
        .with_deny_tokens(["Beatles"])
        .with_owned_exception("Eleanor Rigby", "Beatles")
        .with_stopwords(["the", "and"])
}

fn fixture() -> (ScoringRules, ReferenceIndex) {
    let rules = ScoringRules::compile(&config()).unwrap();
    let index = ReferenceIndex::build(catalog(), rules.normalizer());
    (rules, index)
}

#[test]
fn owned_exception_overrides_deny_token() {
    let (rules, index) = fixture();
    let scorer = Scorer::new(&index, &rules);

    let row = UsageRow::new("ELEANOR RIGBY", "globo.xlsx#Sheet1#3").with_artist("THE BEATLES");
    let record = scorer.score_row(0, &row).unwrap();

    assert_eq!(record.match_tier, Tier::Gold);
    assert!(record.has_flag(EvidenceFlag::DenyTokenHit));
    assert!(record.has_flag(EvidenceFlag::OwnedException));
    assert!(record.has_flag(EvidenceFlag::GoldTokenHit));
    assert!(record.has_flag(EvidenceFlag::TitleExact));
}

#[test]
fn deny_token_without_exception_is_no_match() {
    let (rules, index) = fixture();
    let scorer = Scorer::new(&index, &rules);

    let row = UsageRow::new("Common Title", "a#1").with_artist("Beatles Tribute Band");
    let record = scorer.score_row(0, &row).unwrap();
    assert_eq!(record.match_tier, Tier::NoMatch);
    assert!(record.has_flag(EvidenceFlag::DenyTokenHit));
}

#[test]
fn negative_title_overrides_bronze() {
    let (rules, index) = fixture();
    let scorer = Scorer::new(&index, &rules);

    let row = UsageRow::new("DEJA VU", "a#2").with_artist("");
    let record = scorer.score_row(1, &row).unwrap();

    assert_eq!(record.match_tier, Tier::NoMatch);
    assert!(record.has_flag(EvidenceFlag::TitleExact));
    assert!(record.has_flag(EvidenceFlag::NegativeTitleTrigger));
    assert!(!record.matched());
}

#[test]
fn isrc_match_is_gold_regardless_of_title() {
    let (rules, index) = fixture();
    let scorer = Scorer::new(&index, &rules);

    let row = UsageRow::new("RANDOM TEXT", "a#3").with_isrc("BR-XXX-00-00001");
    let record = scorer.score_row(2, &row).unwrap();

    assert_eq!(record.match_tier, Tier::Gold);
    assert!(record.has_flag(EvidenceFlag::IsrcMatch));
    assert!(!record.has_flag(EvidenceFlag::TitleExact));
    assert_eq!(record.ref_match_count, 1);
    assert_eq!(record.best_candidate.map(|c| c.id.value()), Some(30));
}

#[test]
fn unsupported_artist_is_no_match() {
    let (rules, index) = fixture();
    let scorer = Scorer::new(&index, &rules);

    let row = UsageRow::new("COMMON TITLE", "a#4").with_artist("JOHN SMITH");
    let record = scorer.score_row(3, &row).unwrap();

    assert_eq!(record.match_tier, Tier::NoMatch);
    assert!(record.has_flag(EvidenceFlag::TitleExact));
    assert!(record.has_flag(EvidenceFlag::ArtistPresentNoSupport));
    assert!(!record.has_flag(EvidenceFlag::ArtistTokenOverlap));
}

#[test]
fn shared_title_with_gold_token() {
    let (rules, index) = fixture();
    let scorer = Scorer::new(&index, &rules);

    let row = UsageRow::new("X", "a#5").with_supplementary("Editora Estelita");
    let record = scorer.score_row(4, &row).unwrap();

    assert_eq!(record.match_tier, Tier::Gold);
    assert!(record.has_flag(EvidenceFlag::GoldTokenHit));
    assert_eq!(record.ref_match_count, 2);
    let best = record.best_candidate.unwrap();
    assert_eq!(best.id.value(), 50);
    assert_eq!(best.iswc.as_deref(), Some("T0000000019"));
}

#[test]
fn artist_support_on_other_candidate_is_not_silver() {
    let (rules, index) = fixture();
    let scorer = Scorer::new(&index, &rules);

    // "Ana" belongs to entry 51; the audited candidate is 50 (carries an ISWC)
    let row = UsageRow::new("X", "a#8").with_artist("Ana");
    let record = scorer.score_row(0, &row).unwrap();

    assert_eq!(record.best_candidate.as_ref().map(|c| c.id.value()), Some(50));
    assert!(record.has_flag(EvidenceFlag::ArtistPresentNoSupport));
    assert!(!record.has_flag(EvidenceFlag::ArtistTokenOverlap));
    assert_eq!(record.match_tier, Tier::NoMatch);
}

#[test]
fn title_only_short_title_is_no_match() {
    let (rules, index) = fixture();
    let scorer = Scorer::new(&index, &rules);

    let record = scorer.score_row(0, &UsageRow::new("X", "a#6")).unwrap();
    assert_eq!(record.match_tier, Tier::NoMatch);
    assert_eq!(record.ref_match_count, 2);
}

#[test]
fn title_only_long_title_is_bronze() {
    let (rules, index) = fixture();
    let scorer = Scorer::new(&index, &rules);

    let record = scorer
        .score_row(0, &UsageRow::new("Common Title", "a#7"))
        .unwrap();
    assert_eq!(record.match_tier, Tier::Bronze);
    assert_eq!(record.evidence_flags.joined(), "TITLE_EXACT");
}

#[test]
fn flat_record_contract() {
    let (rules, index) = fixture();
    let scorer = Scorer::new(&index, &rules);

    let row = UsageRow::new("Eleanor Rigby", "globo.xlsx#Sheet1#9").with_artist("Paul McCartney");
    let flat = scorer.score_row(8, &row).unwrap().to_flat();

    assert_eq!(flat.ordinal, 8);
    assert_eq!(flat.source_ref, "globo.xlsx#Sheet1#9");
    assert_eq!(flat.title_norm, "ELEANOR RIGBY");
    assert_eq!(flat.match_tier, "Silver");
    assert_eq!(flat.matched, 1);
    assert_eq!(flat.evidence_flags, "TITLE_EXACT;ARTIST_TOKEN_OVERLAP");
    assert_eq!(flat.ref_iswc, "T0104525124");
    assert_eq!(flat.ref_isrc, "");
}

#[test]
fn sharded_run_is_deterministic() {
    let (rules, index) = fixture();
    let scorer = Scorer::new(&index, &rules);

    let templates = [
        UsageRow::new("ELEANOR RIGBY", "").with_artist("THE BEATLES"),
        UsageRow::new("DEJA VU", ""),
        UsageRow::new("RANDOM TEXT", "").with_isrc("BR-XXX-00-00001"),
        UsageRow::new("COMMON TITLE", "").with_artist("JOHN SMITH"),
        UsageRow::new("X", "").with_supplementary("Estelita"),
        UsageRow::new("   ", ""),
    ];
    let rows: Vec<UsageRow> = (0..250)
        .map(|i| {
            let mut row = templates[i % templates.len()].clone();
            row.source_ref = format!("report-{}.xlsx#{}", i / 50, i);
            row
        })
        .collect();

    let sequential = scorer.score_batch(&rows);
    let first = scorer.score_sharded(&rows, 7);
    let second = scorer.score_sharded(&rows, 64);

    assert_eq!(first.records, sequential.records);
    assert_eq!(second.records, sequential.records);
    assert_eq!(first.stats, second.stats);
    assert_eq!(sequential.stats.skipped_malformed, 41);
    assert_eq!(sequential.stats.tier_count(Tier::Gold), 125);
}
