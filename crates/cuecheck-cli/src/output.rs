//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use cuecheck_aggregator::AggregateReport;
use cuecheck_domain::Tier;
use cuecheck_index::IndexReport;
use cuecheck_scorer::ScoringStats;
use colored::*;
use std::collections::BTreeMap;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Duplicate groups shown in table output.
const DEDUP_ROWS_SHOWN: usize = 10;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format scoring counters.
    pub fn format_stats(&self, stats: &ScoringStats) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(stats)?),
            OutputFormat::Table => {
                let mut out = self.tier_table(&stats.tiers, stats.scored);
                out.push('\n');
                out.push_str(&format!(
                    "Rows read: {}  Skipped (malformed): {}  Unscorable: {}",
                    stats.rows_in, stats.skipped_malformed, stats.unscorable
                ));
                if stats.skipped_malformed > 0 || stats.unscorable > 0 {
                    out.push('\n');
                    out.push_str(&self.warning("Some rows were not scored normally; see the log."));
                }
                Ok(out)
            }
        }
    }

    /// Format the reference index build report.
    pub fn format_index_report(&self, report: &IndexReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => {
                let summary = report.summary();
                if report.is_clean() {
                    Ok(format!("{}\n{}", summary, self.success("Reference catalog is clean")))
                } else {
                    Ok(format!(
                        "{}\n{}",
                        summary,
                        self.warning("Reference catalog has refused or altered entries")
                    ))
                }
            }
        }
    }

    /// Format the audit report.
    pub fn format_aggregate(&self, report: &AggregateReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => {
                let mut sections = vec![self.tier_table(&report.tier_counts, report.records)];

                if report.dedup.groups.is_empty() {
                    sections.push(self.info("No repeated usages"));
                } else {
                    let mut builder = Builder::default();
                    builder.push_record(["Title", "Identifier", "Occurrences", "Sources", "First row"]);
                    for group in report.dedup.groups.iter().take(DEDUP_ROWS_SHOWN) {
                        builder.push_record([
                            group.example_title.clone(),
                            group.identifier.clone().unwrap_or_default(),
                            group.occurrences.to_string(),
                            group.distinct_sources.to_string(),
                            group.first_ordinal.to_string(),
                        ]);
                    }
                    sections.push(styled(builder));
                    sections.push(format!(
                        "Duplicate groups: {} listed of {} (largest: {})",
                        report.dedup.groups.len(),
                        report.dedup.total_groups,
                        report.dedup.max_group_size
                    ));
                }

                sections.push(format!(
                    "Truth gaps: {} rows, {} catalog entries, rate {:.1}%",
                    report.truth_gaps.rows.len(),
                    report.truth_gaps.distinct_entries,
                    report.truth_gaps.rate * 100.0
                ));
                sections.push(format!(
                    "Action sheet: {} Gold + {} Silver ({} shadowed by Gold, {} over limit)",
                    report.action_sheet.gold,
                    report.action_sheet.silver,
                    report.action_sheet.silver_shadowed,
                    report.action_sheet.silver_truncated
                ));
                if !report.suspects.is_empty() {
                    sections.push(self.warning(&format!(
                        "{} Gold/Silver rows lack title and artist support",
                        report.suspects.len()
                    )));
                }

                if !report.person_evidence.is_empty() {
                    sections.push(self.info(&format!(
                        "{} unmatched rows carry artist or identifier evidence",
                        report.person_evidence.len()
                    )));
                }

                Ok(sections.join("\n"))
            }
        }
    }

    fn tier_table(&self, counts: &BTreeMap<Tier, usize>, total: usize) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Tier", "Records", "Share"]);
        for tier in Tier::ALL {
            let count = counts.get(&tier).copied().unwrap_or(0);
            let share = if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            };
            builder.push_record([
                self.tier_label(tier),
                count.to_string(),
                format!("{:.1}%", share),
            ]);
        }
        styled(builder)
    }

    fn tier_label(&self, tier: Tier) -> String {
        let color = match tier {
            Tier::Gold => "yellow",
            Tier::Silver => "cyan",
            Tier::Bronze => "magenta",
            Tier::NoMatch => "none",
        };
        self.colorize(tier.as_str(), color)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
