//! Cuecheck Domain Layer
//!
//! Core vocabulary of the usage-report matcher. Every other crate in the
//! workspace depends on the types defined here.
//!
//! ## Key Concepts
//!
//! - **UsageRow**: one row of a third-party usage report (title, artist/author, identifiers)
//! - **ReferenceEntry**: one work or recording of the owned catalog
//! - **EvidenceFlag**: a named boolean signal computed for a row against its candidates
//! - **Tier**: Gold → Silver → Bronze → NoMatch confidence classification
//! - **EvidenceRecord**: the auditable output of scoring one row
//!
//! ## Architecture
//!
//! - Pure data and pure functions only (no I/O)
//! - Text canonicalization lives here so the index and the scorer share it
//! - The [`traits::ReferenceLookup`] seam is implemented by `cuecheck-index`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod flags;
pub mod identifier;
pub mod normalize;
pub mod record;
pub mod row;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use entry::{CandidateSummary, EntryId, ReferenceEntry};
pub use flags::{EvidenceFlag, EvidenceFlags, FLAG_SEPARATOR};
pub use normalize::Normalizer;
pub use record::{EvidenceRecord, FlatRecord, RecordError};
pub use row::{RowError, UsageRow};
pub use tier::Tier;
