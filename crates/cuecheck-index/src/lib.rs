//! Cuecheck Reference Index
//!
//! Immutable, query-optimized view over the owned catalog, implementing
//! [`ReferenceLookup`](cuecheck_domain::traits::ReferenceLookup).
//!
//! # Architecture
//!
//! - Entries sorted by (normalized title, id) so a title lookup is one slice
//! - Exact ISRC and ISWC maps (canonical identifiers, at most one entry each)
//! - Malformed entries are excluded and counted in an [`IndexReport`]
//!
//! # Examples
//!
//! ```
//! use cuecheck_domain::{Normalizer, ReferenceEntry};
//! use cuecheck_domain::traits::ReferenceLookup;
//! use cuecheck_index::ReferenceIndex;
//!
//! let normalizer = Normalizer::default();
//! let index = ReferenceIndex::build(
//!     vec![
//!         ReferenceEntry::new(1, "Déjà Vu").with_isrc("BR-XXX-00-00001"),
//!         ReferenceEntry::new(2, ""),
//!     ],
//!     &normalizer,
//! );
//!
//! assert_eq!(index.len(), 1);
//! assert_eq!(index.report().excluded.len(), 1);
//! assert_eq!(index.lookup_by_title("DEJA VU").len(), 1);
//! assert!(!index.lookup_by_identifier(Some("BRXXX0000001"), None).is_empty());
//! ```

#![warn(missing_docs)]

mod error;
mod index;
mod report;

pub use error::IndexError;
pub use index::ReferenceIndex;
pub use report::{ExcludedEntry, IndexReport};
