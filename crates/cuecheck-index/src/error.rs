//! Index error types

use cuecheck_domain::EntryId;
use thiserror::Error;

/// Reasons a catalog entry is refused by the index
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Title missing, blank, or empty after normalization
    #[error("Invalid reference entry {id}: title is missing")]
    MissingTitle {
        /// Entry id as given in the snapshot
        id: EntryId,
    },

    /// Another admitted entry already uses this id
    #[error("Invalid reference entry {id}: duplicate entry id")]
    DuplicateId {
        /// Repeated id
        id: EntryId,
    },
}

impl IndexError {
    /// Id of the refused entry
    pub fn id(&self) -> EntryId {
        match self {
            IndexError::MissingTitle { id } | IndexError::DuplicateId { id } => *id,
        }
    }
}
