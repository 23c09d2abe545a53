//! Delete semantics
//!
//! A channel still referenced by transactions keeps its record so history
//! stays resolvable; otherwise it is removed outright.
//!
//! The count and the delete are two separate store calls. A transaction
//! written between them can end up referencing a hard-deleted channel.

/// Outcome of the delete check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDecision {
    /// No referencing transactions: remove the record.
    HardDelete,
    /// Referencing transactions exist: flip status to `deleted`.
    SoftDelete { linked: u64 },
}

impl DeleteDecision {
    #[must_use]
    pub fn for_linked_transactions(linked: u64) -> Self {
        if linked == 0 {
            Self::HardDelete
        } else {
            Self::SoftDelete { linked }
        }
    }

    #[must_use]
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::SoftDelete { .. })
    }
}
