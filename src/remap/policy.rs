//! Keep/delete decisions for array elements.
//!
//! An element survives exactly when the remap table has an entry for it. The policy
//! never looks at the element's class kind; what a deletion means for the array is
//! decided by the rewriter.

use crate::resources::{RemapTable, ResourceId};

/// Verdict for one array element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// The resource survives under the given (possibly unchanged) ID.
    Keep(ResourceId),
    /// The resource was removed from the build.
    Delete,
}

impl Decision {
    /// Returns the surviving ID, if any.
    #[must_use]
    pub fn kept(self) -> Option<ResourceId> {
        match self {
            Decision::Keep(id) => Some(id),
            Decision::Delete => None,
        }
    }

    /// Returns true for [`Decision::Delete`].
    #[must_use]
    pub fn is_delete(self) -> bool {
        matches!(self, Decision::Delete)
    }
}

/// Maps array elements through the global remap table.
///
/// The verdict for an element depends only on the table: an ID with an entry is kept
/// under its new value, an ID without one is deleted. Neither the class kind nor the
/// customized allowlist changes the verdict; they only change how the rewriter
/// applies it.
#[derive(Debug, Clone, Copy)]
pub struct RemapPolicy<'a> {
    table: &'a RemapTable,
}

impl<'a> RemapPolicy<'a> {
    /// Creates a policy over `table`.
    #[must_use]
    pub fn new(table: &'a RemapTable) -> Self {
        RemapPolicy { table }
    }

    /// Decides the fate of a single element.
    #[must_use]
    pub fn decide(&self, old: ResourceId) -> Decision {
        self.table.get(old).map_or(Decision::Delete, Decision::Keep)
    }

    /// Decides every element of a decoded array, preserving order.
    #[must_use]
    pub fn decide_all(&self, elements: &[ResourceId]) -> Vec<Decision> {
        elements.iter().map(|&old| self.decide(old)).collect()
    }
}
