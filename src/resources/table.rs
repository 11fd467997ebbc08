use std::collections::{BTreeMap, HashMap};

use crate::resources::ResourceId;

/// Global old → new resource ID mapping produced by the upstream ID-renumbering phase.
///
/// An ID that has no entry is deleted. An entry mapping an ID to itself is the explicit
/// "keep unchanged" marker. The table is finalized before any class is processed and is
/// only ever read afterwards, so it can be shared by reference across worker threads.
///
/// # Examples
///
/// ```rust
/// use resremap::resources::{RemapTable, ResourceId};
///
/// let table: RemapTable = [(0x7f01_0000_u32, 0x7f01_0010_u32), (0x7f02_0000, 0x7f02_0000)]
///     .into_iter()
///     .collect();
///
/// assert_eq!(table.get(ResourceId(0x7f01_0000)), Some(ResourceId(0x7f01_0010)));
/// assert_eq!(table.get(ResourceId(0x7f01_0001)), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapTable {
    entries: HashMap<ResourceId, ResourceId>,
}

impl RemapTable {
    /// Creates an empty table, which deletes every ID.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new ID for `old`, or `None` if `old` is deleted.
    #[must_use]
    pub fn get(&self, old: ResourceId) -> Option<ResourceId> {
        self.entries.get(&old).copied()
    }

    /// Returns true if `old` survives the remap.
    #[must_use]
    pub fn contains(&self, old: ResourceId) -> bool {
        self.entries.contains_key(&old)
    }

    /// Returns the number of surviving IDs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no ID survives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all `(old, new)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, ResourceId)> + '_ {
        self.entries.iter().map(|(old, new)| (*old, *new))
    }
}

impl FromIterator<(ResourceId, ResourceId)> for RemapTable {
    fn from_iter<I: IntoIterator<Item = (ResourceId, ResourceId)>>(iter: I) -> Self {
        RemapTable {
            entries: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(u32, u32)> for RemapTable {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(old, new)| (ResourceId(old), ResourceId(new)))
            .collect()
    }
}

impl From<HashMap<u32, u32>> for RemapTable {
    fn from(map: HashMap<u32, u32>) -> Self {
        map.into_iter().collect()
    }
}

impl From<BTreeMap<u32, u32>> for RemapTable {
    fn from(map: BTreeMap<u32, u32>) -> Self {
        map.into_iter().collect()
    }
}
