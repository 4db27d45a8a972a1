//! R-tree of ranges grouped by exact bounding box.
//!
//! Spreadsheets often have many cells reading the very same range
//! (`=SUM($A$1:$A$1000)` filled down a column). All of them share a single
//! index entry holding a group of ranges; searches flatten the groups back
//! into one item per range.

use std::collections::HashMap;

use indexmap::IndexMap;
use rangegraph_primitives::{BoundingBox, Range};

use crate::spatial_index::{EntryId, IndexItem, SpatialIndex};

pub type RangeItem = IndexItem<Range>;

/// Ranges stored under one bounding box, with the number of times each was
/// inserted.
#[derive(Debug, Clone, Default)]
struct RangeGroup {
    members: IndexMap<Range, usize>,
}

impl RangeGroup {
    fn single(range: Range) -> Self {
        let mut group = Self::default();
        group.add(range);
        group
    }

    fn add(&mut self, range: Range) {
        *self.members.entry(range).or_insert(0) += 1;
    }

    /// Drop one reference to `range`. Returns false if it was not a member.
    fn release(&mut self, range: &Range) -> bool {
        let Some(count) = self.members.get_mut(range) else {
            return false;
        };
        *count -= 1;
        if *count == 0 {
            self.members.shift_remove(range);
        }
        true
    }

    fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RangeRTree {
    index: SpatialIndex<RangeGroup>,
    groups: HashMap<BoundingBox, EntryId>,
}

impl RangeRTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree from an initial set of items, grouping identical boxes
    /// before bulk loading the index.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = RangeItem>,
    {
        let mut grouped: IndexMap<BoundingBox, RangeGroup> = IndexMap::new();
        for item in items {
            grouped.entry(item.bounding_box).or_default().add(item.data);
        }
        let index = SpatialIndex::bulk_load(
            grouped
                .into_iter()
                .map(|(bounding_box, group)| IndexItem::new(bounding_box, group))
                .collect(),
        );
        let groups = index
            .iter()
            .map(|(id, item)| (item.bounding_box, id))
            .collect();
        tracing::debug!(entries = index.len(), "bulk loaded range tree");
        Self { index, groups }
    }

    pub fn insert(&mut self, item: RangeItem) {
        if let Some(group) = self
            .groups
            .get(&item.bounding_box)
            .and_then(|&id| self.index.get_mut(id))
        {
            group.add(item.data);
            return;
        }
        let id = self
            .index
            .insert(IndexItem::new(item.bounding_box, RangeGroup::single(item.data)));
        self.groups.insert(item.bounding_box, id);
    }

    /// One item per grouped range whose bounding box intersects `bounding_box`.
    pub fn search(&self, bounding_box: &BoundingBox) -> Vec<RangeItem> {
        self.index
            .search(bounding_box)
            .into_iter()
            .flat_map(|(_, entry)| {
                entry
                    .data
                    .members
                    .keys()
                    .map(|&range| IndexItem::new(entry.bounding_box, range))
            })
            .collect()
    }

    /// Remove one previously inserted item. Returns false if no such item is
    /// stored.
    pub fn remove(&mut self, item: &RangeItem) -> bool {
        let Some(&id) = self.groups.get(&item.bounding_box) else {
            return false;
        };
        let Some(group) = self.index.get_mut(id) else {
            return false;
        };
        if !group.release(&item.data) {
            return false;
        }
        if group.is_empty() {
            self.index.remove(id);
            self.groups.remove(&item.bounding_box);
        }
        true
    }

    /// Number of index entries (distinct bounding boxes).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of distinct ranges across all groups.
    pub fn item_count(&self) -> usize {
        self.index
            .iter()
            .map(|(_, entry)| entry.data.members.len())
            .sum()
    }
}
