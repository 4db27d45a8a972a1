//! Bounding-box index with stable entry handles.
//!
//! Each sheet owns an R-tree of `(handle, envelope)` pairs; payloads live in a
//! side table keyed by handle. Tree entries compare by handle only, so an
//! entry can be removed even after its payload has been mutated.

use std::collections::HashMap;

use rangegraph_primitives::{BoundingBox, SheetId, Zone};
use rstar::{RTree, RTreeObject, AABB};

/// Stable identity of an index entry, returned by [`SpatialIndex::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

/// A payload stored under a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexItem<T> {
    pub bounding_box: BoundingBox,
    pub data: T,
}

impl<T> IndexItem<T> {
    pub fn new(bounding_box: BoundingBox, data: T) -> Self {
        Self { bounding_box, data }
    }
}

#[derive(Debug, Clone, Copy)]
struct TreeEntry {
    id: EntryId,
    envelope: AABB<[i64; 2]>,
}

impl PartialEq for TreeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TreeEntry {}

impl RTreeObject for TreeEntry {
    type Envelope = AABB<[i64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn zone_envelope(zone: &Zone) -> AABB<[i64; 2]> {
    AABB::from_corners(
        [i64::from(zone.left), i64::from(zone.top)],
        [i64::from(zone.right), i64::from(zone.bottom)],
    )
}

#[derive(Debug)]
pub struct SpatialIndex<T> {
    trees: HashMap<SheetId, RTree<TreeEntry>>,
    entries: HashMap<EntryId, IndexItem<T>>,
    next_id: u64,
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self {
            trees: HashMap::new(),
            entries: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> SpatialIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index in one pass using R-tree bulk loading.
    pub fn bulk_load(items: Vec<IndexItem<T>>) -> Self {
        let mut index = Self::new();
        let mut by_sheet: HashMap<SheetId, Vec<TreeEntry>> = HashMap::new();
        for item in items {
            let id = index.allocate_id();
            by_sheet
                .entry(item.bounding_box.sheet_id)
                .or_default()
                .push(TreeEntry {
                    id,
                    envelope: zone_envelope(&item.bounding_box.zone),
                });
            index.entries.insert(id, item);
        }
        index.trees = by_sheet
            .into_iter()
            .map(|(sheet_id, entries)| (sheet_id, RTree::bulk_load(entries)))
            .collect();
        index
    }

    pub fn insert(&mut self, item: IndexItem<T>) -> EntryId {
        let id = self.allocate_id();
        self.trees
            .entry(item.bounding_box.sheet_id)
            .or_default()
            .insert(TreeEntry {
                id,
                envelope: zone_envelope(&item.bounding_box.zone),
            });
        self.entries.insert(id, item);
        id
    }

    /// Every entry whose bounding box intersects `bounding_box`.
    pub fn search(&self, bounding_box: &BoundingBox) -> Vec<(EntryId, &IndexItem<T>)> {
        let Some(tree) = self.trees.get(&bounding_box.sheet_id) else {
            return Vec::new();
        };
        tree.locate_in_envelope_intersecting(&zone_envelope(&bounding_box.zone))
            .filter_map(|entry| self.entries.get(&entry.id).map(|item| (entry.id, item)))
            .collect()
    }

    /// Remove the entry named by `id`, returning its item.
    pub fn remove(&mut self, id: EntryId) -> Option<IndexItem<T>> {
        let item = self.entries.remove(&id)?;
        let sheet_id = item.bounding_box.sheet_id;
        if let Some(tree) = self.trees.get_mut(&sheet_id) {
            tree.remove(&TreeEntry {
                id,
                envelope: zone_envelope(&item.bounding_box.zone),
            });
            if tree.size() == 0 {
                self.trees.remove(&sheet_id);
            }
        }
        Some(item)
    }

    pub fn get(&self, id: EntryId) -> Option<&IndexItem<T>> {
        self.entries.get(&id)
    }

    /// Mutable access to a payload. The bounding box cannot change.
    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut T> {
        self.entries.get_mut(&id).map(|item| &mut item.data)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &IndexItem<T>)> {
        self.entries.iter().map(|(&id, item)| (id, item))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }
}
