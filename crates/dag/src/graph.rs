//! Formula dependency graph.
//!
//! Every dependency `formula reads range` is stored inverted in a
//! [`RangeRTree`]: the bounding box is the range being read and the data is
//! the formula's own cell. Finding what must be recomputed after an edit is a
//! worklist traversal over that tree.

use rangegraph_primitives::{position_to_zone, BoundingBox, CellPosition, Range, SheetId};

use crate::position_map::PositionMap;
use crate::range_rtree::{RangeItem, RangeRTree};
use crate::range_set::RangeSet;
use crate::spatial_index::IndexItem;

/// Size counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    /// Formula cells with at least one registered dependency.
    pub formula_cells: usize,
    /// Registered `formula -> range` edges.
    pub dependency_edges: usize,
    /// Entries in the spatial index after grouping identical ranges.
    pub index_entries: usize,
}

#[derive(Debug, Default)]
pub struct FormulaDependencyGraph {
    /// Items each formula owns in `r_tree`.
    dependencies: PositionMap<Vec<RangeItem>>,
    r_tree: RangeRTree,
}

fn dependency_items(formula: CellPosition, dependencies: &[BoundingBox]) -> Vec<RangeItem> {
    let formula_range = Range::new(formula.sheet_id, position_to_zone(formula));
    dependencies
        .iter()
        .map(|&bounding_box| IndexItem::new(bounding_box, formula_range))
        .collect()
}

impl FormulaDependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph for a whole workbook at once.
    pub fn from_dependencies<I, D>(formulas: I) -> Self
    where
        I: IntoIterator<Item = (CellPosition, D)>,
        D: AsRef<[BoundingBox]>,
    {
        let mut dependencies: PositionMap<Vec<RangeItem>> = PositionMap::new();
        for (formula, boxes) in formulas {
            let items = dependency_items(formula, boxes.as_ref());
            if !items.is_empty() {
                dependencies.get_or_default(formula).extend(items);
            }
        }
        let r_tree = RangeRTree::from_items(
            dependencies
                .iter()
                .flat_map(|(_, items)| items.iter().copied()),
        );
        tracing::debug!(
            formulas = dependencies.len(),
            index_entries = r_tree.len(),
            "built dependency graph"
        );
        Self {
            dependencies,
            r_tree,
        }
    }

    /// Register the ranges read by the formula at `formula`.
    ///
    /// Callers replacing a formula must call [`Self::remove_all_dependencies`]
    /// first, otherwise the old edges stay registered.
    pub fn add_dependencies(&mut self, formula: CellPosition, dependencies: &[BoundingBox]) {
        if dependencies.is_empty() {
            return;
        }
        let items = dependency_items(formula, dependencies);
        for item in &items {
            self.r_tree.insert(*item);
        }
        tracing::trace!(%formula, count = items.len(), "added dependencies");
        self.dependencies.get_or_default(formula).extend(items);
    }

    /// Forget every range registered for `formula`. No-op if there is none.
    pub fn remove_all_dependencies(&mut self, formula: CellPosition) {
        let Some(items) = self.dependencies.remove(formula) else {
            return;
        };
        self.release_items(formula, &items);
    }

    /// Forget every formula located on `sheet_id`.
    ///
    /// Formulas on other sheets that read `sheet_id` keep their edges.
    pub fn remove_sheet(&mut self, sheet_id: SheetId) {
        let removed = self.dependencies.remove_sheet(sheet_id);
        tracing::debug!(sheet_id, formulas = removed.len(), "removed sheet formulas");
        for (formula, items) in removed {
            self.release_items(formula, &items);
        }
    }

    pub fn clear(&mut self) {
        self.dependencies.clear();
        self.r_tree = RangeRTree::new();
    }

    /// Ranges registered for `formula`, in registration order.
    pub fn dependencies_of(&self, formula: CellPosition) -> Vec<BoundingBox> {
        self.dependencies
            .get(formula)
            .map(|items| items.iter().map(|item| item.bounding_box).collect())
            .unwrap_or_default()
    }

    pub fn has_dependencies(&self, formula: CellPosition) -> bool {
        self.dependencies.contains(formula)
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            formula_cells: self.dependencies.len(),
            dependency_edges: self.dependencies.iter().map(|(_, items)| items.len()).sum(),
            index_entries: self.r_tree.len(),
        }
    }

    /// Every cell that transitively depends on any of `ranges`.
    ///
    /// The result is a set, not an evaluation order. The input ranges are
    /// never part of it, even when a cycle leads back to them.
    pub fn get_cells_depending_on<I>(&self, ranges: I) -> RangeSet
    where
        I: IntoIterator<Item = Range>,
    {
        let ranges: Vec<Range> = ranges.into_iter().collect();
        let mut visited = RangeSet::new();
        let mut queue: Vec<Range> = ranges.iter().rev().copied().collect();
        let mut searches = 0usize;

        while let Some(range) = queue.pop() {
            if visited.has(&range) {
                continue;
            }
            visited.add(range);
            searches += 1;
            let impacted: RangeSet = self
                .r_tree
                .search(&range.bounding_box())
                .into_iter()
                .map(|item| item.data)
                .collect();
            queue.extend(impacted.difference(&visited).iter());
        }

        visited.delete_many(&ranges);
        tracing::debug!(
            seeds = ranges.len(),
            searches,
            empty = visited.is_empty(),
            "computed dependent cells"
        );
        visited
    }

    fn release_items(&mut self, formula: CellPosition, items: &[RangeItem]) {
        for item in items {
            if !self.r_tree.remove(item) {
                tracing::warn!(
                    %formula,
                    dependency = %item.bounding_box,
                    "dependency missing from range tree"
                );
            }
        }
        tracing::trace!(%formula, count = items.len(), "removed dependencies");
    }
}
