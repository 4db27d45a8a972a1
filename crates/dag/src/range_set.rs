//! Set of ranges spread over several sheets.

use indexmap::IndexMap;
use rangegraph_primitives::{CellPosition, Range, SheetId};

use crate::zone_set::ZoneSet;

/// One [`ZoneSet`] per sheet. Sheets iterate in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct RangeSet {
    sets_by_sheet: IndexMap<SheetId, ZoneSet>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, range: Range) {
        self.sets_by_sheet
            .entry(range.sheet_id)
            .or_default()
            .add(range.unbounded_zone);
    }

    pub fn add_many<I>(&mut self, ranges: I)
    where
        I: IntoIterator<Item = Range>,
    {
        for range in ranges {
            self.add(range);
        }
    }

    pub fn add_position(&mut self, position: CellPosition) {
        self.add(Range::from_position(position));
    }

    pub fn add_many_positions<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = CellPosition>,
    {
        for position in positions {
            self.add_position(position);
        }
    }

    /// Whether the bounded zone of `range` is fully covered.
    pub fn has(&self, range: &Range) -> bool {
        self.sets_by_sheet
            .get(&range.sheet_id)
            .is_some_and(|set| set.has(range.zone))
    }

    pub fn has_position(&self, position: CellPosition) -> bool {
        self.has(&Range::from_position(position))
    }

    pub fn delete(&mut self, range: &Range) {
        if let Some(set) = self.sets_by_sheet.get_mut(&range.sheet_id) {
            set.delete(range.unbounded_zone);
        }
    }

    pub fn delete_many<'a, I>(&mut self, ranges: I)
    where
        I: IntoIterator<Item = &'a Range>,
    {
        for range in ranges {
            self.delete(range);
        }
    }

    pub fn delete_many_positions<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = CellPosition>,
    {
        for position in positions {
            self.delete(&Range::from_position(position));
        }
    }

    /// Per-sheet difference. A sheet absent from `other` is kept as is.
    pub fn difference(&self, other: &RangeSet) -> RangeSet {
        let sets_by_sheet = self
            .sets_by_sheet
            .iter()
            .map(|(&sheet_id, set)| {
                let remaining = match other.sets_by_sheet.get(&sheet_id) {
                    Some(other_set) => set.difference(other_set),
                    None => set.clone(),
                };
                (sheet_id, remaining)
            })
            .collect();
        RangeSet { sets_by_sheet }
    }

    pub fn clear(&mut self) {
        self.sets_by_sheet.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.sets_by_sheet.values().all(|set| set.is_empty())
    }

    /// Disjoint pieces of the set as ranges whose unbounded zone equals
    /// their zone.
    pub fn iter(&self) -> impl Iterator<Item = Range> + '_ {
        self.sets_by_sheet
            .iter()
            .flat_map(|(&sheet_id, set)| set.iter().map(move |zone| Range::new(sheet_id, zone)))
    }

    /// Sheets holding at least one covered cell.
    pub fn sheet_ids(&self) -> impl Iterator<Item = SheetId> + '_ {
        self.sets_by_sheet
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(&sheet_id, _)| sheet_id)
    }
}

impl PartialEq for RangeSet {
    fn eq(&self, other: &Self) -> bool {
        let empty = ZoneSet::new();
        self.sets_by_sheet
            .keys()
            .chain(other.sets_by_sheet.keys())
            .all(|sheet_id| {
                self.sets_by_sheet.get(sheet_id).unwrap_or(&empty)
                    == other.sets_by_sheet.get(sheet_id).unwrap_or(&empty)
            })
    }
}

impl Eq for RangeSet {}

impl FromIterator<Range> for RangeSet {
    fn from_iter<I: IntoIterator<Item = Range>>(iter: I) -> Self {
        let mut set = Self::new();
        set.add_many(iter);
        set
    }
}

impl Extend<Range> for RangeSet {
    fn extend<I: IntoIterator<Item = Range>>(&mut self, iter: I) {
        self.add_many(iter);
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = Range;
    type IntoIter = Box<dyn Iterator<Item = Range> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangegraph_primitives::Zone;

    fn range(sheet_id: SheetId, a1: &str) -> Range {
        Range::new(sheet_id, Zone::from_a1(a1).unwrap())
    }

    #[test]
    fn test_difference_does_not_alias_source() {
        let source: RangeSet = [range(1, "A1:A3")].into_iter().collect();
        let mut diff = source.difference(&RangeSet::new());
        diff.delete(&range(1, "A2"));

        assert!(source.has(&range(1, "A1:A3")));
        assert!(!diff.has(&range(1, "A1:A3")));
    }

    #[test]
    fn test_empty_sheet_equals_missing_sheet() {
        let mut left = RangeSet::new();
        left.add(range(7, "B2"));
        left.delete(&range(7, "B2"));
        assert!(left.is_empty());
        assert_eq!(left, RangeSet::new());
        assert_eq!(left.sheet_ids().count(), 0);
    }
}
