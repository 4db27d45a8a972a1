//! Sparse per-cell map with one bucket per sheet.

use std::collections::HashMap;

use rangegraph_primitives::{CellPosition, SheetId};

#[derive(Debug, Clone)]
pub struct PositionMap<T> {
    sheets: HashMap<SheetId, HashMap<(u32, u32), T>>,
}

impl<T> Default for PositionMap<T> {
    fn default() -> Self {
        Self {
            sheets: HashMap::new(),
        }
    }
}

impl<T> PositionMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, position: CellPosition) -> Option<&T> {
        self.sheets
            .get(&position.sheet_id)?
            .get(&(position.col, position.row))
    }

    pub fn get_mut(&mut self, position: CellPosition) -> Option<&mut T> {
        self.sheets
            .get_mut(&position.sheet_id)?
            .get_mut(&(position.col, position.row))
    }

    /// Value at `position`, inserting `T::default()` first if missing.
    pub fn get_or_default(&mut self, position: CellPosition) -> &mut T
    where
        T: Default,
    {
        self.sheets
            .entry(position.sheet_id)
            .or_default()
            .entry((position.col, position.row))
            .or_default()
    }

    pub fn insert(&mut self, position: CellPosition, value: T) -> Option<T> {
        self.sheets
            .entry(position.sheet_id)
            .or_default()
            .insert((position.col, position.row), value)
    }

    pub fn remove(&mut self, position: CellPosition) -> Option<T> {
        let sheet = self.sheets.get_mut(&position.sheet_id)?;
        let value = sheet.remove(&(position.col, position.row));
        if sheet.is_empty() {
            self.sheets.remove(&position.sheet_id);
        }
        value
    }

    /// Remove every value stored on `sheet_id`.
    pub fn remove_sheet(&mut self, sheet_id: SheetId) -> Vec<(CellPosition, T)> {
        self.sheets
            .remove(&sheet_id)
            .map(|cells| {
                cells
                    .into_iter()
                    .map(|((col, row), value)| (CellPosition::new(sheet_id, col, row), value))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn contains(&self, position: CellPosition) -> bool {
        self.get(position).is_some()
    }

    pub fn len(&self) -> usize {
        self.sheets.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn clear(&mut self) {
        self.sheets.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellPosition, &T)> {
        self.sheets.iter().flat_map(|(&sheet_id, cells)| {
            cells
                .iter()
                .map(move |(&(col, row), value)| (CellPosition::new(sheet_id, col, row), value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_drops_empty_sheet_bucket() {
        let mut map = PositionMap::new();
        let position = CellPosition::new(1, 0, 0);
        map.insert(position, "a");
        assert_eq!(map.remove(position), Some("a"));
        assert!(map.is_empty());
        assert_eq!(map.remove(position), None);
    }

    #[test]
    fn test_remove_sheet_leaves_other_sheets() {
        let mut map = PositionMap::new();
        map.insert(CellPosition::new(1, 0, 0), 1);
        map.insert(CellPosition::new(1, 2, 3), 2);
        map.insert(CellPosition::new(2, 0, 0), 3);

        let mut removed = map.remove_sheet(1);
        removed.sort_unstable();
        assert_eq!(
            removed,
            vec![
                (CellPosition::new(1, 0, 0), 1),
                (CellPosition::new(1, 2, 3), 2)
            ]
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(CellPosition::new(2, 0, 0)), Some(&3));
    }
}
