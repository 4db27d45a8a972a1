//! # rangegraph primitives
//!
//! Cell positions, rectangular zones and sheet-pinned ranges used by the
//! dependency graph, plus A1-notation helpers and grid limits.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod address;
pub mod limits;

pub use address::AddressError;
pub use limits::GridLimits;

pub type SheetId = u32;

/// Largest addressable row or column index.
///
/// Open-ended edges of an [`UnboundedZone`] are reported as this value
/// whenever a bounded [`Zone`] has to be produced from them.
pub const MAX_INDEX: u32 = u32::MAX - 1;

/// A single cell on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPosition {
    pub sheet_id: SheetId,
    pub col: u32,
    pub row: u32,
}

impl CellPosition {
    pub fn new(sheet_id: SheetId, col: u32, row: u32) -> Self {
        Self { sheet_id, col, row }
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sheet {}!{}{}",
            self.sheet_id,
            address::column_index_to_letters(self.col),
            address::row_number(self.row)
        )
    }
}

/// Rectangular region with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Zone {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Zone {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The 1x1 zone of a single cell.
    pub fn cell(col: u32, row: u32) -> Self {
        Self::new(col, row, col, row)
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        col >= self.left && col <= self.right && row >= self.top && row <= self.bottom
    }

    pub fn intersects(&self, other: &Zone) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    pub fn is_single_cell(&self) -> bool {
        self.left == self.right && self.top == self.bottom
    }
}

/// Convert a cell position into its 1x1 zone.
pub fn position_to_zone(position: CellPosition) -> Zone {
    Zone::cell(position.col, position.row)
}

/// A zone whose right and/or bottom edge may be open to the end of the grid
/// (`A:A`, `3:3`, `B2:B`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnboundedZone {
    pub left: u32,
    pub top: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<u32>,
}

impl UnboundedZone {
    pub fn new(left: u32, top: u32, right: Option<u32>, bottom: Option<u32>) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn full_columns(left: u32, right: u32) -> Self {
        Self::new(left, 0, Some(right), None)
    }

    pub fn full_rows(top: u32, bottom: u32) -> Self {
        Self::new(0, top, None, Some(bottom))
    }

    pub fn is_bounded(&self) -> bool {
        self.right.is_some() && self.bottom.is_some()
    }

    /// Bounded view where open edges extend to [`MAX_INDEX`].
    pub fn to_zone(&self) -> Zone {
        Zone::new(
            self.left,
            self.top,
            self.right.unwrap_or(MAX_INDEX),
            self.bottom.unwrap_or(MAX_INDEX),
        )
    }

    /// Bounded view where open edges stop at the last row/column of `limits`.
    pub fn clamp(&self, limits: &GridLimits) -> Zone {
        let last_col = limits.max_cols.saturating_sub(1);
        let last_row = limits.max_rows.saturating_sub(1);
        Zone::new(
            self.left,
            self.top,
            self.right.map_or(last_col, |right| right.min(last_col)),
            self.bottom.map_or(last_row, |bottom| bottom.min(last_row)),
        )
    }
}

impl From<Zone> for UnboundedZone {
    fn from(zone: Zone) -> Self {
        Self::new(zone.left, zone.top, Some(zone.right), Some(zone.bottom))
    }
}

/// Key of the spatial index: a zone pinned to a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoundingBox {
    pub sheet_id: SheetId,
    pub zone: Zone,
}

impl BoundingBox {
    pub fn new(sheet_id: SheetId, zone: Zone) -> Self {
        Self { sheet_id, zone }
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.sheet_id == other.sheet_id && self.zone.intersects(&other.zone)
    }
}

/// A zone pinned to a sheet, keeping the caller's unbounded form alongside
/// the bounded zone used for searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub sheet_id: SheetId,
    pub zone: Zone,
    pub unbounded_zone: UnboundedZone,
}

impl Range {
    pub fn new(sheet_id: SheetId, zone: Zone) -> Self {
        Self {
            sheet_id,
            zone,
            unbounded_zone: zone.into(),
        }
    }

    /// Build a range from an open-ended reference, clamping the search zone
    /// to the grid.
    pub fn from_unbounded(sheet_id: SheetId, zone: UnboundedZone, limits: &GridLimits) -> Self {
        Self {
            sheet_id,
            zone: zone.clamp(limits),
            unbounded_zone: zone,
        }
    }

    pub fn from_position(position: CellPosition) -> Self {
        Self::new(position.sheet_id, position_to_zone(position))
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.sheet_id, self.zone)
    }
}

impl From<BoundingBox> for Range {
    fn from(bounding_box: BoundingBox) -> Self {
        Self::new(bounding_box.sheet_id, bounding_box.zone)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sheet {}!{}", self.sheet_id, self.unbounded_zone)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sheet {}!{}", self.sheet_id, self.zone)
    }
}
