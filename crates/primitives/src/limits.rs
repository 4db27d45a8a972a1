//! Addressable grid size of a workbook.

use serde::{Deserialize, Serialize};

pub const MAX_ROW_COUNT: u32 = 1_048_576;
pub const MAX_COLUMN_COUNT: u32 = 16_384;

/// Number of rows and columns a sheet can address.
///
/// Used to turn whole-row/column references into bounded search zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLimits {
    pub max_rows: u32,
    pub max_cols: u32,
}

impl Default for GridLimits {
    fn default() -> Self {
        Self {
            max_rows: MAX_ROW_COUNT,
            max_cols: MAX_COLUMN_COUNT,
        }
    }
}

impl GridLimits {
    pub fn new(max_rows: u32, max_cols: u32) -> Self {
        Self { max_rows, max_cols }
    }
}
