//! Range-aware dependency graph for spreadsheet recalculation.
//!
//! Formulas register the rectangular ranges they read; after an edit the
//! graph answers which cells must be recomputed. Ranges shared by many
//! formulas are grouped in a spatial index, and the traversal terminates on
//! circular references.
//!
//! ```
//! use rangegraph_dag::FormulaDependencyGraph;
//! use rangegraph_primitives::{BoundingBox, CellPosition, Range, Zone};
//!
//! let mut graph = FormulaDependencyGraph::new();
//! // B1 = SUM(A1:A10)
//! graph.add_dependencies(
//!     CellPosition::new(1, 1, 0),
//!     &[BoundingBox::new(1, Zone::new(0, 0, 0, 9))],
//! );
//!
//! let impacted = graph.get_cells_depending_on([Range::new(1, Zone::cell(0, 4))]);
//! assert!(impacted.has_position(CellPosition::new(1, 1, 0)));
//! ```

pub mod graph;
pub mod position_map;
pub mod range_rtree;
pub mod range_set;
pub mod spatial_index;
pub mod zone_set;

pub use graph::{FormulaDependencyGraph, GraphStats};
pub use position_map::PositionMap;
pub use range_rtree::{RangeItem, RangeRTree};
pub use range_set::RangeSet;
pub use spatial_index::{EntryId, IndexItem, SpatialIndex};
pub use zone_set::{ZoneSet, Zones};
