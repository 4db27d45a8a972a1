//! Canonical set of rectangles on a single sheet.
//!
//! Coverage is stored as column profiles: an ordered map from a column
//! boundary to the row spans covered on every column up to the next boundary.
//! Edits only touch the boundaries between a zone's left and right edges, so a
//! whole column costs the same as a single cell.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound::{Excluded, Unbounded};

use rangegraph_primitives::{UnboundedZone, Zone, MAX_INDEX};

/// Exclusive end of an open row or column span.
const GRID_END: u32 = MAX_INDEX + 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSet {
    /// Column boundary -> covered row spans flattened as
    /// `[top0, end0, top1, end1, ...]` with exclusive ends.
    /// Column 0 is always present and neighbouring profiles always differ,
    /// so equal coverage means equal maps.
    profiles: BTreeMap<u32, Vec<u32>>,
}

/// A column segment `[start, end)` sharing one profile.
struct Segment<'a> {
    start: u32,
    end: u32,
    profile: &'a [u32],
}

impl Default for ZoneSet {
    fn default() -> Self {
        Self {
            profiles: BTreeMap::from([(0, Vec::new())]),
        }
    }
}

/// Half-open span for inclusive bounds. Indices past [`MAX_INDEX`] are
/// treated as [`MAX_INDEX`].
fn span(first: u32, last: Option<u32>) -> (u32, u32) {
    (
        first.min(MAX_INDEX),
        last.map_or(GRID_END, |index| index.min(MAX_INDEX) + 1),
    )
}

impl ZoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.len() == 1 && self.profiles.values().all(|profile| profile.is_empty())
    }

    pub fn add(&mut self, zone: impl Into<UnboundedZone>) {
        let zone = zone.into();
        self.apply(span(zone.left, zone.right), span(zone.top, zone.bottom), true);
    }

    pub fn delete(&mut self, zone: impl Into<UnboundedZone>) {
        let zone = zone.into();
        self.apply(span(zone.left, zone.right), span(zone.top, zone.bottom), false);
    }

    /// Whether every cell of `zone` is covered. An inverted zone is never
    /// covered.
    pub fn has(&self, zone: Zone) -> bool {
        let (left, right) = span(zone.left, Some(zone.right));
        let (top, bottom) = span(zone.top, Some(zone.bottom));
        if left >= right || top >= bottom {
            return false;
        }
        self.segments(left, right)
            .iter()
            .all(|segment| covers(segment.profile, top, bottom))
    }

    /// Coverage of `self` that is not covered by `other`.
    ///
    /// Only the segments of `other` overlapping the columns used by `self`
    /// are visited.
    pub fn difference(&self, other: &ZoneSet) -> ZoneSet {
        let mut result = self.clone();
        let Some((left, right)) = self.covered_columns() else {
            return result;
        };
        for segment in other.segments(left, right) {
            for span in segment.profile.chunks_exact(2) {
                result.apply((segment.start, segment.end), (span[0], span[1]), false);
            }
        }
        result
    }

    /// Disjoint zones partitioning the covered area, sorted by `(left, top)`.
    ///
    /// Open edges are reported as [`rangegraph_primitives::MAX_INDEX`].
    pub fn iter(&self) -> Zones {
        let mut zones = Vec::new();
        // row span -> column where the pending piece started
        let mut open: BTreeMap<(u32, u32), u32> = BTreeMap::new();
        for (&column, profile) in &self.profiles {
            let spans: BTreeSet<(u32, u32)> = profile
                .chunks_exact(2)
                .map(|span| (span[0], span[1]))
                .collect();
            open.retain(|&span, &mut left| {
                let keep = spans.contains(&span);
                if !keep {
                    zones.push(piece(left, column, span));
                }
                keep
            });
            for span in spans {
                open.entry(span).or_insert(column);
            }
        }
        for (span, left) in open {
            zones.push(piece(left, GRID_END, span));
        }
        zones.sort_unstable_by_key(|zone| (zone.left, zone.top));
        Zones {
            inner: zones.into_iter(),
        }
    }

    fn apply(&mut self, (left, right): (u32, u32), (top, bottom): (u32, u32), covered: bool) {
        if left >= right || top >= bottom {
            return;
        }
        self.split_at(left);
        if right != GRID_END {
            self.split_at(right);
        }
        for profile in self.profiles.range_mut(left..right).map(|(_, profile)| profile) {
            set_span(profile, top, bottom, covered);
        }
        self.coalesce(left, right);
    }

    /// Make `column` a boundary, inheriting the profile in effect there.
    fn split_at(&mut self, column: u32) {
        if self.profiles.contains_key(&column) {
            return;
        }
        let inherited = self
            .profiles
            .range(..column)
            .next_back()
            .map(|(_, profile)| profile.clone())
            .unwrap_or_default();
        self.profiles.insert(column, inherited);
    }

    /// Drop boundaries in `[left, right]` whose profile repeats the previous one.
    fn coalesce(&mut self, left: u32, right: u32) {
        let candidates: Vec<u32> = self
            .profiles
            .range(left..=right)
            .map(|(&column, _)| column)
            .collect();
        for column in candidates {
            if column == 0 {
                continue;
            }
            let redundant = match (
                self.profiles.range(..column).next_back(),
                self.profiles.get(&column),
            ) {
                (Some((_, previous)), Some(current)) => previous == current,
                _ => false,
            };
            if redundant {
                self.profiles.remove(&column);
            }
        }
    }

    fn segments(&self, start: u32, end: u32) -> Vec<Segment<'_>> {
        if start >= end {
            return Vec::new();
        }
        let first = self
            .profiles
            .range(..=start)
            .next_back()
            .map_or(0, |(&column, _)| column);
        let mut boundaries = self.profiles.range(first..end).peekable();
        let mut segments = Vec::new();
        while let Some((&column, profile)) = boundaries.next() {
            let next = boundaries.peek().map_or(GRID_END, |(&column, _)| column);
            segments.push(Segment {
                start: column.max(start),
                end: next.min(end),
                profile: profile.as_slice(),
            });
        }
        segments
    }

    /// Column span `[left, right)` holding every covered cell.
    fn covered_columns(&self) -> Option<(u32, u32)> {
        let left = self
            .profiles
            .iter()
            .find(|(_, profile)| !profile.is_empty())
            .map(|(&column, _)| column)?;
        let last = self
            .profiles
            .iter()
            .rev()
            .find(|(_, profile)| !profile.is_empty())
            .map(|(&column, _)| column)?;
        let right = self
            .profiles
            .range((Excluded(last), Unbounded))
            .next()
            .map_or(GRID_END, |(&column, _)| column);
        Some((left, right))
    }
}

/// Set rows `[top, bottom)` to `covered` in a flattened span list.
fn set_span(profile: &mut Vec<u32>, top: u32, bottom: u32, covered: bool) {
    let start = profile.partition_point(|&boundary| boundary < top);
    let end = profile.partition_point(|&boundary| boundary <= bottom);
    let inside_before = start % 2 == 1;
    let inside_after = end % 2 == 1;
    let mut replacement = Vec::with_capacity(2);
    if inside_before != covered {
        replacement.push(top);
    }
    if inside_after != covered {
        replacement.push(bottom);
    }
    profile.splice(start..end, replacement);
}

fn covers(profile: &[u32], top: u32, bottom: u32) -> bool {
    let index = profile.partition_point(|&boundary| boundary <= top);
    index % 2 == 1 && profile.get(index).is_some_and(|&end| end >= bottom)
}

fn piece(left: u32, end: u32, (top, bottom): (u32, u32)) -> Zone {
    Zone::new(left, top, end - 1, bottom - 1)
}

/// Snapshot iterator over the pieces of a [`ZoneSet`].
#[derive(Debug, Clone)]
pub struct Zones {
    inner: std::vec::IntoIter<Zone>,
}

impl Iterator for Zones {
    type Item = Zone;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Zones {}

impl<'a> IntoIterator for &'a ZoneSet {
    type Item = Zone;
    type IntoIter = Zones;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<Z: Into<UnboundedZone>> FromIterator<Z> for ZoneSet {
    fn from_iter<I: IntoIterator<Item = Z>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<Z: Into<UnboundedZone>> Extend<Z> for ZoneSet {
    fn extend<I: IntoIterator<Item = Z>>(&mut self, iter: I) {
        for zone in iter {
            self.add(zone);
        }
    }
}
