//! Request-scoped record of byte ranges already accepted by the scanner
//!
//! One `ClaimedRegions` is created per scan and threaded through every
//! format pass, so a start signature found inside an accepted image (an
//! embedded thumbnail, or noise in compressed data) never becomes a
//! second candidate.

use std::collections::BTreeMap;
use std::ops::Range;

/// Non-overlapping accepted byte ranges keyed by start offset
#[derive(Debug, Default)]
pub struct ClaimedRegions {
    ranges: BTreeMap<usize, usize>,
}

impl ClaimedRegions {
    pub fn new() -> Self {
        ClaimedRegions { ranges: BTreeMap::new() }
    }

    /// Whether `offset` falls inside an accepted range
    pub fn contains(&self, offset: usize) -> bool {
        self.ranges
            .range(..=offset)
            .next_back()
            .map_or(false, |(_, &end)| offset < end)
    }

    /// Whether `range` intersects an accepted range
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        if range.start >= range.end {
            return self.contains(range.start);
        }
        if self.contains(range.start) {
            return true;
        }
        self.ranges.range(range.start..range.end).next().is_some()
    }

    /// Record `range` as accepted
    ///
    /// Returns false, and records nothing, when it overlaps an existing claim.
    pub fn claim(&mut self, range: Range<usize>) -> bool {
        if range.start >= range.end || self.overlaps(&range) {
            return false;
        }
        self.ranges.insert(range.start, range.end);
        true
    }

    /// Number of accepted ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
