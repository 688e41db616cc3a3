use super::input::Position;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum span (`end - start`) a coverage range must exceed to be kept.
pub const DEFAULT_TOLERANCE: u32 = 20;

/// Inclusive run of consecutive reference positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CoverageRange {
    pub start: Position,
    pub end: Position,
}

impl CoverageRange {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end, "range start {} > end {}", start, end);
        Self { start, end }
    }

    pub fn span(&self) -> u32 {
        self.end - self.start
    }

    pub fn num_positions(&self) -> usize {
        self.span() as usize + 1
    }
}

impl fmt::Display for CoverageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Marker between two adjacent retained ranges. It is not checked against
/// the covered positions, so it may enclose short runs that were dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    pub previous_end: Position,
    pub next_start: Position,
}

impl fmt::Display for CoverageGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.previous_end, self.next_start)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub ranges: Vec<CoverageRange>,
    pub gaps: Vec<CoverageGap>,
}

/// Splits covered positions into maximal consecutive runs and keeps those
/// whose span exceeds `tolerance`. Input order and duplicates do not matter.
pub fn segment<I>(covered_positions: I, tolerance: u32) -> Segmentation
where
    I: IntoIterator<Item = Position>,
{
    let positions = covered_positions
        .into_iter()
        .sorted_unstable()
        .dedup()
        .collect_vec();

    let ranges = consecutive_runs(&positions)
        .into_iter()
        .filter(|run| run.start != run.end && run.span() > tolerance)
        .collect_vec();

    let gaps = ranges
        .iter()
        .tuple_windows()
        .map(|(previous, next)| CoverageGap {
            previous_end: previous.end,
            next_start: next.start,
        })
        .collect_vec();

    Segmentation { ranges, gaps }
}

/// Groups sorted, deduplicated positions into runs of consecutive integers.
pub(crate) fn consecutive_runs(sorted_positions: &[Position]) -> Vec<CoverageRange> {
    sorted_positions
        .iter()
        .enumerate()
        .chunk_by(|&(index, &pos)| pos as i64 - index as i64)
        .into_iter()
        .map(|(_, run)| {
            let run = run.map(|(_, &pos)| pos).collect_vec();
            CoverageRange::new(run[0], run[run.len() - 1])
        })
        .collect()
}
