use super::{
    contigs::{Contig, IndelHotspotGroup},
    input::{DepthValue, Position},
    metrics::DepthSummary,
    segment::{CoverageGap, CoverageRange},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quality summary of one allele.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub allele_length: u32,
    pub depth: DepthSummary,
    /// Percentage of the allele with accepted depth, one decimal
    pub coverage_ratio: f64,
    /// Percentage of the allele matched by covered bases, two decimals
    pub homology_ratio: f64,
    pub position_depth: BTreeMap<Position, DepthValue>,
    pub position_mismatches: BTreeMap<Position, String>,
    pub position_insertions: BTreeMap<Position, u32>,
    pub position_deletions: BTreeMap<Position, u32>,
    pub indel_probabilities: BTreeMap<Position, f64>,
    pub positions_mix: BTreeMap<Position, String>,
    pub contigs: Vec<Contig>,
    pub coverage_distribution: Vec<CoverageRange>,
    pub coverage_gaps: Vec<CoverageGap>,
    pub sequence_distribution: Vec<CoverageRange>,
    pub hotspot_groups: Vec<IndelHotspotGroup>,
    pub large_indel_positions: Vec<Position>,
    pub covered_positions: BTreeMap<Position, u32>,
}

impl QualityReport {
    pub fn average_depth(&self) -> f64 {
        self.depth.average
    }

    pub fn min_depth(&self) -> u32 {
        self.depth.min
    }

    pub fn max_depth(&self) -> u32 {
        self.depth.max
    }

    /// Number of bases over all contigs.
    pub fn assembled_length(&self) -> usize {
        self.contigs.iter().map(|c| c.sequence.len()).sum()
    }
}
