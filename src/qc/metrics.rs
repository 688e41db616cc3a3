use super::{
    error::QcError,
    input::{AlleleAnalysisInput, DepthValue, Position},
};
use crate::utils::math::{mean, round_to};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthSummary {
    /// Mean raw read count, two decimals
    pub average: f64,
    /// Smallest accepted depth
    pub min: u32,
    /// Largest raw read count
    pub max: u32,
}

impl fmt::Display for DepthSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}:{}", self.average, self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarMetrics {
    pub depth: DepthSummary,
    pub coverage_ratio: f64,
    pub homology_ratio: f64,
    pub covered_positions: BTreeMap<Position, u32>,
}

/// Drops sentinel entries, keeping the numeric depth of every other position.
pub fn numeric_depths(depths: &BTreeMap<Position, DepthValue>) -> BTreeMap<Position, u32> {
    depths
        .iter()
        .filter_map(|(&pos, depth)| depth.reads().map(|count| (pos, count)))
        .collect()
}

pub fn max_depth(reads_by_position: &BTreeMap<Position, u32>) -> Result<u32, QcError> {
    reads_by_position
        .values()
        .max()
        .copied()
        .ok_or(QcError::EmptyDepth { metric: "max_depth" })
}

/// Minimum over every accepted-depth entry, markers included. Markers order
/// above any count, so a marker only wins when no count exists at all.
pub fn min_accepted_depth(accepted: &BTreeMap<Position, DepthValue>) -> Result<u32, QcError> {
    accepted
        .values()
        .min()
        .and_then(DepthValue::reads)
        .ok_or(QcError::EmptyDepth { metric: "min_depth" })
}

pub fn average_depth(reads_by_position: &BTreeMap<Position, u32>) -> Result<f64, QcError> {
    let depths = reads_by_position.values().copied().collect_vec();
    mean(&depths)
        .map(|avg| round_to(avg, 2))
        .ok_or(QcError::EmptyDepth {
            metric: "average_depth",
        })
}

pub fn coverage_ratio(num_covered: usize, allele_length: u32) -> f64 {
    round_to(num_covered as f64 * 100.0 / allele_length as f64, 1)
}

/// Share of the reference carried by covered bases that are neither
/// mismatched nor inserted. Negative when those outnumber covered bases.
pub fn homology_ratio(
    num_covered: usize,
    num_mismatches: usize,
    inserted_bases: u64,
    allele_length: u32,
) -> f64 {
    let matched = num_covered as i64 - num_mismatches as i64 - inserted_bases as i64;
    round_to(matched as f64 * 100.0 / allele_length as f64, 2)
}

pub fn compute_metrics(
    input: &AlleleAnalysisInput,
    allele_length: u32,
) -> Result<ScalarMetrics, QcError> {
    let reads_by_position = numeric_depths(&input.positions_infos);
    let max = max_depth(&reads_by_position)?;
    let covered_positions = numeric_depths(&input.positions_accepted_depth);
    let min = min_accepted_depth(&input.positions_accepted_depth)?;
    let average = average_depth(&reads_by_position)?;

    let inserted_bases: u64 = input.inserted_nuc.iter().map(|&n| n as u64).sum();
    let coverage_ratio = coverage_ratio(covered_positions.len(), allele_length);
    let homology_ratio = homology_ratio(
        covered_positions.len(),
        input.position_mismatches.len(),
        inserted_bases,
        allele_length,
    );

    Ok(ScalarMetrics {
        depth: DepthSummary { average, min, max },
        coverage_ratio,
        homology_ratio,
        covered_positions,
    })
}
