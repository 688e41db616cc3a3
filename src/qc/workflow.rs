use super::{
    contigs::{reconstruct_contigs, ContigParams, DEFAULT_GAP_CHAR},
    error::QcError,
    input::AlleleAnalysisInput,
    metrics::compute_metrics,
    report::QualityReport,
    segment::{segment, DEFAULT_TOLERANCE},
};
use crate::utils::SplitExtraction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportParams {
    pub tolerance: u32,
    pub gap_char: char,
    pub split_extraction: SplitExtraction,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            gap_char: DEFAULT_GAP_CHAR,
            split_extraction: SplitExtraction::default(),
        }
    }
}

impl ReportParams {
    fn contig_params(&self) -> ContigParams {
        ContigParams {
            gap_char: self.gap_char,
            split_extraction: self.split_extraction,
        }
    }
}

/// Reduces the pileup statistics of one allele to its quality report.
///
/// Scalar metrics come straight from the input maps. Covered positions are
/// then segmented and every retained range is rebuilt into one or more
/// contigs. Nothing is returned for an allele that fails.
pub fn build_report(
    input: &AlleleAnalysisInput,
    params: &ReportParams,
) -> Result<QualityReport, QcError> {
    input.check_sufficient()?;
    let allele_length = input.validate()?;

    let metrics = compute_metrics(input, allele_length)?;

    let segmentation = segment(metrics.covered_positions.keys().copied(), params.tolerance);
    log::trace!(
        "{} coverage ranges retained with tolerance {}",
        segmentation.ranges.len(),
        params.tolerance
    );

    let layout = reconstruct_contigs(
        &segmentation.ranges,
        &input.positions_indels_probabilities,
        &input.sequence_raw,
        &params.contig_params(),
    )?;

    Ok(QualityReport {
        allele_length,
        depth: metrics.depth,
        coverage_ratio: metrics.coverage_ratio,
        homology_ratio: metrics.homology_ratio,
        position_depth: input.positions_infos.clone(),
        position_mismatches: input.position_mismatches.clone(),
        position_insertions: input.position_insertions.clone(),
        position_deletions: input.position_deletions.clone(),
        indel_probabilities: input.positions_indels_probabilities.clone(),
        positions_mix: input.positions_mix.clone(),
        contigs: layout.contigs,
        coverage_distribution: segmentation.ranges,
        coverage_gaps: segmentation.gaps,
        sequence_distribution: layout.sequence_distribution,
        hotspot_groups: layout.hotspot_groups,
        large_indel_positions: layout.large_indel_positions,
        covered_positions: metrics.covered_positions,
    })
}
