//! Rebuilds contig sequences from the called bases of each coverage range.
//!
//! A coverage range is emitted as a single contig unless it contains large
//! indel hotspots that come in adjacent pairs (`p`, `p + 1`). Each such pair
//! marks where one contig ends and the next begins, so a range holding `k`
//! pairs is cut into `k + 1` sub-regions.

use super::{
    error::QcError,
    input::Position,
    segment::{consecutive_runs, CoverageRange},
};
use crate::utils::SplitExtraction;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_GAP_CHAR: char = '*';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contig {
    pub number: usize,
    pub region: CoverageRange,
    pub sequence: String,
}

impl Contig {
    pub fn id(&self) -> String {
        format!("contig_{}_mapped to region_{}", self.number, self.region)
    }
}

/// Indel hotspots strictly inside one coverage range, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndelHotspotGroup {
    pub range: CoverageRange,
    pub positions: Vec<Position>,
}

impl IndelHotspotGroup {
    pub fn collect(range: CoverageRange, indel_probabilities: &BTreeMap<Position, f64>) -> Self {
        let positions = if range.span() < 2 {
            Vec::new()
        } else {
            indel_probabilities
                .range(range.start + 1..range.end)
                .map(|(&pos, _)| pos)
                .collect()
        };
        Self { range, positions }
    }

    pub fn runs(&self) -> Vec<CoverageRange> {
        consecutive_runs(&self.positions)
    }

    /// Flattened positions of every run of exactly two hotspots.
    pub fn boundary_pairs(&self) -> Vec<Position> {
        self.runs()
            .into_iter()
            .filter(|run| run.num_positions() == 2)
            .flat_map(|run| [run.start, run.end])
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContigParams {
    pub gap_char: char,
    pub split_extraction: SplitExtraction,
}

impl Default for ContigParams {
    fn default() -> Self {
        Self {
            gap_char: DEFAULT_GAP_CHAR,
            split_extraction: SplitExtraction::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContigLayout {
    pub contigs: Vec<Contig>,
    /// Region behind each contig, in contig order
    pub sequence_distribution: Vec<CoverageRange>,
    pub hotspot_groups: Vec<IndelHotspotGroup>,
    /// Hotspot positions that were used as split points
    pub large_indel_positions: Vec<Position>,
}

/// Builds the contigs of one allele.
///
/// The contig counter runs across all ranges. It advances on entering a
/// range, which numbers an unsplit range, and once more for every sub-contig
/// of a split range.
pub fn reconstruct_contigs(
    ranges: &[CoverageRange],
    indel_probabilities: &BTreeMap<Position, f64>,
    sequence_raw: &BTreeMap<Position, char>,
    params: &ContigParams,
) -> Result<ContigLayout, QcError> {
    let mut layout = ContigLayout::default();
    let mut contig_counter = 0;

    for &range in ranges {
        contig_counter += 1;
        let group = IndelHotspotGroup::collect(range, indel_probabilities);
        let boundaries = if group.positions.len() < 2 {
            Vec::new()
        } else {
            group.boundary_pairs()
        };
        if !group.positions.is_empty() {
            log::debug!(
                "Range {}: {} indel hotspots, {} split points",
                range,
                group.positions.len(),
                boundaries.len()
            );
            layout.hotspot_groups.push(group);
        }

        if boundaries.is_empty() {
            let sequence = extract_sequence(sequence_raw, range, params.gap_char)?;
            layout.contigs.push(Contig {
                number: contig_counter,
                region: range,
                sequence,
            });
            layout.sequence_distribution.push(range);
            continue;
        }

        layout.large_indel_positions.extend_from_slice(&boundaries);
        let sub_regions = split_at_boundaries(range, &boundaries);
        if params.split_extraction == SplitExtraction::Legacy {
            log::warn!(
                "Range {} split into {} contigs; all take their bases from {}",
                range,
                sub_regions.len(),
                sub_regions[0]
            );
        }

        for &sub_region in &sub_regions {
            contig_counter += 1;
            let source = match params.split_extraction {
                SplitExtraction::Legacy => sub_regions[0],
                SplitExtraction::PerSegment => sub_region,
            };
            let sequence = extract_sequence(sequence_raw, source, params.gap_char)?;
            layout.contigs.push(Contig {
                number: contig_counter,
                region: sub_region,
                sequence,
            });
            layout.sequence_distribution.push(sub_region);
        }
    }

    Ok(layout)
}

/// Pairs up the sorted range ends and boundary positions:
/// `[s, b1, b2, ..., e]` becomes `(s, b1), (b2, b3), ..., (bn, e)`.
fn split_at_boundaries(range: CoverageRange, boundaries: &[Position]) -> Vec<CoverageRange> {
    [range.start, range.end]
        .into_iter()
        .chain(boundaries.iter().copied())
        .sorted_unstable()
        .tuples::<(Position, Position)>()
        .map(|(start, end)| CoverageRange::new(start, end))
        .collect()
}

/// Concatenates the bases of `region` with gap placeholders removed.
pub fn extract_sequence(
    sequence_raw: &BTreeMap<Position, char>,
    region: CoverageRange,
    gap_char: char,
) -> Result<String, QcError> {
    let mut sequence = String::with_capacity(region.num_positions());
    for pos in region.start..=region.end {
        let base = sequence_raw.get(&pos).ok_or_else(|| {
            QcError::malformed(format!(
                "sequence_raw has no base at position {} of region {}",
                pos, region
            ))
        })?;
        if *base != gap_char {
            sequence.push(*base);
        }
    }
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASES: &[u8] = b"ACGT";

    fn sequence_of_length(len: Position) -> BTreeMap<Position, char> {
        (1..=len)
            .map(|pos| (pos, BASES[(pos % 4) as usize] as char))
            .collect()
    }

    fn expected_bases(sequence_raw: &BTreeMap<Position, char>, start: Position, end: Position) -> String {
        (start..=end).map(|pos| sequence_raw[&pos]).collect()
    }

    fn hotspots(positions: &[Position]) -> BTreeMap<Position, f64> {
        positions.iter().map(|&pos| (pos, 0.9)).collect()
    }

    #[test]
    fn contig_id_format() {
        let contig = Contig {
            number: 3,
            region: CoverageRange::new(10, 40),
            sequence: "ACGT".to_string(),
        };
        assert_eq!(contig.id(), "contig_3_mapped to region_10-40");
    }

    #[test]
    fn hotspot_group_is_strict_interior() {
        let probabilities = hotspots(&[10, 11, 20, 21, 22, 30, 40]);
        let group = IndelHotspotGroup::collect(CoverageRange::new(10, 40), &probabilities);
        assert_eq!(group.positions, vec![11, 20, 21, 22, 30]);
        assert_eq!(
            group.runs(),
            vec![
                CoverageRange::new(11, 11),
                CoverageRange::new(20, 22),
                CoverageRange::new(30, 30)
            ]
        );
        assert!(group.boundary_pairs().is_empty());
    }

    #[test]
    fn hotspot_group_of_narrow_range() {
        let probabilities = hotspots(&[5, 6]);
        let group = IndelHotspotGroup::collect(CoverageRange::new(5, 6), &probabilities);
        assert!(group.positions.is_empty());
    }

    #[test]
    fn boundary_pairs_only_from_runs_of_two() {
        let probabilities = hotspots(&[15, 16, 30, 31, 32, 50, 51, 70]);
        let group = IndelHotspotGroup::collect(CoverageRange::new(1, 100), &probabilities);
        assert_eq!(group.boundary_pairs(), vec![15, 16, 50, 51]);
    }

    #[test]
    fn single_contig_without_hotspots() {
        let sequence_raw = sequence_of_length(50);
        let ranges = [CoverageRange::new(10, 40)];
        let layout = reconstruct_contigs(
            &ranges,
            &hotspots(&[5, 10, 40, 45]),
            &sequence_raw,
            &ContigParams::default(),
        )
        .unwrap();

        assert_eq!(layout.contigs.len(), 1);
        assert_eq!(layout.contigs[0].number, 1);
        assert_eq!(layout.contigs[0].region, CoverageRange::new(10, 40));
        assert_eq!(layout.contigs[0].sequence, expected_bases(&sequence_raw, 10, 40));
        assert_eq!(layout.sequence_distribution, ranges.to_vec());
        assert!(layout.hotspot_groups.is_empty());
    }

    #[test]
    fn gaps_are_stripped_in_order() {
        let mut sequence_raw = sequence_of_length(50);
        sequence_raw.insert(15, '*');
        sequence_raw.insert(16, '*');
        let layout = reconstruct_contigs(
            &[CoverageRange::new(10, 40)],
            &BTreeMap::new(),
            &sequence_raw,
            &ContigParams::default(),
        )
        .unwrap();

        let expected: String = (10..=40)
            .filter(|pos| *pos != 15 && *pos != 16)
            .map(|pos| sequence_raw[&pos])
            .collect();
        assert_eq!(layout.contigs[0].sequence.len(), 31 - 2);
        assert_eq!(layout.contigs[0].sequence, expected);
    }

    #[test]
    fn custom_gap_char() {
        let mut sequence_raw = sequence_of_length(30);
        sequence_raw.insert(5, '-');
        let params = ContigParams {
            gap_char: '-',
            ..Default::default()
        };
        let sequence = extract_sequence(&sequence_raw, CoverageRange::new(1, 30), params.gap_char).unwrap();
        assert_eq!(sequence.len(), 29);
        assert!(!sequence.contains('-'));
    }

    #[test]
    fn single_hotspot_does_not_split() {
        let sequence_raw = sequence_of_length(100);
        let layout = reconstruct_contigs(
            &[CoverageRange::new(1, 100)],
            &hotspots(&[50]),
            &sequence_raw,
            &ContigParams::default(),
        )
        .unwrap();
        assert_eq!(layout.contigs.len(), 1);
        assert_eq!(layout.hotspot_groups.len(), 1);
        assert!(layout.large_indel_positions.is_empty());
    }

    #[test]
    fn unpaired_hotspots_do_not_split() {
        let sequence_raw = sequence_of_length(100);
        let layout = reconstruct_contigs(
            &[CoverageRange::new(1, 100)],
            &hotspots(&[20, 40, 41, 42]),
            &sequence_raw,
            &ContigParams::default(),
        )
        .unwrap();
        assert_eq!(layout.contigs.len(), 1);
        assert_eq!(layout.contigs[0].number, 1);
        assert_eq!(layout.sequence_distribution, vec![CoverageRange::new(1, 100)]);
    }

    #[test]
    fn hotspot_pair_splits_range() {
        let sequence_raw = sequence_of_length(100);
        let layout = reconstruct_contigs(
            &[CoverageRange::new(1, 100)],
            &hotspots(&[50, 51]),
            &sequence_raw,
            &ContigParams::default(),
        )
        .unwrap();

        assert_eq!(
            layout.sequence_distribution,
            vec![CoverageRange::new(1, 50), CoverageRange::new(51, 100)]
        );
        assert_eq!(layout.large_indel_positions, vec![50, 51]);
        let numbers = layout.contigs.iter().map(|c| c.number).collect_vec();
        assert_eq!(numbers, vec![2, 3]);
        assert_eq!(layout.contigs[1].id(), "contig_3_mapped to region_51-100");
    }

    #[test]
    fn legacy_split_reuses_first_sub_region_bases() {
        let sequence_raw = sequence_of_length(100);
        let layout = reconstruct_contigs(
            &[CoverageRange::new(1, 100)],
            &hotspots(&[50, 51]),
            &sequence_raw,
            &ContigParams::default(),
        )
        .unwrap();

        let first_bases = expected_bases(&sequence_raw, 1, 50);
        assert_eq!(layout.contigs[0].sequence, first_bases);
        assert_eq!(layout.contigs[1].sequence, first_bases);
    }

    #[test]
    fn per_segment_split_uses_own_bases() {
        let sequence_raw = sequence_of_length(100);
        let params = ContigParams {
            split_extraction: SplitExtraction::PerSegment,
            ..Default::default()
        };
        let layout = reconstruct_contigs(
            &[CoverageRange::new(1, 100)],
            &hotspots(&[30, 31, 60, 61]),
            &sequence_raw,
            &params,
        )
        .unwrap();

        let regions = vec![
            CoverageRange::new(1, 30),
            CoverageRange::new(31, 60),
            CoverageRange::new(61, 100),
        ];
        assert_eq!(layout.sequence_distribution, regions);
        for (contig, region) in layout.contigs.iter().zip(&regions) {
            assert_eq!(contig.region, *region);
            assert_eq!(contig.sequence, expected_bases(&sequence_raw, region.start, region.end));
        }
    }

    #[test]
    fn counter_runs_across_ranges() {
        let sequence_raw = sequence_of_length(200);
        let ranges = [
            CoverageRange::new(1, 40),
            CoverageRange::new(50, 150),
            CoverageRange::new(160, 200),
        ];
        let layout = reconstruct_contigs(
            &ranges,
            &hotspots(&[100, 101]),
            &sequence_raw,
            &ContigParams::default(),
        )
        .unwrap();

        let ids = layout.contigs.iter().map(|c| c.id()).collect_vec();
        assert_eq!(
            ids,
            vec![
                "contig_1_mapped to region_1-40",
                "contig_3_mapped to region_50-100",
                "contig_4_mapped to region_101-150",
                "contig_5_mapped to region_160-200",
            ]
        );
    }

    #[test]
    fn missing_base_is_malformed() {
        let mut sequence_raw = sequence_of_length(50);
        sequence_raw.remove(&20);
        let result = reconstruct_contigs(
            &[CoverageRange::new(10, 40)],
            &BTreeMap::new(),
            &sequence_raw,
            &ContigParams::default(),
        );
        assert!(matches!(result, Err(QcError::MalformedInput { .. })));
    }
}
