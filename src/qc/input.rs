//! Per-allele pileup statistics as handed over by the pileup parser.
//!
//! Every map is keyed by a 1-based reference position. Depth maps carry
//! [`DepthValue`]s so that the "no usable read" and "excluded" markers never
//! share the numeric domain with real depths.

use super::error::QcError;
use crate::utils::Result;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, io::Read};

pub type Position = u32;

/// Batch of alleles keyed by allele name.
pub type AlleleBatch = BTreeMap<String, AlleleAnalysisInput>;

const NO_READ_MARKER: &str = "$";
const EXCLUDED_MARKER: &str = "*";

/// Depth observed at a position, or the marker that replaced it.
///
/// Variant order is significant: every numeric depth compares below every
/// marker, which is what the minimum accepted depth relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawDepth", into = "RawDepth")]
pub enum DepthValue {
    Reads(u32),
    /// `$` on the wire
    NoRead,
    /// `*` on the wire
    Excluded,
}

impl DepthValue {
    pub fn reads(&self) -> Option<u32> {
        match self {
            DepthValue::Reads(count) => Some(*count),
            DepthValue::NoRead | DepthValue::Excluded => None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.reads().is_none()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawDepth {
    Count(u32),
    Marker(String),
}

impl TryFrom<RawDepth> for DepthValue {
    type Error = String;

    fn try_from(raw: RawDepth) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawDepth::Count(count) => Ok(DepthValue::Reads(count)),
            RawDepth::Marker(marker) => match marker.as_str() {
                NO_READ_MARKER => Ok(DepthValue::NoRead),
                EXCLUDED_MARKER => Ok(DepthValue::Excluded),
                _ => Err(format!(
                    "Invalid depth marker '{}', expected a count, '{}' or '{}'",
                    marker, NO_READ_MARKER, EXCLUDED_MARKER
                )),
            },
        }
    }
}

impl From<DepthValue> for RawDepth {
    fn from(depth: DepthValue) -> Self {
        match depth {
            DepthValue::Reads(count) => RawDepth::Count(count),
            DepthValue::NoRead => RawDepth::Marker(NO_READ_MARKER.to_string()),
            DepthValue::Excluded => RawDepth::Marker(EXCLUDED_MARKER.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlleleAnalysisInput {
    /// Raw read count per position
    pub positions_infos: BTreeMap<Position, DepthValue>,
    /// Depth that passed the acceptance filter
    pub positions_accepted_depth: BTreeMap<Position, DepthValue>,
    /// Observed base at mismatching positions
    #[serde(default)]
    pub position_mismatches: BTreeMap<Position, String>,
    /// Inserted base counts
    #[serde(default)]
    pub inserted_nuc: Vec<u32>,
    #[serde(default)]
    pub position_insertions: BTreeMap<Position, u32>,
    #[serde(default)]
    pub position_deletions: BTreeMap<Position, u32>,
    /// Probability of a large indel per position
    #[serde(default)]
    pub positions_indels_probabilities: BTreeMap<Position, f64>,
    /// Ambiguous base calls
    #[serde(default)]
    pub positions_mix: BTreeMap<Position, String>,
    pub allele_length: i64,
    /// Called base per position, gap placeholder included
    pub sequence_raw: BTreeMap<Position, char>,
}

impl AlleleAnalysisInput {
    /// Rejects alleles whose depth maps carry no entries at all.
    pub fn check_sufficient(&self) -> std::result::Result<(), QcError> {
        if self.positions_infos.is_empty() {
            return Err(QcError::InsufficientData {
                field: "positions_infos",
            });
        }
        if self.positions_accepted_depth.is_empty() {
            return Err(QcError::InsufficientData {
                field: "positions_accepted_depth",
            });
        }
        Ok(())
    }

    /// Checks the coordinate contract and returns the allele length.
    pub fn validate(&self) -> std::result::Result<Position, QcError> {
        if self.allele_length <= 0 {
            return Err(QcError::malformed(format!(
                "allele_length must be positive, got {}",
                self.allele_length
            )));
        }
        let allele_length = Position::try_from(self.allele_length).map_err(|_| {
            QcError::malformed(format!(
                "allele_length {} exceeds the supported maximum",
                self.allele_length
            ))
        })?;

        check_bounds("positions_infos", &self.positions_infos, allele_length)?;
        check_bounds(
            "positions_accepted_depth",
            &self.positions_accepted_depth,
            allele_length,
        )?;
        check_bounds(
            "position_mismatches",
            &self.position_mismatches,
            allele_length,
        )?;
        check_bounds(
            "position_insertions",
            &self.position_insertions,
            allele_length,
        )?;
        check_bounds(
            "position_deletions",
            &self.position_deletions,
            allele_length,
        )?;
        check_bounds(
            "positions_indels_probabilities",
            &self.positions_indels_probabilities,
            allele_length,
        )?;
        check_bounds("positions_mix", &self.positions_mix, allele_length)?;
        check_bounds("sequence_raw", &self.sequence_raw, allele_length)?;

        // Accepted depth only marks rejected positions with "$".
        if let Some((pos, _)) = self
            .positions_accepted_depth
            .iter()
            .find(|(_, depth)| **depth == DepthValue::Excluded)
        {
            return Err(QcError::malformed(format!(
                "positions_accepted_depth has excluded marker at position {}",
                pos
            )));
        }

        Ok(allele_length)
    }
}

fn check_bounds<V>(
    field: &str,
    map: &BTreeMap<Position, V>,
    allele_length: Position,
) -> std::result::Result<(), QcError> {
    let out_of_bounds = map
        .keys()
        .next()
        .filter(|&&first| first < 1)
        .or_else(|| map.keys().next_back().filter(|&&last| last > allele_length));

    match out_of_bounds {
        Some(position) => Err(QcError::malformed(format!(
            "{} has position {} outside 1..={}",
            field, position, allele_length
        ))),
        None => Ok(()),
    }
}

pub fn read_batch<R: Read>(reader: R) -> Result<AlleleBatch> {
    serde_json::from_reader(reader).map_err(|e| format!("Failed to parse allele statistics: {}", e))
}
