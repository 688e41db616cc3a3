use std::str::FromStr;

/// Which span supplies the bases of a coverage range that was split at
/// large-indel boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitExtraction {
    /// Every sub-contig reuses the bases of the first sub-region. Matches
    /// historical reports.
    #[default]
    Legacy,
    /// Each sub-contig is built from its own sub-region.
    PerSegment,
}

impl FromStr for SplitExtraction {
    type Err = String;
    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "legacy" => Ok(SplitExtraction::Legacy),
            "per-segment" => Ok(SplitExtraction::PerSegment),
            _ => Err(format!(
                "Invalid split extraction '{}'. Options are: legacy, per-segment",
                mode
            )),
        }
    }
}
