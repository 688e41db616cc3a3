//! Defines the `SummaryWriter` struct for writing one summary line per allele.
//!

use crate::qc::QualityReport;
use crate::utils::Result;
use itertools::Itertools;
use std::io::Write;

const HEADER: [&str; 6] = [
    "allele",
    "depth",
    "coverage",
    "homology",
    "contigs",
    "coverage_ranges",
];

/// Structure for writing a tab-separated summary of quality reports.
pub struct SummaryWriter<W: Write> {
    writer: W,
}

impl<W: Write> SummaryWriter<W> {
    /// Constructs a new `SummaryWriter` and writes the header line.
    ///
    /// # Arguments
    /// * `writer` - Destination of the summary.
    pub fn new(mut writer: W) -> Result<Self> {
        writeln!(writer, "{}", HEADER.join("\t")).map_err(|e| e.to_string())?;
        Ok(SummaryWriter { writer })
    }

    /// Writes the summary line of one allele. Depth is `average:min:max` and
    /// coverage ranges are joined with `;`.
    pub fn write(&mut self, allele: &str, report: &QualityReport) -> Result<()> {
        let ranges = report
            .coverage_distribution
            .iter()
            .map(|range| range.to_string())
            .join(";");
        writeln!(
            self.writer,
            "{}\t{}\t{:?}\t{:?}\t{}\t{}",
            allele,
            report.depth,
            report.coverage_ratio,
            report.homology_ratio,
            report.contigs.len(),
            if ranges.is_empty() { "." } else { ranges.as_str() }
        )
        .map_err(|e| e.to_string())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| format!("Failed to flush summary output: {}", e))
    }
}
