//! Defines the `FastaWriter` struct for writing reconstructed contigs to a FASTA file.
//!

use crate::qc::QualityReport;
use crate::utils::Result;
use std::io::Write;

const LINE_WIDTH: usize = 60;

/// Structure for writing the contigs of each allele as FASTA records.
pub struct FastaWriter<W: Write> {
    /// Destination of the FASTA records.
    writer: W,
    /// Number of records written so far.
    num_records: usize,
}

impl<W: Write> FastaWriter<W> {
    pub fn new(writer: W) -> Self {
        FastaWriter {
            writer,
            num_records: 0,
        }
    }

    /// Writes one record per contig, named `<allele>|<contig id>`.
    ///
    /// # Arguments
    /// * `allele` - Name of the allele the contigs were built for.
    /// * `report` - Quality report holding the contigs.
    pub fn write(&mut self, allele: &str, report: &QualityReport) -> Result<()> {
        for contig in &report.contigs {
            writeln!(self.writer, ">{}|{}", allele, contig.id()).map_err(|e| e.to_string())?;
            for line in contig.sequence.as_bytes().chunks(LINE_WIDTH) {
                self.writer.write_all(line).map_err(|e| e.to_string())?;
                self.writer.write_all(b"\n").map_err(|e| e.to_string())?;
            }
            self.num_records += 1;
        }
        Ok(())
    }

    pub fn num_records(&self) -> usize {
        self.num_records
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| format!("Failed to flush FASTA output: {}", e))
    }
}
