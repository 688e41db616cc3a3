//! Defines the `JsonReportWriter` struct for serializing quality reports of a batch of alleles.
//!

use crate::qc::QualityReport;
use crate::utils::Result;
use serde::Serialize;
use std::{collections::BTreeMap, env, io::Write};

/// Top-level document written to the JSON report.
#[derive(Serialize)]
struct ReportDocument<'a> {
    version: &'a str,
    command: String,
    alleles: &'a BTreeMap<String, QualityReport>,
}

/// Structure for writing quality reports as a single JSON document.
pub struct JsonReportWriter<W: Write> {
    /// Destination of the JSON document.
    writer: W,
    /// Version string recorded in the document.
    version: String,
}

impl<W: Write> JsonReportWriter<W> {
    /// Constructs a new `JsonReportWriter` instance.
    ///
    /// # Arguments
    /// * `writer` - Destination of the JSON document.
    /// * `version` - Program version recorded alongside the reports.
    pub fn new(writer: W, version: &str) -> Self {
        JsonReportWriter {
            writer,
            version: version.to_string(),
        }
    }

    /// Writes every report, keyed by allele name, followed by a newline.
    ///
    /// # Arguments
    /// * `reports` - Quality reports keyed by allele name.
    pub fn write(mut self, reports: &BTreeMap<String, QualityReport>) -> Result<()> {
        let args: Vec<String> = env::args().collect();
        let document = ReportDocument {
            version: &self.version,
            command: args.join(" "),
            alleles: reports,
        };
        serde_json::to_writer_pretty(&mut self.writer, &document)
            .map_err(|e| format!("Failed to write JSON report: {}", e))?;
        writeln!(self.writer).map_err(|e| e.to_string())?;
        self.writer.flush().map_err(|e| e.to_string())
    }
}
