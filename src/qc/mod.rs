pub mod contigs;
pub mod error;
pub mod input;
pub mod metrics;
pub mod report;
pub mod segment;
pub mod workflow;
pub mod writers;

pub use contigs::{Contig, IndelHotspotGroup};
pub use error::QcError;
pub use input::{read_batch, AlleleAnalysisInput, AlleleBatch, DepthValue, Position};
pub use report::QualityReport;
pub use segment::{segment, CoverageGap, CoverageRange, Segmentation};
pub use workflow::{build_report, ReportParams};
