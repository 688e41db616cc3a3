mod write_fasta;
mod write_json;
mod write_tsv;

pub use write_fasta::FastaWriter;
pub use write_json::JsonReportWriter;
pub use write_tsv::SummaryWriter;
