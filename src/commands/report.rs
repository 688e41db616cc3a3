use crate::cli::{ReportArgs, FULL_VERSION};
use crate::qc::{
    build_report, read_batch,
    writers::{FastaWriter, JsonReportWriter, SummaryWriter},
    AlleleAnalysisInput, QcError, QualityReport, ReportParams,
};
use crate::utils::{create_writer, open_input_reader, Result};
use itertools::Itertools;
use rayon::{prelude::*, ThreadPoolBuilder};
use std::{collections::BTreeMap, time};

pub fn report(args: ReportArgs) -> Result<()> {
    let start_timer = time::Instant::now();

    let reader = open_input_reader(&args.input_path)?;
    let batch = read_batch(reader)?;
    log::info!(
        "Loaded {} alleles from {}",
        batch.len(),
        args.input_path.display()
    );

    let params = ReportParams {
        tolerance: args.tolerance,
        gap_char: args.gap_char,
        split_extraction: args.split_extraction,
    };

    let alleles = batch.into_iter().collect_vec();
    let pool = initialize_thread_pool(args.num_threads)?;
    let results = pool.install(|| process_alleles(&alleles, &params));
    let reports = collect_reports(results);

    log::info!(
        "Reported {} of {} alleles",
        reports.len(),
        alleles.len()
    );

    write_outputs(&args.output_prefix, &reports)?;

    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    Ok(())
}

/// Runs every allele through the report builder. Results keep input order.
pub fn process_alleles(
    alleles: &[(String, AlleleAnalysisInput)],
    params: &ReportParams,
) -> Vec<(String, std::result::Result<QualityReport, QcError>)> {
    alleles
        .par_iter()
        .map(|(name, input)| {
            log::debug!("{}: building report", name);
            (name.clone(), build_report(input, params))
        })
        .collect()
}

/// Keeps successful reports. Failed alleles are logged and left out.
pub fn collect_reports(
    results: Vec<(String, std::result::Result<QualityReport, QcError>)>,
) -> BTreeMap<String, QualityReport> {
    let mut reports = BTreeMap::new();
    for (name, result) in results {
        match result {
            Ok(report) => {
                log::debug!(
                    "{}: coverage {}%, homology {}%, {} contigs",
                    name,
                    report.coverage_ratio,
                    report.homology_ratio,
                    report.contigs.len()
                );
                reports.insert(name, report);
            }
            Err(err @ QcError::InsufficientData { .. }) => {
                log::warn!("Skipping allele {}: {}", name, err)
            }
            Err(err) => log::error!("Error analyzing allele {}: {}", name, err),
        }
    }
    reports
}

fn write_outputs(output_prefix: &str, reports: &BTreeMap<String, QualityReport>) -> Result<()> {
    JsonReportWriter::new(create_writer(output_prefix, "report.json")?, &FULL_VERSION)
        .write(reports)?;

    let mut fasta_writer = FastaWriter::new(create_writer(output_prefix, "contigs.fasta")?);
    let mut summary_writer = SummaryWriter::new(create_writer(output_prefix, "summary.tsv")?)?;
    for (name, report) in reports {
        fasta_writer.write(name, report)?;
        summary_writer.write(name, report)?;
    }
    fasta_writer.flush()?;
    summary_writer.flush()?;
    log::info!("Wrote {} contigs", fasta_writer.num_records());
    Ok(())
}

fn initialize_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    log::debug!("Initializing thread pool with {} threads...", num_threads);
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("alleleqc-{}", i))
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))
}
