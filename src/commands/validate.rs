use crate::cli::ValidateArgs;
use crate::qc::{read_batch, AlleleBatch, QcError};
use crate::utils::{math::median, open_input_reader, Result};

pub fn validate(args: ValidateArgs) -> Result<()> {
    let reader = open_input_reader(&args.input_path)?;
    let batch = read_batch(reader)?;
    let summary = validate_batch(&batch);

    let total = summary.success_count + summary.error_count;
    let success_percentage = (summary.success_count as f64 / total as f64) * 100.0;
    let error_percentage = (summary.error_count as f64 / total as f64) * 100.0;

    if let Some(stats) = calculate_stats(&summary.allele_lengths) {
        log::info!(
            "Allele lengths - Range: [{},{}], Median: {:.2}, Mean: {:.2}, StdDev: {:.2}",
            stats.min,
            stats.max,
            stats.median,
            stats.mean,
            stats.std_dev
        );
    }

    match summary.error_count {
        0 => log::info!("Validation successful. Alleles pass={}", summary.success_count),
        _ => log::info!(
            "Validation failed. Alleles pass={} ({:.2}%), fail={} ({:.2}%)",
            summary.success_count,
            success_percentage,
            summary.error_count,
            error_percentage
        ),
    }

    Ok(())
}

#[derive(Debug, Default)]
struct ValidationSummary {
    success_count: usize,
    error_count: usize,
    allele_lengths: Vec<usize>,
}

fn validate_batch(batch: &AlleleBatch) -> ValidationSummary {
    let mut summary = ValidationSummary::default();
    for (name, input) in batch {
        let result = input
            .check_sufficient()
            .and_then(|_| input.validate());
        match result {
            Ok(allele_length) => {
                summary.allele_lengths.push(allele_length as usize);
                summary.success_count += 1;
            }
            Err(e @ QcError::InsufficientData { .. }) => {
                log::warn!("Allele {}: {}", name, e);
                summary.error_count += 1;
            }
            Err(e) => {
                log::error!("Allele {}: {}", name, e);
                summary.error_count += 1;
            }
        }
    }
    summary
}

fn calculate_stats(data: &[usize]) -> Option<Stats> {
    let median = median(data)?;
    let len = data.len();
    let sum: usize = data.iter().sum();
    let mean = sum as f64 / len as f64;
    let std_dev = (data
        .iter()
        .map(|&x| (x as f64 - mean).powi(2))
        .sum::<f64>()
        / len as f64)
        .sqrt();
    Some(Stats {
        min: *data.iter().min()?,
        max: *data.iter().max()?,
        mean,
        median,
        std_dev,
    })
}

#[derive(Debug, PartialEq)]
struct Stats {
    min: usize,
    max: usize,
    mean: f64,
    median: f64,
    std_dev: f64,
}
