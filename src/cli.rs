use crate::utils::{Result, SplitExtraction};
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="alleleqc",
          version=&**FULL_VERSION,
          about="Coverage, homology and contig report for per-allele pileup statistics",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Build quality reports and contigs")]
    Report(ReportArgs),
    #[clap(about = "Validate allele statistics without writing reports")]
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("report")))]
#[command(arg_required_else_help(true))]
pub struct ReportArgs {
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(help = "JSON file with per-allele pileup statistics (optionally gzipped)")]
    #[clap(value_name = "STATS")]
    #[arg(value_parser = check_file_exists)]
    pub input_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-prefix")]
    #[clap(help = "Prefix for output files")]
    #[clap(value_name = "OUTPUT_PREFIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_prefix: String,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "tolerance")]
    #[clap(value_name = "SPAN")]
    #[clap(help = "Coverage ranges must span more than this many positions to be kept")]
    #[clap(default_value = "20")]
    pub tolerance: u32,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "gap-char")]
    #[clap(value_name = "CHAR")]
    #[clap(help = "Gap placeholder removed from contig sequences")]
    #[clap(default_value = "*")]
    #[arg(value_parser = gap_char_from_string)]
    pub gap_char: char,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "split-extraction")]
    #[clap(value_name = "MODE")]
    #[clap(
        help = "Bases used for contigs of a split range: legacy (first sub-region) or per-segment"
    )]
    #[clap(default_value = "legacy")]
    pub split_extraction: SplitExtraction,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("validate")))]
#[command(arg_required_else_help(true))]
pub struct ValidateArgs {
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(help = "JSON file with per-allele pileup statistics (optionally gzipped)")]
    #[clap(value_name = "STATS")]
    #[arg(value_parser = check_file_exists)]
    pub input_path: PathBuf,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_prefix_path(s: &str) -> Result<String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn gap_char_from_string(s: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => Ok(c),
        _ => Err(format!(
            "Gap placeholder must be a single non-whitespace character, got '{}'",
            s
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threads_must_be_positive() {
        assert_eq!(threads_in_range("4"), Ok(4));
        assert!(threads_in_range("0").is_err());
        assert!(threads_in_range("two").is_err());
    }

    #[test]
    fn gap_char_single_character() {
        assert_eq!(gap_char_from_string("*"), Ok('*'));
        assert_eq!(gap_char_from_string("-"), Ok('-'));
        assert!(gap_char_from_string("").is_err());
        assert!(gap_char_from_string("**").is_err());
        assert!(gap_char_from_string(" ").is_err());
    }

    #[test]
    fn prefix_parent_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let ok = dir.path().join("sample");
        assert!(check_prefix_path(ok.to_str().unwrap()).is_ok());
        assert!(check_prefix_path("sample").is_ok());
        let missing = dir.path().join("missing").join("sample");
        assert!(check_prefix_path(missing.to_str().unwrap()).is_err());
    }

    #[test]
    fn parse_report_args() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("stats.json");
        std::fs::write(&input, "{}").unwrap();
        let cli = Cli::try_parse_from([
            "alleleqc",
            "-v",
            "report",
            "-i",
            input.to_str().unwrap(),
            "-o",
            "out",
            "--tolerance",
            "10",
            "--split-extraction",
            "per-segment",
        ])
        .unwrap();
        assert_eq!(cli.verbosity, 1);
        match cli.command {
            Command::Report(args) => {
                assert_eq!(args.tolerance, 10);
                assert_eq!(args.gap_char, '*');
                assert_eq!(args.num_threads, 1);
                assert_eq!(args.split_extraction, SplitExtraction::PerSegment);
            }
            Command::Validate(_) => panic!("expected report subcommand"),
        }
    }

    #[test]
    fn reject_unknown_split_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("stats.json");
        std::fs::write(&input, "{}").unwrap();
        let result = Cli::try_parse_from([
            "alleleqc",
            "report",
            "-i",
            input.to_str().unwrap(),
            "-o",
            "out",
            "--split-extraction",
            "fixed",
        ]);
        assert!(result.is_err());
    }
}
