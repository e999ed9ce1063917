use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use phonometrics_rs::{build_report, load_cases, EvaluationError, Report, ScoringOptions};

#[derive(Debug, Parser)]
#[command(name = "pronunciation_report")]
#[command(about = "Generate pronunciation-quality reports from phoneme evaluation cases")]
struct Args {
    /// JSON array of cases: {id, reference, reference_probs, user, user_probs}.
    #[arg(long, env = "PHONOMETRICS_REPORT_CASES_FILE")]
    cases_file: PathBuf,
    /// Report output path; stdout when omitted.
    #[arg(long, env = "PHONOMETRICS_REPORT_OUT")]
    out: Option<PathBuf>,
    #[arg(long, env = "PHONOMETRICS_REPORT_LIMIT")]
    limit: Option<usize>,
    #[arg(long, env = "PHONOMETRICS_REPORT_OFFSET", default_value_t = 0)]
    offset: usize,
    /// A matched phoneme is problematic when user_prob < ref_prob * ratio.
    #[arg(
        long,
        env = "PHONOMETRICS_REPORT_PROBLEM_RATIO",
        default_value_t = ScoringOptions::DEFAULT_PROBLEM_RATIO
    )]
    problem_ratio: f64,
    /// Keep only the worst N problematic phonemes per case.
    #[arg(long, env = "PHONOMETRICS_REPORT_TOP_N")]
    top_n: Option<usize>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("pronunciation_report: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), EvaluationError> {
    let args = Args::parse();

    let mut cases = load_cases(&args.cases_file)?;
    if args.offset > 0 {
        cases = cases.into_iter().skip(args.offset).collect();
    }
    if let Some(limit) = args.limit {
        cases.truncate(limit);
    }
    if cases.is_empty() {
        return Err(EvaluationError::InvalidInput {
            message: "no cases selected after applying offset/limit".to_string(),
        });
    }

    let options = ScoringOptions {
        problem_ratio: args.problem_ratio,
        top_n: args.top_n,
    };
    let report = build_report(&cases, &options);

    match args.out {
        Some(path) => write_report(&path, &report),
        None => print_report(&report),
    }
}

fn write_report(path: &Path, report: &Report) -> Result<(), EvaluationError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| EvaluationError::Io { context: "create report output directory", source: e })?;
    }

    let mut file = File::create(path)
        .map_err(|e| EvaluationError::Io { context: "create report file", source: e })?;
    serde_json::to_writer_pretty(&mut file, report)
        .map_err(|e| EvaluationError::Json { context: "serialize report JSON", source: e })?;
    file.write_all(b"\n")
        .map_err(|e| EvaluationError::Io { context: "finalize report file", source: e })?;
    Ok(())
}

fn print_report(report: &Report) -> Result<(), EvaluationError> {
    let rendered = serde_json::to_string_pretty(report)
        .map_err(|e| EvaluationError::Json { context: "serialize report JSON", source: e })?;
    println!("{rendered}");
    Ok(())
}
