//! Parse command - extract fields from one or many statements.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use ccparse_core::{
    ExtractionResult, ParseReport, StatementConfig, StatementExtractor, StatementParser, StatementReader,
    StatementText, TesseractEngine,
};

use super::{load_config, load_registry};
use crate::export;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Folder, PDF or text file, or glob pattern
    #[arg(default_value = "credit_statements")]
    input: String,

    /// CSV output file
    #[arg(long)]
    out_csv: Option<PathBuf>,

    /// JSON output file
    #[arg(long)]
    out_json: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Never fall back to OCR
    #[arg(long)]
    no_ocr: bool,

    /// Abort when a statement cannot be read
    #[arg(long)]
    strict: bool,

    /// Print each extracted record
    #[arg(long)]
    print: bool,
}

/// Result of processing a single file.
struct FileOutcome {
    path: PathBuf,
    report: ParseReport,
    error: Option<String>,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let parser = StatementParser::with_registry(load_registry(&config)?);

    let files = collect_inputs(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No statements found at {}", args.input);
    }

    println!(
        "{} Found {} statement(s) to parse",
        style("ℹ").blue(),
        files.len()
    );

    let reader = build_reader(&config, args.no_ocr);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let outcomes = process_all(files, &reader, &parser, args.jobs, &pb).await?;
    pb.finish_and_clear();

    if args.strict {
        if let Some(failed) = outcomes.iter().find(|o| o.error.is_some()) {
            error!("Failed to read {}", failed.path.display());
            anyhow::bail!(
                "Failed to read {}: {}",
                failed.path.display(),
                failed.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    for outcome in &outcomes {
        let name = display_name(&outcome.path);
        if let Some(err) = &outcome.error {
            println!("{} {}: {}", style("✗").red(), name, err);
        } else if !outcome.report.issuer_detected {
            println!("{} {}: could not detect issuer", style("⚠").yellow(), name);
        }

        if args.print {
            println!("{}", export::format_text(&name, &outcome.report.result));
        }
    }

    let records: Vec<ExtractionResult> = outcomes.into_iter().map(|o| o.report.result).collect();

    let csv_path = args.out_csv.unwrap_or_else(|| config.output.csv.clone());
    let json_path = args.out_json.unwrap_or_else(|| config.output.json.clone());
    create_parent(&csv_path)?;
    create_parent(&json_path)?;

    export::write_csv_file(&csv_path, &records)?;
    export::write_json_file(&json_path, &records)?;

    println!(
        "{} Parsed {} statement(s) in {:?}. CSV saved to {} and JSON saved to {}.",
        style("✓").green(),
        records.len(),
        start.elapsed(),
        csv_path.display(),
        json_path.display()
    );

    Ok(())
}

/// Extract every file on blocking workers, keeping input order.
async fn process_all(
    files: Vec<PathBuf>,
    reader: &StatementReader,
    parser: &StatementParser,
    jobs: usize,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<FileOutcome>> {
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let reader = reader.clone();
        let parser = parser.clone();
        let pb = pb.clone();

        let task_path = path.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            pb.set_message(display_name(&task_path));
            let outcome = process_file(task_path, &reader, &parser);
            pb.inc(1);
            outcome
        });
        handles.push((path, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                // A panicking worker never reached pb.inc
                pb.inc(1);
                failed_outcome(path, parser, format!("worker failed: {}", e))
            }
        };
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

fn process_file(path: PathBuf, reader: &StatementReader, parser: &StatementParser) -> FileOutcome {
    info!("Parsing: {}", path.display());

    match reader.read(&path) {
        Ok(text) => {
            let report = parser.parse(&text);
            debug!("{}: {} warning(s)", path.display(), report.warnings.len());
            FileOutcome {
                path,
                report,
                error: None,
            }
        }
        Err(e) => failed_outcome(path, parser, e.to_string()),
    }
}

/// All-null record for a statement whose text could not be obtained.
fn failed_outcome(path: PathBuf, parser: &StatementParser, error: String) -> FileOutcome {
    warn!("Failed to read {}: {}", path.display(), error);
    FileOutcome {
        report: parser.parse(&StatementText::default()),
        path,
        error: Some(error),
    }
}

fn build_reader(config: &StatementConfig, no_ocr: bool) -> StatementReader {
    let reader = StatementReader::new(config.pdf.clone());
    if no_ocr || !config.ocr.enabled {
        return reader;
    }

    match TesseractEngine::locate(&config.ocr) {
        Ok(engine) => {
            debug!("OCR fallback via {}", engine.command().display());
            reader.with_ocr(Arc::new(engine))
        }
        Err(e) => {
            warn!("{}; scanned statements will come back empty", e);
            reader
        }
    }
}

/// Expand the input argument into statement files.
fn collect_inputs(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let path = Path::new(input);

    if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_statement_file(p))
            .collect();
        files.sort();
        return Ok(files);
    }

    if path.is_file() {
        if !is_statement_file(path) {
            anyhow::bail!("Unsupported file: {}", path.display());
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if input.contains(['*', '?', '[']) {
        let files = glob(input)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file() && is_statement_file(p))
            .collect();
        return Ok(files);
    }

    anyhow::bail!("Path not found or unsupported: {}", input)
}

fn is_statement_file(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
