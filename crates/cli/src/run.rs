//! The analysis run: configuration, output preparation, validation, row
//! selection, the per-row loop, and the summary sheets.
//!
//! Console text goes to the `out` writer given by the caller. Failures
//! writing to the console are ignored; the run does not depend on them.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;
use casecheck_ai::{Analyzer, ChatTransport, OpenAiClient};
use casecheck_config::Config;
use casecheck_core::{RowOutcome, RunStatistics, TestCaseRecord};
use casecheck_io::{create_output_copy, CaseReader, ResultWriter, OUTPUT_DIR};

use crate::count::{self, Resolved, RowCount};
use crate::error::CliError;
use crate::{progress, report};

/// Pause between two analyzed rows.
pub const ROW_PAUSE: Duration = Duration::from_secs(1);

macro_rules! say {
    ($out:expr) => {{
        let _ = writeln!($out);
    }};
    ($out:expr, $($arg:tt)*) => {{
        let _ = writeln!($out, $($arg)*);
    }};
}

/// Per-run inputs that do not come from the configuration files.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory holding the configuration files; `output/` is created here.
    pub work_dir: PathBuf,
    /// Raw positional argument, if any.
    pub count_arg: Option<String>,
    pub row_pause: Duration,
}

impl RunOptions {
    pub fn new(work_dir: impl Into<PathBuf>, count_arg: Option<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            count_arg,
            row_pause: ROW_PAUSE,
        }
    }
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub output: PathBuf,
    pub outcomes: Vec<RowOutcome>,
    pub stats: RunStatistics,
}

/// Load configuration from `options.work_dir` and run against the
/// configured OpenAI-compatible endpoint.
pub fn run(options: &RunOptions, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<RunReport, CliError> {
    say!(out, "Loading configuration...");
    let config = Config::load(&options.work_dir)?;
    say!(out, "   Model: {}", config.model());
    say!(out, "   Max Tokens: {}", config.prompt.max_tokens);
    say!(out, "   API key: {}", config.key_source.as_str());
    say!(out);

    let client = OpenAiClient::new(config.base_url(), config.api_key.as_str())
        .map_err(|e| CliError::fatal(e.to_string()))?;
    let analyzer = Analyzer::new(client, config.model(), config.prompt.clone());

    execute(&config, &analyzer, options, input, out)
}

/// Everything after configuration loading, with the transport supplied.
pub fn execute<T: ChatTransport>(
    config: &Config,
    analyzer: &Analyzer<T>,
    options: &RunOptions,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<RunReport, CliError> {
    say!(out, "Preparing output file...");
    let mut writer = prepare_output(config, &options.work_dir, out)?;
    say!(out);

    say!(out, "Validating Excel structure...");
    let reader = CaseReader::new(&config.input_path, config.worksheet_index());
    let check = reader.validate_structure();
    if !check.valid {
        return Err(CliError::fatal(format!("validation failed: {}", check.message))
            .with_hint("check the test case sheet and WorksheetIndex in appsettings.json"));
    }
    say!(out, "   {}", check.message);
    say!(out, "   Source: {} (sheet {})", reader.path().display(), reader.sheet_index());
    say!(out);

    let available = reader.count_rows();
    if available == 0 {
        return Err(CliError::fatal("No test cases found in Excel file"));
    }

    let resolved = select_count(options.count_arg.as_deref(), available, input, out)?;
    let cases = select_cases(&reader, &resolved);
    say!(out);
    say!(out, "Analyzing with {}...", analyzer.model());

    let start = Local::now();
    let outcomes = process_rows(&cases, analyzer, &mut writer, options.row_pause, out);
    let end = Local::now();
    say!(out);
    say!(out, "   Analysis complete!");
    say!(out);

    write_summaries(&mut writer, &outcomes, start, end, out);
    say!(out);

    let elapsed = (end - start).to_std().unwrap_or_default();
    let stats = RunStatistics::compute(&outcomes, elapsed);
    say!(out, "{}", report::render_summary(&stats, writer.path()));

    Ok(RunReport {
        output: writer.path().to_path_buf(),
        outcomes,
        stats,
    })
}

/// Copy the input, rename the data sheet and add the verdict header.
///
/// The copy and the first load are fatal. Rename and header failures are
/// only warnings.
fn prepare_output(config: &Config, work_dir: &Path, out: &mut dyn Write) -> Result<ResultWriter, CliError> {
    let output_dir = work_dir.join(OUTPUT_DIR);
    let path = create_output_copy(&config.input_path, &output_dir, Local::now().naive_local())
        .map_err(|e| CliError::fatal(format!("could not create output file: {}", e)))?;
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    say!(out, "   Output file: {}", file_name);

    let mut writer = ResultWriter::open(&path, config.worksheet_index())?;
    match writer.rename_data_sheet() {
        Ok(()) => say!(out, "   Renamed sheet to '{}'", writer.data_sheet_name()),
        Err(e) => warn_write(out, "rename sheet", &e),
    }
    if let Err(e) = writer.write_header() {
        warn_write(out, "write header", &e);
    }
    Ok(writer)
}

/// Resolve the row count from the argument, or prompt for it.
fn select_count(
    arg: Option<&str>,
    available: usize,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<Resolved, CliError> {
    let (choice, from_argument) = match count::parse_argument(arg) {
        Some(choice) => (choice, true),
        None => {
            say!(out, "Found {} test cases in Excel.", available);
            let _ = write!(out, "   How many tests to analyze? (Enter number or press Enter for all): ");
            let _ = out.flush();
            let mut answer = String::new();
            input
                .read_line(&mut answer)
                .map_err(|e| CliError::fatal(format!("could not read answer: {}", e)))?;
            (count::parse_answer(&answer), false)
        }
    };

    let resolved = count::resolve(choice.clone(), available)?;
    match (resolved.rows, resolved.clamped_from) {
        (RowCount::First(n), Some(asked)) => {
            say!(out, "   Requested {} tests, but only {} exist.", asked, available);
            say!(out, "   Analyzing all {} tests instead...", n);
        }
        (RowCount::First(n), None) if from_argument => {
            say!(out, "Analyzing {} of {} test cases (from command line)...", n, available);
        }
        (RowCount::First(n), None) => say!(out, "   Analyzing {} of {} test cases...", n, available),
        (RowCount::All, _) => say!(out, "   Analyzing all test cases..."),
    }
    tracing::info!(?choice, ?resolved, "row count resolved");
    Ok(resolved)
}

/// Records on the selected rows, in row order. Rows without a record are
/// dropped here and never reach the analyzer or the output.
pub fn select_cases(reader: &CaseReader, resolved: &Resolved) -> Vec<(u32, TestCaseRecord)> {
    resolved
        .row_numbers(reader.last_row())
        .filter_map(|row| reader.read_row(row).map(|record| (row, record)))
        .collect()
}

/// Analyze each case in order, writing every verdict before the next case
/// starts.
pub fn process_rows<T: ChatTransport>(
    cases: &[(u32, TestCaseRecord)],
    analyzer: &Analyzer<T>,
    writer: &mut ResultWriter,
    row_pause: Duration,
    out: &mut dyn Write,
) -> Vec<RowOutcome> {
    let started = Instant::now();
    let total = cases.len();
    let mut outcomes = Vec::with_capacity(total);

    for (i, (row, record)) in cases.iter().enumerate() {
        let line = progress::render(i + 1, total, &record.id, started.elapsed());
        let _ = write!(out, "\r{}   ", line);
        let _ = out.flush();

        let outcome = analyzer.analyze(record);
        if let Err(e) = writer.write_result(*row, &outcome.verdict) {
            let _ = writeln!(out);
            warn_write(out, &format!("write row {}", row), &e);
        }
        outcomes.push(RowOutcome {
            row: *row,
            test_id: record.id.clone(),
            outcome,
        });

        if i + 1 < total && !row_pause.is_zero() {
            thread::sleep(row_pause);
        }
    }

    outcomes
}

fn write_summaries(
    writer: &mut ResultWriter,
    outcomes: &[RowOutcome],
    start: chrono::DateTime<Local>,
    end: chrono::DateTime<Local>,
    out: &mut dyn Write,
) {
    say!(out, "Creating Quality Issues Summary...");
    match writer.write_issues_summary(outcomes) {
        Ok(()) => say!(out, "   Created '{}' sheet", casecheck_io::ISSUES_SHEET_NAME),
        Err(e) => warn_write(out, "create issues sheet", &e),
    }

    say!(out, "Creating Statistics Dashboard...");
    match writer.write_statistics_dashboard(outcomes, start, end) {
        Ok(()) => say!(out, "   Created '{}' sheet", casecheck_io::STATS_SHEET_NAME),
        Err(e) => warn_write(out, "create statistics sheet", &e),
    }
}

fn warn_write(out: &mut dyn Write, what: &str, err: &casecheck_io::IoError) {
    tracing::warn!(error = %err, "could not {}", what);
    say!(out, "   warning: could not {}: {}", what, err);
}
