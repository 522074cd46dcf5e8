// casecheck - AI quality review for spreadsheet test cases

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use casecheck_cli::exit_codes::EXIT_SUCCESS;
use casecheck_cli::{run, CliError, RunOptions};

#[derive(Parser)]
#[command(name = "casecheck")]
#[command(about = "Review spreadsheet test cases with an LLM and write the verdicts to a new workbook")]
#[command(long_version = long_version())]
#[command(version)]
#[command(allow_negative_numbers = true)]
#[command(after_help = "\
Reads appsettings.json and PromptConfig.json from the current directory.
Results are written to output/analysis_results_<timestamp>.xlsx.

Examples:
  casecheck          prompt for the number of tests
  casecheck 25       analyze the first 25 test cases")]
struct Cli {
    /// Number of test cases to analyze (prompted for when omitted or not a number)
    count: Option<String>,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    println!("===============================================");
    println!("casecheck - AI Test Suite Analyzer");
    println!("===============================================");
    println!();

    let result = match std::env::current_dir() {
        Ok(dir) => {
            let options = RunOptions::new(dir, cli.count);
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut out = io::stdout();
            run(&options, &mut input, &mut out).map(|_| ())
        }
        Err(e) => Err(CliError::fatal(format!("cannot determine working directory: {}", e))),
    };

    let code = match result {
        Ok(()) => EXIT_SUCCESS,
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            code
        }
    };

    wait_for_enter();
    ExitCode::from(code)
}

/// Keep a double-clicked console window open. Skipped when stdin is piped.
fn wait_for_enter() {
    if !atty::is(atty::Stream::Stdin) {
        return;
    }
    println!();
    print!("Press Enter to exit...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
