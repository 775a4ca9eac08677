//! emx-shelltest CLI
//!
//! Run shell-command testcases from spec files (or stdin).

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use emx_shelltest::{runner, run_selftest, Engine};

#[derive(Parser, Debug)]
#[command(name = "emx-shelltest")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(version)]
#[command(about = "Run shell-command testcases from spec files")]
struct Cli {
    /// Spec files to run; reads stdin when none are given
    files: Vec<PathBuf>,

    /// Change into each spec file's directory while running it
    #[arg(short = 'C', long = "chdir")]
    change_dir: bool,

    /// Ignore output lines starting with '#' or 'DEBUG:' when comparing
    #[arg(short = 'D', long = "filter-debug")]
    filter_debug: bool,

    /// Run the built-in self-test instead of spec files
    #[arg(short = 'T', long = "self-test")]
    self_test: bool,

    /// Internal debug tracing on stderr
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Verbose output: report passing testcases and echo comments
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.self_test {
        let engine = Engine { verbose: cli.verbose, ..Engine::new() };
        return run_selftest(&engine, cli.verbose, &mut out).context("self-test aborted");
    }

    let runner = runner()
        .change_dir(cli.change_dir)
        .filter_debug(cli.filter_debug)
        .verbose(cli.verbose)
        .build();

    let mut err = std::io::stderr();
    let totals = runner
        .run_all(&cli.files, &mut out, &mut err)
        .context("run aborted")?;
    Ok(totals.all_passed())
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .with_env_filter(filter)
        .init();
}
