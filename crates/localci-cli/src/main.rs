//! local-ci - run a CI definition on this machine
//!
//! Reads a GitLab-style or GitHub-style YAML file and runs every step in
//! order through the shell, redrawing a progress view before each one.
//!
//! ## Exit codes
//!
//! - `0`: every executed step passed
//! - `1`: missing file, unsupported type, parse error or failed step

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::Level;

use localci::{parse_file, Dialect, Executor, RunOptions, SkipSet};

#[derive(Parser, Debug)]
#[command(name = "local-ci")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run GitLab / GitHub CI pipelines locally", long_about = None)]
struct Cli {
    /// CI type: gitlab or github
    #[arg(short = 't', long = "type", default_value = "gitlab")]
    ci_type: String,

    /// Path to the CI configuration file
    #[arg(short, long, default_value = "")]
    file: String,

    /// Comma-separated list of stages to skip
    #[arg(short, long, default_value = "")]
    skip: String,

    /// Shell used to run each step as `<shell> -c <command>`
    #[arg(long, env = "LOCAL_CI_SHELL", default_value = "sh")]
    shell: String,

    /// Pause after each successful step, in milliseconds
    #[arg(long, env = "LOCAL_CI_STEP_DELAY_MS", default_value_t = 500)]
    step_delay_ms: u64,

    /// Print the parsed pipeline as JSON and exit without running it
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            shell: self.shell.clone(),
            step_delay: Duration::from_millis(self.step_delay_ms),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    localci::init_tracing(cli.json, level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.file.is_empty() {
        anyhow::bail!("Please specify a CI configuration file using the --file flag.");
    }

    let dialect: Dialect = cli
        .ci_type
        .parse()
        .context("Unsupported CI type. Please use 'gitlab' or 'github'.")?;

    let pipeline = parse_file(dialect, Path::new(&cli.file))
        .context("Error parsing CI configuration")?;

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&pipeline)?);
        return Ok(());
    }

    let skip = SkipSet::parse(&cli.skip);
    let mut executor = Executor::new(cli.run_options(), std::io::stdout());
    executor
        .run(&pipeline, &skip)
        .await
        .context("Pipeline failed")?;

    Ok(())
}
