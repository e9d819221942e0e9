//! CLI command definitions and handlers.

use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, eyre};
use smoke_common::ContainerName;

use crate::runtime::{DEFAULT_IMAGE_TAG, DockerRuntime, HarnessConfig};
use crate::suite::{Check, Report, Suite};

/// Smoke - start a container image and check it runs and exits cleanly
#[derive(Parser)]
#[command(name = "smoke")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Smoke commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the checks against a fresh container
    Run(RunArgs),

    /// List the available checks
    List,
}

/// Output formats for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One line per check plus a summary.
    Text,
    /// The full report as JSON.
    Json,
}

/// Options for `smoke run`.
#[derive(Debug, clap::Args)]
pub struct RunArgs {
    /// Image tag to test
    #[arg(long, env = "SMOKE_IMAGE_TAG", default_value = DEFAULT_IMAGE_TAG)]
    pub image_tag: String,

    /// Name given to the container
    #[arg(long, default_value = ContainerName::DEFAULT)]
    pub name: ContainerName,

    /// Run slow checks
    #[arg(long = "run-slow", alias = "runslow")]
    pub run_slow: bool,

    /// Only run these checks (repeatable)
    #[arg(long = "check", value_enum)]
    pub checks: Vec<Check>,

    /// Status refreshes allowed while the container is still created
    #[arg(long, default_value_t = 10)]
    pub max_attempts: u32,

    /// Seconds between status refreshes
    #[arg(long, default_value_t = 1.0)]
    pub poll_interval: f64,

    /// Give up waiting for the container to exit after this many seconds
    #[arg(long)]
    pub exit_timeout: Option<u64>,

    /// Wrap each check in a GitHub Actions log group
    #[arg(
        long,
        env = "GITHUB_ACTIONS",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub github_groups: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: Format,
}

impl RunArgs {
    /// Harness configuration described by these options.
    pub fn config(&self) -> Result<HarnessConfig> {
        let poll_interval = Duration::try_from_secs_f64(self.poll_interval)
            .map_err(|e| eyre!("Invalid poll interval {}: {}", self.poll_interval, e))?;

        let config = HarnessConfig::default()
            .with_image_tag(self.image_tag.clone())
            .with_container_name(self.name.clone())
            .with_max_attempts(self.max_attempts)
            .with_poll_interval(poll_interval)
            .with_run_slow(self.run_slow)
            .with_log_groups(self.github_groups);

        Ok(match self.exit_timeout {
            Some(secs) => config.with_exit_timeout(Duration::from_secs(secs)),
            None => config,
        })
    }
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run(args) => {
                let suite = Suite::new(args.config()?).with_checks(args.checks.iter().copied());

                // One client for the whole run, passed down explicitly.
                let runtime = DockerRuntime::connect()
                    .map_err(|e| eyre!("Failed to connect to Docker: {}", e))?;

                let report = suite
                    .run(&runtime)
                    .await
                    .map_err(|e| eyre!("Failed to run container {}: {}", args.image_tag, e))?;

                print_report(&report, args.format)?;

                if report.is_success() {
                    Ok(())
                } else {
                    Err(eyre!(
                        "{} check(s) failed against {}",
                        report.failed() + report.errored(),
                        report.image_tag
                    ))
                }
            }

            Commands::List => {
                println!("CHECK\tSLOW\tDESCRIPTION");
                for check in Check::ALL {
                    println!(
                        "{}\t{}\t{}",
                        check,
                        if check.is_slow() { "yes" } else { "no" },
                        check.description()
                    );
                }
                Ok(())
            }
        }
    }
}

fn print_report(report: &Report, format: Format) -> Result<()> {
    match format {
        Format::Text => println!("{report}"),
        Format::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
