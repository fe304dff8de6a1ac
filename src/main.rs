//! # check-bucket-size
//!
//! A monitoring check plugin that alerts on the total size of the objects
//! under a prefix in an Amazon S3 or Google Cloud Storage bucket.
//!
//! The plugin prints a single `Check <STATUS>: <message>` line and exits with
//! the matching code: 0 (OK), 1 (WARNING), 2 (CRITICAL) or 3 (UNKNOWN).
//!
//! ## Usage
//!
//! ```bash
//! # Warn below 1 MiB, go critical above 20 GiB
//! check-bucket-size -provider s3 -bucket backups -prefix db/ -min-warn 1M -max-crit 20G
//!
//! # Trace every object that is counted
//! check-bucket-size -provider gs -bucket assets -debug
//! ```

mod cli;

use std::process::exit;

use anyhow::anyhow;
use check_bucket_size::{
    BucketSource, CheckConfig, CheckOutput, Status, config::FileConfig, evaluate, run_check,
};
use clap::CommandFactory;
use cli::Cli;
use colored::Colorize;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::SubscriberInitExt;

/// Entry point for the check-bucket-size plugin.
///
/// Configuration problems print the usage text and exit CRITICAL. Every other
/// outcome, including a failed listing, goes through [`CheckOutput`] so the
/// monitoring system always reads one well-formed status line.
fn main() {
    let args = match cli::parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => {
            // A closed stderr must not change the exit status.
            err.print().ok();
            exit(cli::parse_error_status(&err).exit_code());
        }
    };

    if args.print_version() {
        println!("{}", cli::version_line());
        exit(Status::Ok.exit_code());
    }

    let file_config = load_config(&args);
    let config = match args.check_config(&file_config) {
        Ok(config) => config,
        Err(err) => usage_error(&err),
    };

    if config.debug {
        init_tracing();
    }

    let output = execute(&config);
    print!("{}", output.render());
    exit(output.exit_code());
}

/// Print a configuration error and the usage text, then exit CRITICAL.
fn usage_error(err: &anyhow::Error) -> ! {
    println!("{err:#}");
    eprintln!("{}", Cli::command().render_help());
    exit(cli::USAGE_ERROR_STATUS.exit_code());
}

/// Load the configuration file.
///
/// A file given with `--config` must load. Problems with the default location
/// only produce a warning and defaults are used.
fn load_config(args: &Cli) -> FileConfig {
    if let Some(path) = args.config_file() {
        return FileConfig::load_from(path).unwrap_or_else(|err| usage_error(&err));
    }

    FileConfig::load().unwrap_or_else(|e| {
        eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
        FileConfig::default()
    })
}

/// Send the per-object debug trace to stdout.
fn init_tracing() {
    debug_subscriber(std::io::stdout).init();
}

/// Subscriber for the `-debug` trace.
///
/// Only this crate's debug events are shown, as bare lines without span
/// context; HTTP and SDK internals stay quiet.
fn debug_subscriber<W>(writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::new("check_bucket_size=debug"))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .without_time()
        .with_span_events(FmtSpan::NONE)
        .finish()
}

/// Measure the configured target on a single-threaded runtime.
fn execute(config: &CheckConfig) -> CheckOutput {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            return evaluate(
                Err(anyhow!("Failed to start async runtime: {err}")),
                &config.thresholds,
                &config.target,
            );
        }
    };

    let source = BucketSource::from_config(config);
    runtime.block_on(run_check(&source, config))
}
