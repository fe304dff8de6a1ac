//! Command-line interface definition and argument parsing.
//!
//! This module defines all command-line arguments using the
//! [clap](https://docs.rs/clap/) library and resolves them, together with the
//! config file, into a [`CheckConfig`].
//!
//! Monitoring configurations pass flags in the single-dash form
//! (`-bucket foo -max-crit 10G`). [`normalize_args`] rewrites known long flags
//! to the double-dash form before clap sees them, so both spellings work.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};

use check_bucket_size::config::file::{FileConfig, expand_tilde};
use check_bucket_size::config::{
    CheckConfig, CheckTarget, DEFAULT_S3_REGION, GcsOptions, Provider, S3Options, Thresholds,
};
use check_bucket_size::utils::parse_size;
use check_bucket_size::utils::size::UNSET;
use check_bucket_size::Status;

/// Exit status for configuration errors (bad flags, missing bucket or
/// provider, malformed sizes).
pub const USAGE_ERROR_STATUS: Status = Status::Critical;

/// Long flags that may also be written with a single leading dash.
const LONG_FLAGS: &[&str] = &[
    "bucket",
    "prefix",
    "provider",
    "min-warn",
    "max-warn",
    "min-crit",
    "max-crit",
    "debug",
    "region",
    "endpoint",
    "service-account",
    "timeout",
    "config",
    "help",
];

/// Size thresholds, as given on the command line.
///
/// Every value accepts a byte count or a count with a `k`, `M` or `G` suffix
/// (powers of 1024). `-1` leaves the threshold unset.
#[derive(Parser)]
struct ThresholdArgs {
    /// Minimum size for warning, in bytes or with k/M/G suffix
    #[arg(long, value_name = "SIZE", default_value = UNSET, allow_hyphen_values = true)]
    min_warn: String,

    /// Maximum size for warning, in bytes or with k/M/G suffix
    #[arg(long, value_name = "SIZE", default_value = UNSET, allow_hyphen_values = true)]
    max_warn: String,

    /// Minimum size for critical, in bytes or with k/M/G suffix
    #[arg(long, value_name = "SIZE", default_value = UNSET, allow_hyphen_values = true)]
    min_crit: String,

    /// Maximum size for critical, in bytes or with k/M/G suffix
    #[arg(long, value_name = "SIZE", default_value = UNSET, allow_hyphen_values = true)]
    max_crit: String,
}

/// Provider connection settings.
///
/// These override the corresponding config file values.
#[derive(Parser)]
struct ConnectionArgs {
    /// AWS region for S3 (default: eu-west-1)
    #[arg(long)]
    region: Option<String>,

    /// Endpoint of an S3-compatible service (e.g. http://localhost:9000)
    #[arg(long)]
    endpoint: Option<String>,

    /// Path to a GCS service-account JSON key
    #[arg(long)]
    service_account: Option<PathBuf>,

    /// Give up listing the bucket after this many seconds (0 waits forever)
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,
}

/// Main command-line interface structure.
///
/// Helper methods accept a [`FileConfig`] reference so that config-file values act as
/// defaults when the corresponding CLI argument is not provided.
#[derive(Parser)]
#[command(name = "check-bucket-size")]
#[command(
    about = "Check the total size of the objects under a prefix in an S3 or GCS bucket (Nagios/Icinga/Sensu plugin)"
)]
#[command(disable_version_flag = true)]
#[command(author)]
pub struct Cli {
    /// Bucket name
    #[arg(long)]
    bucket: Option<String>,

    /// Prefix in the bucket; empty matches every object
    #[arg(long, allow_hyphen_values = true)]
    prefix: Option<String>,

    /// 's3' for Amazon S3 or 'gs' for Google Cloud Storage
    #[arg(long, value_enum)]
    provider: Option<Provider>,

    /// Show debug output (`-debug`, `-debug=true` or `-debug=false`)
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    debug: bool,

    /// Print version and exit
    #[arg(short = 'V')]
    version: bool,

    /// Read defaults from this config file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Threshold options
    #[command(flatten)]
    thresholds: ThresholdArgs,

    /// Connection options
    #[command(flatten)]
    connection: ConnectionArgs,
}

impl Cli {
    /// Whether `-V` was given.
    #[must_use]
    pub const fn print_version(&self) -> bool {
        self.version
    }

    /// Explicit config file path given with `--config`.
    #[must_use]
    pub fn config_file(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Resolve the check configuration from CLI args and config file.
    ///
    /// Validation happens in the same order as the usage errors are reported:
    /// bucket, then provider, then each threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket is missing, no valid provider is set on
    /// the command line or in the config file, or a threshold is not a valid
    /// size.
    pub fn check_config(&self, config: &FileConfig) -> Result<CheckConfig> {
        let Some(bucket) = self.bucket.clone().filter(|b| !b.is_empty()) else {
            bail!("-bucket is required");
        };

        let Some(provider) = self.provider(config) else {
            bail!("-provider is required");
        };

        Ok(CheckConfig {
            target: CheckTarget {
                provider,
                bucket,
                prefix: self.prefix.clone().unwrap_or_default(),
            },
            thresholds: self.thresholds()?,
            debug: self.debug,
            timeout: self.timeout(config),
            s3: self.s3_options(config),
            gcs: self.gcs_options(config),
        })
    }

    /// Provider from CLI args or config file.
    ///
    /// Priority: CLI argument > config file. An unrecognised config file value
    /// counts as unset.
    fn provider(&self, config: &FileConfig) -> Option<Provider> {
        self.provider.or_else(|| {
            config
                .provider
                .as_ref()
                .and_then(|s| Provider::from_str(s, true).ok())
        })
    }

    /// Parse the four threshold arguments.
    fn thresholds(&self) -> Result<Thresholds> {
        let args = &self.thresholds;

        Ok(Thresholds {
            min_warn: parse_threshold("-min-warn", &args.min_warn)?,
            max_warn: parse_threshold("-max-warn", &args.max_warn)?,
            min_crit: parse_threshold("-min-crit", &args.min_crit)?,
            max_crit: parse_threshold("-max-crit", &args.max_crit)?,
        })
    }

    /// Listing timeout. Priority: CLI > config file > none. Zero means none.
    fn timeout(&self, config: &FileConfig) -> Option<Duration> {
        self.connection
            .timeout
            .or(config.timeout)
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    /// S3 settings. Priority: CLI > config file > default region.
    fn s3_options(&self, config: &FileConfig) -> S3Options {
        S3Options {
            region: self
                .connection
                .region
                .clone()
                .or_else(|| config.s3.region.clone())
                .unwrap_or_else(|| DEFAULT_S3_REGION.to_string()),
            endpoint: self
                .connection
                .endpoint
                .clone()
                .or_else(|| config.s3.endpoint.clone()),
        }
    }

    /// GCS settings. Tilde expansion applies to the config file path.
    fn gcs_options(&self, config: &FileConfig) -> GcsOptions {
        GcsOptions {
            service_account: self.connection.service_account.clone().or_else(|| {
                config
                    .gcs
                    .service_account
                    .as_deref()
                    .map(expand_tilde)
            }),
        }
    }
}

/// Parse the process arguments, accepting single-dash long flags.
///
/// # Errors
///
/// Returns the clap error for unknown flags, invalid values, or when help was
/// requested.
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    Cli::try_parse_from(normalize_args(args))
}

/// Exit status after clap rejected or answered the command line itself.
///
/// Help output is not an error and exits OK; everything else is a usage error.
#[must_use]
pub fn parse_error_status(err: &clap::Error) -> Status {
    if err.use_stderr() {
        USAGE_ERROR_STATUS
    } else {
        Status::Ok
    }
}

/// The line printed for `-V`.
#[must_use]
pub fn version_line() -> String {
    format!("Version: {}", env!("CARGO_PKG_VERSION"))
}

fn parse_threshold(flag: &str, value: &str) -> Result<Option<u64>> {
    parse_size(value).with_context(|| format!("{flag}: invalid value"))
}

/// Rewrite single-dash long flags (`-bucket`, `-min-warn=1G`) to their
/// double-dash form. Everything after a bare `--` is left untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;

    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(idx, arg)| {
            if idx == 0 || passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            match arg.to_str() {
                Some(s) if is_single_dash_long_flag(s) => OsString::from(format!("-{s}")),
                _ => arg,
            }
        })
        .collect()
}

fn is_single_dash_long_flag(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    LONG_FLAGS.contains(&name)
}
