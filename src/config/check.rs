//! Resolved check configuration.
//!
//! This module defines the immutable configuration a check runs with. It is
//! built once at startup from CLI arguments layered over the config file and
//! then passed by reference to the collector and the evaluator.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

/// Region used for S3 when neither the CLI nor the config file sets one.
pub const DEFAULT_S3_REGION: &str = "eu-west-1";

/// Supported object storage providers.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum Provider {
    /// Amazon S3 (or an S3-compatible service)
    S3,

    /// Google Cloud Storage
    #[value(name = "gs")]
    Gcs,
}

impl Provider {
    /// URL scheme used in check messages.
    #[must_use]
    pub const fn scheme(self) -> &'static str {
        match self {
            Self::S3 => "s3",
            Self::Gcs => "gs",
        }
    }
}

/// The four size thresholds, in bytes. `None` means unset.
///
/// No relationship between the values is enforced; each one is checked on
/// its own.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Thresholds {
    /// Warn when the size is below this value
    pub min_warn: Option<u64>,

    /// Warn when the size is above this value
    pub max_warn: Option<u64>,

    /// Go critical when the size is below this value
    pub min_crit: Option<u64>,

    /// Go critical when the size is above this value
    pub max_crit: Option<u64>,
}

/// What is being measured: a prefix inside a bucket of a given provider.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CheckTarget {
    /// Storage provider
    pub provider: Provider,

    /// Bucket name
    pub bucket: String,

    /// Key prefix, empty for the whole bucket
    pub prefix: String,
}

impl CheckTarget {
    /// Bucket URL, e.g. `s3://my-bucket`.
    #[must_use]
    pub fn bucket_url(&self) -> String {
        format!("{}://{}", self.provider.scheme(), self.bucket)
    }
}

impl fmt::Display for CheckTarget {
    /// Formats as `<scheme>://<bucket>/<prefix>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}/{}",
            self.provider.scheme(),
            self.bucket,
            self.prefix
        )
    }
}

/// S3 connection settings.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct S3Options {
    /// AWS region
    pub region: String,

    /// Custom endpoint for S3-compatible services
    pub endpoint: Option<String>,
}

impl Default for S3Options {
    fn default() -> Self {
        Self {
            region: DEFAULT_S3_REGION.to_string(),
            endpoint: None,
        }
    }
}

/// Google Cloud Storage connection settings.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct GcsOptions {
    /// Path to a service-account JSON key; application default credentials
    /// are used when unset
    pub service_account: Option<PathBuf>,
}

/// Everything one check invocation needs.
#[derive(Clone, Debug)]
pub struct CheckConfig {
    /// Bucket and prefix to measure
    pub target: CheckTarget,

    /// Size thresholds
    pub thresholds: Thresholds,

    /// Whether to trace every listed object
    pub debug: bool,

    /// Upper bound for the listing, `None` to wait indefinitely
    pub timeout: Option<Duration>,

    /// S3 settings, used when the provider is S3
    pub s3: S3Options,

    /// GCS settings, used when the provider is GCS
    pub gcs: GcsOptions,
}
