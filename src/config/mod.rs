//! Configuration types.
//!
//! [`file`] holds the optional TOML config file, [`check`] the resolved,
//! immutable configuration of a single check invocation.

pub mod check;
pub mod file;

pub use check::{
    CheckConfig, CheckTarget, DEFAULT_S3_REGION, GcsOptions, Provider, S3Options, Thresholds,
};
pub use file::FileConfig;
