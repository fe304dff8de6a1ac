//! # check-bucket-size
//!
//! A monitoring check plugin that measures the total size of the objects under
//! a prefix in an Amazon S3 or Google Cloud Storage bucket and reports OK,
//! WARNING, CRITICAL or UNKNOWN in the Nagios/Icinga/Sensu plugin convention.
//!
//! ## Pipeline
//!
//! 1. [`source`] lists the bucket and sums the object sizes.
//! 2. [`evaluator`] compares the total against the configured thresholds.
//! 3. [`status`] renders the single status line and maps it to an exit code.
//!
//! Threshold strings are parsed by [`utils::parse_size`] and the resolved
//! settings live in [`config::CheckConfig`].

pub mod config;
pub mod evaluator;
pub mod source;
pub mod status;
pub mod utils;

pub use config::{CheckConfig, CheckTarget, Provider, Thresholds};
pub use evaluator::{collect_size, evaluate, run_check};
pub use source::{BucketSource, ObjectSizeSource};
pub use status::{CheckOutput, Status};
