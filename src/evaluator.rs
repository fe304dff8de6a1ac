//! Threshold evaluation.
//!
//! This module turns a collected bucket size into a [`CheckOutput`]. The
//! thresholds are checked in a fixed order and the first breach wins, so a
//! breached warning threshold is reported even when a critical threshold is
//! breached too. Monitoring setups rely on this order; it is not "most severe
//! wins".

use anyhow::{Result, anyhow};

use crate::config::{CheckConfig, CheckTarget, Thresholds};
use crate::source::ObjectSizeSource;
use crate::status::{CheckOutput, Status};

/// Which side of a threshold counts as a breach.
#[derive(Clone, Copy, Debug)]
enum Bound {
    Min,
    Max,
}

impl Bound {
    const fn is_breached(self, size: u64, limit: u64) -> bool {
        match self {
            Self::Min => size < limit,
            Self::Max => size > limit,
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Self::Min => "too small",
            Self::Max => "too big",
        }
    }
}

/// Evaluate a collection result against the thresholds.
///
/// Order, first match wins:
/// 1. collection failed → UNKNOWN
/// 2. below `min_warn` → WARNING
/// 3. above `max_warn` → WARNING
/// 4. below `min_crit` → CRITICAL
/// 5. above `max_crit` → CRITICAL
/// 6. otherwise → OK
#[must_use]
pub fn evaluate(
    collected: Result<u64>,
    thresholds: &Thresholds,
    target: &CheckTarget,
) -> CheckOutput {
    let size = match collected {
        Ok(size) => size,
        Err(err) => {
            return CheckOutput::new(
                Status::Unknown,
                format!("Unable to list contents of bucket {}", target.bucket_url()),
            )
            .with_detail(format!("{err:#}"));
        }
    };

    let rules = [
        (Status::Warning, Bound::Min, thresholds.min_warn),
        (Status::Warning, Bound::Max, thresholds.max_warn),
        (Status::Critical, Bound::Min, thresholds.min_crit),
        (Status::Critical, Bound::Max, thresholds.max_crit),
    ];

    rules
        .into_iter()
        .find_map(|(status, bound, limit)| {
            limit
                .filter(|&limit| bound.is_breached(size, limit))
                .map(|_| {
                    CheckOutput::new(
                        status,
                        format!("Contents {}: {target}", bound.description()),
                    )
                })
        })
        .unwrap_or_else(|| CheckOutput::new(Status::Ok, "OK"))
}

/// Collect the size of the configured target, bounded by the configured
/// timeout.
///
/// # Errors
///
/// Returns an error if the source fails or the timeout elapses first.
pub async fn collect_size<S>(source: &S, config: &CheckConfig) -> Result<u64>
where
    S: ObjectSizeSource + Sync + ?Sized,
{
    let target = &config.target;
    let listing = source.total_size(&target.bucket, &target.prefix);

    match config.timeout {
        Some(limit) => tokio::time::timeout(limit, listing)
            .await
            .map_err(|_| anyhow!("Listing timed out after {}s", limit.as_secs()))?,
        None => listing.await,
    }
}

/// Run a full check: collect the size from `source` and evaluate it.
pub async fn run_check<S>(source: &S, config: &CheckConfig) -> CheckOutput
where
    S: ObjectSizeSource + Sync + ?Sized,
{
    let collected = collect_size(source, config).await;
    evaluate(collected, &config.thresholds, &config.target)
}
