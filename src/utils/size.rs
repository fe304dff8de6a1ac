//! Size parsing utilities.
//!
//! This module parses the threshold strings accepted on the command line
//! (like "500", "10k" or "2G") into byte values.

use anyhow::{Result, anyhow};
use regex::Regex;

/// Threshold value meaning "not configured".
pub const UNSET: &str = "-1";

/// Full-string pattern for a size: digits with an optional binary unit letter.
const SIZE_PATTERN: &str = r"^([0-9]+)([kMG]?)$";

/// Parse a threshold size string into bytes.
///
/// Units are single case-sensitive letters with binary multipliers. The empty
/// string and `"-1"` mean the threshold is unset.
///
/// # Arguments
///
/// * `input` - A size such as `"1024"`, `"100k"`, `"5M"` or `"2G"`
///
/// # Returns
///
/// - `Ok(Some(u64))` - The size in bytes
/// - `Ok(None)` - The threshold is unset (`""` or `"-1"`)
///
/// # Errors
///
/// This function will return an error if:
/// - The input is not a plain non-negative integer with an optional unit
/// - The unit letter is anything other than `k`, `M` or `G`
/// - The resulting value would overflow `u64`
///
/// # Supported Units
///
/// - **k**: 1024
/// - **M**: 1024²
/// - **G**: 1024³
/// - **Bytes**: Plain numbers without units
pub fn parse_size(input: &str) -> Result<Option<u64>> {
    if input.is_empty() || input == UNSET {
        return Ok(None);
    }

    let pattern = Regex::new(SIZE_PATTERN)?;
    let captures = pattern
        .captures(input)
        .ok_or_else(|| anyhow!("invalid size: {input:?}"))?;

    let number: u64 = captures[1]
        .parse()
        .map_err(|e| anyhow!("invalid size: {input:?}: {e}"))?;
    let multiplier = unit_multiplier(&captures[2])
        .ok_or_else(|| anyhow!("invalid size: {input:?}: unknown unit"))?;

    number
        .checked_mul(multiplier)
        .map(Some)
        .ok_or_else(|| anyhow!("invalid size: {input:?}: value overflows"))
}

/// Multiplier for a unit suffix, `None` if the suffix is not a known unit.
fn unit_multiplier(unit: &str) -> Option<u64> {
    match unit {
        "" => Some(1),
        "k" => Some(1024),
        "M" => Some(1024 * 1024),
        "G" => Some(1024 * 1024 * 1024),
        _ => None,
    }
}
