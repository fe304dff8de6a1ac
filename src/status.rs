//! Check status and the plugin output contract.
//!
//! A monitoring system reads exactly one line, `Check <STATUS>: <message>`,
//! and the process exit code. This module builds that output without
//! printing or exiting so the result of a check can be inspected in tests;
//! the binary performs the single print-and-exit at the top level.

use std::fmt;

/// Result of a check, ordered by severity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Status {
    /// Everything within thresholds
    Ok,

    /// A warning threshold was breached
    Warning,

    /// A critical threshold was breached, or the configuration is invalid
    Critical,

    /// The bucket could not be listed
    Unknown,
}

impl Status {
    /// Process exit code for this status (0, 1, 2 or 3).
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }

    /// Upper-case label used in the status line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The outcome of one check invocation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CheckOutput {
    /// Reported status
    pub status: Status,

    /// Text after `Check <STATUS>: `
    pub message: String,

    /// Optional second output line
    pub detail: Option<String>,
}

impl CheckOutput {
    /// Create an output with no detail line.
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    /// Attach a detail line printed after the status line.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Render the plugin output, including trailing newlines.
    ///
    /// An empty detail is not printed.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("Check {}: {}\n", self.status, self.message);
        if let Some(detail) = self.detail.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(detail);
            out.push('\n');
        }
        out
    }

    /// Exit code matching the reported status.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_match_ordinals() {
        assert_eq!(Status::Ok.exit_code(), 0);
        assert_eq!(Status::Warning.exit_code(), 1);
        assert_eq!(Status::Critical.exit_code(), 2);
        assert_eq!(Status::Unknown.exit_code(), 3);
    }

    #[test]
    fn test_status_severity_order() {
        assert!(Status::Ok < Status::Warning);
        assert!(Status::Warning < Status::Critical);
        assert!(Status::Critical < Status::Unknown);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::Ok.to_string(), "OK");
        assert_eq!(Status::Warning.to_string(), "WARNING");
        assert_eq!(Status::Critical.to_string(), "CRITICAL");
        assert_eq!(Status::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_render_single_line() {
        let output = CheckOutput::new(Status::Ok, "OK");
        assert_eq!(output.render(), "Check OK: OK\n");
        assert_eq!(output.exit_code(), 0);
    }

    #[test]
    fn test_render_with_detail() {
        let output = CheckOutput::new(Status::Unknown, "Unable to list contents of bucket s3://b")
            .with_detail("access denied");

        assert_eq!(
            output.render(),
            "Check UNKNOWN: Unable to list contents of bucket s3://b\naccess denied\n"
        );
        assert_eq!(output.exit_code(), 3);
    }

    #[test]
    fn test_render_skips_empty_detail() {
        let output = CheckOutput::new(Status::Warning, "Contents too big: gs://b/p").with_detail("");
        assert_eq!(output.render(), "Check WARNING: Contents too big: gs://b/p\n");
    }
}
