//! Utility functions and helpers.
//!
//! This module contains utility functions used throughout the application,
//! such as threshold size parsing.

pub mod size;

pub use size::parse_size;
