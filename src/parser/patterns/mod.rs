//! Line-oriented text-pattern extractors.
//!
//! These run when structural extraction is unavailable or inconclusive.
//! Every pattern table is compiled once on first use and shared read-only
//! across threads.

pub mod java;
pub mod javascript;
pub mod python;

use regex::Regex;

/// Compile one of the literal pattern tables below.
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid endpoint pattern")
}

/// Split on `\n` and pair each line with its 1-indexed number.
pub(crate) fn numbered_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content.split('\n').enumerate().map(|(i, line)| (i + 1, line))
}
