//! # Number Patterns Module
//!
//! This module contains the ordered regex pattern set used for phone number
//! detection. Patterns are kept as independent matchers, most-specific-first,
//! so a structured match (e.g. a parenthesized number) is recorded before a
//! looser catch-all re-captures a substring of it; the canonicalize-and-dedupe
//! stage collapses any remaining overlap. Regional formats evolve
//! independently, so these are deliberately not merged into one expression.

use lazy_static::lazy_static;
use regex::Regex;

/// National 11-digit mobile format with operator prefix (e.g. 01712345678)
pub const BD_MOBILE: &str = r"01[3-9]\d{8}";

/// International format with a leading + and country code (e.g. +8801712345678)
pub const INTERNATIONAL: &str = r"\+\d{11,14}";

/// Parenthesized area-code format (e.g. (123) 456-7890)
pub const AREA_CODE: &str = r"\(\d{3}\) \d{3}-\d{4}";

/// Hyphen, space or dot separated local format (e.g. 123-456-7890, 123 456 7890)
pub const SEPARATED_LOCAL: &str = r"\d{3}[-. ]\d{3}[-. ]\d{4}";

/// Bare 10-digit run, word-bounded so substrings of longer runs don't match
pub const BARE_TEN: &str = r"\b\d{10}\b";

/// Bare 11-digit run, word-bounded
pub const BARE_ELEVEN: &str = r"\b\d{11}\b";

/// Long digit run catch-all (8-15 digits)
pub const DIGIT_RUN: &str = r"\b\d{8,15}\b";

/// Pattern set in priority order, each tagged with a stable name
pub const PATTERN_SET: &[(&str, &str)] = &[
    ("bd-mobile", BD_MOBILE),
    ("international", INTERNATIONAL),
    ("area-code", AREA_CODE),
    ("separated-local", SEPARATED_LOCAL),
    ("bare-10", BARE_TEN),
    ("bare-11", BARE_ELEVEN),
    ("digit-run", DIGIT_RUN),
];

// Compiled once; every pattern in PATTERN_SET is a valid expression
lazy_static! {
    pub static ref COMPILED_PATTERNS: Vec<(&'static str, Regex)> = PATTERN_SET
        .iter()
        .map(|(name, pattern)| {
            (
                *name,
                Regex::new(pattern).expect("number pattern should be valid"),
            )
        })
        .collect();
}
