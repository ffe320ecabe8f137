//! # Text Processing Module
//!
//! This module turns noisy OCR output into a deduplicated, canonically
//! formatted list of phone numbers.
//!
//! ## Features
//!
//! - Ordered regional regex patterns applied independently over the whole text
//! - Canonicalization to a comparable key (digits plus one leading `+`)
//! - Silent filtering of OCR noise (candidates under 8 digits)
//! - First-seen-order deduplication by canonical key
//! - Display formatting driven by a configurable table of region rules

use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info, trace};

use crate::patterns::COMPILED_PATTERNS;

/// Minimum canonical digit count for a candidate to survive filtering
pub const MIN_CANONICAL_DIGITS: usize = 8;

/// A raw substring matched by one pattern, prior to validation
#[derive(Debug, Clone, PartialEq)]
pub struct NumberMatch {
    /// The matched text exactly as it appeared (e.g. "(123) 456-7890")
    pub text: String,
    /// Name of the pattern that produced the match (e.g. "area-code")
    pub pattern: String,
}

/// A validated, deduplicated number ready for presentation
#[derive(Debug, Clone, PartialEq)]
pub struct ResultNumber {
    /// Canonical key: digits and at most one leading `+`
    pub canonical: String,
    /// Human-readable display form, region-specific grouping
    pub display: String,
}

/// One entry of the display-formatting table
///
/// A rule applies when the canonical form is all digits, has exactly
/// `digit_len` of them and starts with `required_prefix` (when set). The
/// template renders one digit per `#`; when the template holds fewer `#`
/// than `digit_len`, the surplus digits are skipped from the front (so a
/// literal country code in the template replaces the digits it stands for).
#[derive(Debug, Clone)]
pub struct FormatRule {
    pub digit_len: usize,
    pub required_prefix: Option<String>,
    pub template: String,
}

/// Default region rules. The supported-region set is a product decision, not
/// an invariant, which is why this is a table rather than hard-coded branches.
pub fn default_format_rules() -> Vec<FormatRule> {
    vec![
        FormatRule {
            digit_len: 10,
            required_prefix: None,
            template: "(###) ###-####".to_string(),
        },
        FormatRule {
            digit_len: 11,
            required_prefix: Some("1".to_string()),
            template: "+1 (###) ###-####".to_string(),
        },
        FormatRule {
            digit_len: 13,
            required_prefix: Some("880".to_string()),
            template: "+88 ###-####-###".to_string(),
        },
    ]
}

/// Configuration options for number detection
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Minimum canonical digit count; shorter candidates are dropped silently
    pub min_digits: usize,
    /// Display-formatting table applied per canonical key
    pub format_rules: Vec<FormatRule>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_digits: MIN_CANONICAL_DIGITS,
            format_rules: default_format_rules(),
        }
    }
}

/// Phone number detector applying an ordered set of regional patterns
pub struct NumberDetector {
    /// Compiled patterns in priority order, tagged with stable names
    patterns: Vec<(String, Regex)>,
    /// Configuration options
    config: DetectorConfig,
}

impl NumberDetector {
    /// Create a detector with the default pattern set and formatting table
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            patterns: COMPILED_PATTERNS
                .iter()
                .map(|(name, re)| (name.to_string(), re.clone()))
                .collect(),
            config: DetectorConfig::default(),
        })
    }

    /// Create a detector with a custom ordered pattern set
    ///
    /// # Arguments
    ///
    /// * `patterns` - (name, regex source) pairs, most-specific-first
    pub fn with_patterns(patterns: &[(&str, &str)]) -> Result<Self, regex::Error> {
        let compiled = patterns
            .iter()
            .map(|(name, source)| Ok((name.to_string(), Regex::new(source)?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self {
            patterns: compiled,
            config: DetectorConfig::default(),
        })
    }

    /// Create a detector with custom configuration and the default patterns
    pub fn with_config(config: DetectorConfig) -> Result<Self, regex::Error> {
        let mut detector = Self::new()?;
        detector.config = config;
        Ok(detector)
    }

    /// Find all candidate numbers in the given text
    ///
    /// Every pattern is applied independently across the whole text
    /// (non-overlapping matches within a pattern); results are concatenated
    /// in pattern priority order, then left-to-right within a pattern.
    /// Overlap between patterns is expected and resolved later by
    /// canonical-key deduplication.
    pub fn find_candidates(&self, text: &str) -> Vec<NumberMatch> {
        let mut candidates = Vec::new();

        for (name, pattern) in &self.patterns {
            for capture in pattern.find_iter(text) {
                trace!(pattern = %name, text = capture.as_str(), "Pattern matched candidate");
                candidates.push(NumberMatch {
                    text: capture.as_str().to_string(),
                    pattern: name.clone(),
                });
            }
        }

        debug!(
            candidates = candidates.len(),
            "Collected raw candidates from {} patterns",
            self.patterns.len()
        );
        candidates
    }

    /// Canonicalize, filter and deduplicate candidates, preserving
    /// first-seen order
    ///
    /// Never errors; returns an empty vector when no candidate survives.
    pub fn normalize_and_dedupe(&self, candidates: &[NumberMatch]) -> Vec<ResultNumber> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut results = Vec::new();

        for candidate in candidates {
            let canonical = canonicalize(&candidate.text);
            let digit_count = canonical.chars().filter(|c| c.is_ascii_digit()).count();

            if digit_count < self.config.min_digits {
                // OCR noise is expected; drop silently
                trace!(
                    raw = %candidate.text,
                    digits = digit_count,
                    "Discarding short candidate"
                );
                continue;
            }

            if !seen.insert(canonical.clone()) {
                trace!(canonical = %canonical, "Dropping duplicate candidate");
                continue;
            }

            let display = format_canonical(&canonical, &self.config.format_rules);
            results.push(ResultNumber { canonical, display });
        }

        results
    }

    /// Run the full extraction pipeline over OCR text
    pub fn extract_numbers(&self, text: &str) -> Vec<ResultNumber> {
        let candidates = self.find_candidates(text);
        let results = self.normalize_and_dedupe(&candidates);
        info!(
            candidates = candidates.len(),
            unique = results.len(),
            "Number extraction completed"
        );
        results
    }

    /// Render a canonical key through the detector's formatting table
    pub fn format(&self, canonical: &str) -> String {
        format_canonical(canonical, &self.config.format_rules)
    }
}

/// Reduce a raw candidate to its canonical key
///
/// Keeps decimal digits; a `+` survives only in position 0 of the raw text,
/// anywhere else it is punctuation noise and is stripped rather than
/// rejecting the candidate.
pub fn canonicalize(raw: &str) -> String {
    let mut canonical = String::with_capacity(raw.len());
    if raw.starts_with('+') {
        canonical.push('+');
    }
    canonical.extend(raw.chars().filter(|c| c.is_ascii_digit()));
    canonical
}

/// Format a canonical key using the first matching rule in the table
///
/// Rules only apply to plain digit keys; `+`-prefixed keys and keys with no
/// matching rule pass through unchanged.
pub fn format_canonical(canonical: &str, rules: &[FormatRule]) -> String {
    if !canonical.chars().all(|c| c.is_ascii_digit()) {
        return canonical.to_string();
    }

    for rule in rules {
        if canonical.len() != rule.digit_len {
            continue;
        }
        if let Some(prefix) = &rule.required_prefix {
            if !canonical.starts_with(prefix.as_str()) {
                continue;
            }
        }
        return render_template(&rule.template, canonical);
    }

    canonical.to_string()
}

/// Substitute digits into a `#` template, skipping surplus leading digits
fn render_template(template: &str, digits: &str) -> String {
    let slots = template.matches('#').count();
    if slots > digits.len() {
        // Malformed rule; fall back to the canonical form
        return digits.to_string();
    }

    let mut remaining = digits.chars().skip(digits.len() - slots);
    template
        .chars()
        .map(|c| if c == '#' { remaining.next().unwrap_or(c) } else { c })
        .collect()
}
