//! Derived test outcome.
//!
//! The tracking sheet has no outcome column; the lab encodes the result in
//! the remark column, or by leaving it empty once a gene has been
//! reported. Pattern sets come from config; matching is case-sensitive.

use crate::config::OutcomeRules;
use crate::error::{NephroError, Result};
use regex::RegexSet;

pub const IN_PROCESS: &str = "in_process";
pub const POSITIVE: &str = "positiv";
pub const NEGATIVE: &str = "negativ";

pub struct OutcomeClassifier {
    negative: RegexSet,
    positive: RegexSet,
}

impl OutcomeClassifier {
    pub fn new(rules: &OutcomeRules) -> Result<Self> {
        let compile = |patterns: &[String]| {
            RegexSet::new(patterns)
                .map_err(|e| NephroError::Config(format!("Outcome-Muster ungültig: {}", e)))
        };
        Ok(Self {
            negative: compile(&rules.negative_patterns)?,
            positive: compile(&rules.positive_patterns)?,
        })
    }

    /// Priority order: no remark but a reported gene is a positive; nothing
    /// at all is still in process; then the negative patterns win over the
    /// positive ones; any other remark text passes through verbatim.
    pub fn derive(&self, bemerkung: Option<&str>, gen: Option<&str>) -> String {
        match (bemerkung, gen) {
            (None, Some(_)) => POSITIVE.to_string(),
            (None, None) => IN_PROCESS.to_string(),
            (Some(text), _) => {
                if self.negative.is_match(text) {
                    NEGATIVE.to_string()
                } else if self.positive.is_match(text) {
                    POSITIVE.to_string()
                } else {
                    // Unrecognized free text becomes the outcome value.
                    // Downstream only ever excludes the in-process literal,
                    // so such rows stay in the cohort.
                    text.to_string()
                }
            }
        }
    }
}
