//! Evaluation limits.

use serde::{Deserialize, Serialize};

/// Default nesting budget for checked evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits applied by [`Validator::authorize`](crate::Validator::authorize).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluationLimits {
    /// How many levels below the root a node may sit before evaluation
    /// fails with `RecursionDepthExceeded`.
    pub max_depth: usize,
}

impl Default for EvaluationLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let limits: EvaluationLimits = serde_json::from_str("{}").unwrap();
        assert_eq!(limits, EvaluationLimits::default());
        assert_eq!(limits.max_depth, 64);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<EvaluationLimits>(r#"{"max_depht": 3}"#);
        assert!(result.is_err());
    }
}
