use serde::{Deserialize, Serialize};
use scope_validator::EvaluationLimits;

/// Operation guard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardConfig {
    /// Where denied callers are sent.
    pub login_redirect: String,
    /// Nesting budget for policy evaluation.
    pub limits: EvaluationLimits,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_redirect: "/login".to_owned(),
            limits: EvaluationLimits::default(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let cfg: GuardConfig = serde_json::from_str(r#"{"limits": {"max_depth": 8}}"#).unwrap();
        assert_eq!(cfg.login_redirect, "/login");
        assert_eq!(cfg.limits.max_depth, 8);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<GuardConfig>(r#"{"redirect": "/"}"#).is_err());
    }
}
