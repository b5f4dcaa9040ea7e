/// Errors raised while building or checking a policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidatorError {
    /// A combinator received a requirement outside the accepted shapes.
    ///
    /// Raised at construction time; no validator is produced.
    #[error("invalid requirement: {reason}")]
    InvalidInput { reason: String },

    /// The granted tokens do not satisfy the policy.
    #[error("unauthorized")]
    Unauthorized,

    /// The policy nests deeper than the configured evaluation limit.
    #[error("policy nesting exceeds the recursion limit of {limit}")]
    RecursionDepthExceeded { limit: usize },
}

impl ValidatorError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
