use scope_validator::ValidatorError;

/// Errors returned by [`OperationGuard::enforce`](crate::OperationGuard::enforce).
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// No principal was presented for a guarded operation.
    #[error("Unauthorized")]
    Unauthenticated,

    /// The principal lacks the permissions the operation requires.
    #[error("Forbidden: {operation}")]
    Forbidden { operation: String },

    /// The operation's policy could not be evaluated.
    #[error("policy evaluation failed: {0}")]
    Policy(#[from] ValidatorError),
}

impl GuardError {
    /// Short, client-safe reason.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "Unauthorized",
            Self::Forbidden { .. } | Self::Policy(_) => "Forbidden",
        }
    }
}

/// Decoded claims that do not describe a [`Principal`](crate::Principal).
#[derive(Debug, thiserror::Error)]
#[error("invalid claims: {0}")]
pub struct ClaimsError(#[from] serde_json::Error);
