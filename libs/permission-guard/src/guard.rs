//! Operation guard.
//!
//! An [`OperationGuard`] protects one named operation (a page, an endpoint)
//! with a [`PermissionValidator`]. Checking it yields a [`Decision`]:
//!
//! | guard | principal | policy | decision |
//! |-------|-----------|--------|----------|
//! | unguarded | any | - | `Allow` |
//! | guarded | none | - | `Deny(Unauthenticated)` |
//! | guarded | present | satisfied | `Allow` |
//! | guarded | present | not satisfied | `Deny(Forbidden)` |
//! | guarded | present | nests too deep | `Deny(Forbidden)` |

use std::fmt;

use scope_validator::{EvaluationLimits, ValidatorError};

use crate::config::GuardConfig;
use crate::error::GuardError;
use crate::permission::PermissionValidator;
use crate::principal::Principal;

/// Why a guard denied access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Nobody is signed in.
    Unauthenticated,
    /// The signed-in principal lacks the required permissions.
    Forbidden,
}

impl DenyReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "Unauthorized",
            Self::Forbidden => "Forbidden",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`OperationGuard::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    #[inline]
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Where to send the caller, if anywhere.
    #[must_use]
    pub fn redirect(self, config: &GuardConfig) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Deny(_) => Some(config.login_redirect.as_str()),
        }
    }
}

/// A named operation and the policy protecting it.
#[derive(Clone)]
pub struct OperationGuard {
    operation: String,
    validator: Option<PermissionValidator>,
    limits: EvaluationLimits,
}

impl OperationGuard {
    /// Guard `operation` with `validator`.
    #[must_use]
    pub fn new(operation: impl Into<String>, validator: PermissionValidator) -> Self {
        Self {
            operation: operation.into(),
            validator: Some(validator),
            limits: EvaluationLimits::default(),
        }
    }

    /// An operation open to everyone, signed in or not.
    #[must_use]
    pub fn unguarded(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            validator: None,
            limits: EvaluationLimits::default(),
        }
    }

    /// Override the evaluation limits (default: [`EvaluationLimits::default`]).
    #[must_use]
    pub fn with_limits(mut self, limits: EvaluationLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The protecting policy, or `None` if the operation is unguarded.
    #[must_use]
    pub fn validator(&self) -> Option<&PermissionValidator> {
        self.validator.as_ref()
    }

    /// Decide whether `principal` may perform the operation.
    #[must_use]
    pub fn check(&self, principal: Option<&Principal>) -> Decision {
        match self.enforce(principal) {
            Ok(()) => Decision::Allow,
            Err(GuardError::Unauthenticated) => Decision::Deny(DenyReason::Unauthenticated),
            Err(GuardError::Forbidden { .. } | GuardError::Policy(_)) => {
                Decision::Deny(DenyReason::Forbidden)
            }
        }
    }

    /// Like [`check`](Self::check), with denials as errors.
    ///
    /// # Errors
    ///
    /// - [`GuardError::Unauthenticated`] if the operation is guarded and there is no principal
    /// - [`GuardError::Forbidden`] if the principal does not satisfy the policy
    /// - [`GuardError::Policy`] if the policy could not be evaluated
    pub fn enforce(&self, principal: Option<&Principal>) -> Result<(), GuardError> {
        let Some(validator) = &self.validator else {
            return Ok(());
        };
        let Some(principal) = principal else {
            tracing::debug!(operation = %self.operation, "denied: not signed in");
            return Err(GuardError::Unauthenticated);
        };

        match validator.authorize(&principal.granted(), &self.limits) {
            Ok(()) => {
                tracing::debug!(operation = %self.operation, sub = %principal.sub, "allowed");
                Ok(())
            }
            Err(ValidatorError::Unauthorized) => {
                tracing::debug!(
                    operation = %self.operation,
                    sub = %principal.sub,
                    policy = %validator,
                    "denied: missing permissions"
                );
                Err(GuardError::Forbidden {
                    operation: self.operation.clone(),
                })
            }
            Err(err) => {
                tracing::error!(
                    operation = %self.operation,
                    error = %err,
                    "policy evaluation failed"
                );
                Err(err.into())
            }
        }
    }
}

impl fmt::Debug for OperationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationGuard")
            .field("operation", &self.operation)
            .field(
                "policy",
                &self
                    .validator
                    .as_ref()
                    .map(ToString::to_string),
            )
            .field("limits", &self.limits)
            .finish()
    }
}
