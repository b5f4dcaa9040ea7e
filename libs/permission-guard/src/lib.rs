#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Permission vocabulary and operation guards.
//!
//! Builds on [`scope_validator`] with the concrete [`Permission`] set, the
//! [`Principal`] read from token claims, and [`OperationGuard`], which turns
//! a policy check into an allow/deny [`Decision`].

pub mod config;
pub mod error;
pub mod guard;
pub mod permission;
pub mod policies;
pub mod principal;

pub use config::GuardConfig;
pub use error::{ClaimsError, GuardError};
pub use guard::{Decision, DenyReason, OperationGuard};
pub use permission::{Permission, PermissionValidator, UnknownPermission};
pub use principal::{Principal, Subject};
