#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Composable permission policies.
//!
//! A [`Validator`] is an immutable boolean expression over opaque tokens,
//! built up with `with`/`and`/`or`/`not` and evaluated against the tokens a
//! caller holds. Builder arguments may be tokens, collections, raw
//! [`Group`] descriptors or other validators; all of them are normalized into
//! one canonical [`Node`] tree.
//!
//! ```
//! use scope_validator::{Group, Validator};
//!
//! let policy = Validator::<&str>::new()
//!     .with("read:all")?
//!     .not(Group::or(["banned", "suspended"]))?;
//!
//! assert!(policy.validate(["read:all"]));
//! assert!(!policy.validate(["read:all", "suspended"]));
//! # Ok::<(), scope_validator::ValidatorError>(())
//! ```

// Canonical tree
pub mod node;

// Builder inputs and normalization
pub mod normalize;
pub mod requirement;

// Builder and evaluation
pub mod config;
pub mod error;
pub mod evaluate;
pub mod validator;

pub use config::{DEFAULT_MAX_DEPTH, EvaluationLimits};
pub use error::ValidatorError;
pub use evaluate::{Grant, GrantedTokens, evaluate};
pub use node::{GroupKind, Leaf, Node, NonEmpty};
pub use normalize::normalize;
pub use requirement::{Group, Requirement};
pub use validator::Validator;
