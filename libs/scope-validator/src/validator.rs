//! The immutable policy builder.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::config::EvaluationLimits;
use crate::error::ValidatorError;
use crate::evaluate::{GrantedTokens, Grant, evaluate, evaluate_bounded, flatten};
use crate::node::{NonEmpty, Node};
use crate::normalize::normalize_each;
use crate::requirement::Requirement;

type Join<T> = fn(NonEmpty<Arc<Node<T>>>) -> Node<T>;

/// A composable permission policy.
///
/// A validator starts empty (no requirements, so it authorizes everyone) and
/// every combinator returns a new validator; the receiver is never touched.
/// Derived validators share the subtrees of the one they were built from, so
/// cloning and chaining are cheap.
///
/// `not` always conjoins its exclusion onto the existing policy, even after
/// an `or`:
///
/// ```
/// use scope_validator::Validator;
///
/// let v = Validator::<&str>::new().with("a")?.or("b")?.not("c")?;
/// // (a OR b) AND NOT c
/// assert!(v.validate(["b"]));
/// assert!(!v.validate(["b", "c"]));
/// # Ok::<(), scope_validator::ValidatorError>(())
/// ```
#[derive(PartialEq, Eq)]
pub struct Validator<T> {
    root: Option<Arc<Node<T>>>,
}

impl<T> Validator<T> {
    /// An empty validator: no requirements.
    #[must_use]
    pub fn new() -> Self {
        Self { root: None }
    }

    /// The canonical tree, or `None` if nothing is required.
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<&Arc<Node<T>>> {
        self.root.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Same as [`and`](Self::and).
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::InvalidInput`] if `requirement` is malformed.
    pub fn with(&self, requirement: impl Into<Requirement<T>>) -> Result<Self, ValidatorError> {
        self.and(requirement)
    }

    /// Same as [`and_all`](Self::and_all).
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::InvalidInput`] if the list is empty or any
    /// requirement is malformed.
    pub fn with_all<I, R>(&self, requirements: I) -> Result<Self, ValidatorError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Requirement<T>>,
    {
        self.and_all(requirements)
    }

    /// Require `requirement` in addition to the current policy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::InvalidInput`] if `requirement` is malformed.
    pub fn and(&self, requirement: impl Into<Requirement<T>>) -> Result<Self, ValidatorError> {
        self.and_all([requirement.into()])
    }

    /// Require every one of `requirements` in addition to the current policy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::InvalidInput`] if the list is empty or any
    /// requirement is malformed.
    pub fn and_all<I, R>(&self, requirements: I) -> Result<Self, ValidatorError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Requirement<T>>,
    {
        let node = group(requirements, Node::And)?;
        Ok(self.attach(node, Node::And))
    }

    /// Accept `requirement` as an alternative to the current policy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::InvalidInput`] if `requirement` is malformed.
    pub fn or(&self, requirement: impl Into<Requirement<T>>) -> Result<Self, ValidatorError> {
        self.or_all([requirement.into()])
    }

    /// Accept any one of `requirements` as an alternative to the current
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::InvalidInput`] if the list is empty or any
    /// requirement is malformed.
    pub fn or_all<I, R>(&self, requirements: I) -> Result<Self, ValidatorError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Requirement<T>>,
    {
        let node = group(requirements, Node::Or)?;
        Ok(self.attach(node, Node::Or))
    }

    /// Forbid `requirement`, conjoined onto the current policy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::InvalidInput`] if `requirement` is malformed.
    pub fn not(&self, requirement: impl Into<Requirement<T>>) -> Result<Self, ValidatorError> {
        self.not_all([requirement.into()])
    }

    /// Forbid holding all of `requirements` at once, conjoined onto the
    /// current policy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::InvalidInput`] if the list is empty or any
    /// requirement is malformed.
    pub fn not_all<I, R>(&self, requirements: I) -> Result<Self, ValidatorError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Requirement<T>>,
    {
        let excluded = group(requirements, Node::And)?;
        Ok(self.attach(Arc::new(Node::Not(excluded)), Node::And))
    }

    fn attach(&self, node: Arc<Node<T>>, join: Join<T>) -> Self {
        let root = match &self.root {
            Some(current) => Arc::new(join(NonEmpty::pair(Arc::clone(current), node))),
            None => node,
        };
        Self { root: Some(root) }
    }
}

/// Normalize a combinator's arguments; several of them are wrapped in `wrap`.
fn group<T, I, R>(requirements: I, wrap: Join<T>) -> Result<Arc<Node<T>>, ValidatorError>
where
    I: IntoIterator<Item = R>,
    R: Into<Requirement<T>>,
{
    match normalize_each(requirements)?.into_single() {
        Ok(single) => Ok(single),
        Err(children) => Ok(Arc::new(wrap(children))),
    }
}

impl<T: Eq + Hash> Validator<T> {
    /// Check the policy against granted tokens.
    ///
    /// Each argument is a token or a batch of tokens; all of them are pooled
    /// before evaluation. An empty validator accepts anything.
    ///
    /// ```
    /// use scope_validator::Validator;
    ///
    /// let v = Validator::<&str>::new().with("read:all")?.and("delete:all")?;
    /// assert!(v.validate(["read:all", "delete:all"]));
    /// assert!(v.validate([vec!["read:all", "delete:all"]]));
    /// assert!(!v.validate(["read:all"]));
    /// # Ok::<(), scope_validator::ValidatorError>(())
    /// ```
    #[must_use]
    pub fn validate<I, G>(&self, granted: I) -> bool
    where
        I: IntoIterator<Item = G>,
        G: Into<Grant<T>>,
    {
        match &self.root {
            Some(root) => evaluate(root.as_ref(), &flatten(granted)),
            None => true,
        }
    }
}

impl<T> Validator<T> {
    /// Check the policy against an existing collection of granted tokens.
    #[must_use]
    pub fn validate_with<G: GrantedTokens<T> + ?Sized>(&self, granted: &G) -> bool {
        self.root
            .as_ref()
            .is_none_or(|root| evaluate(root.as_ref(), granted))
    }

    /// Check the policy with a nesting budget, reporting the outcome as an
    /// error.
    ///
    /// # Errors
    ///
    /// - [`ValidatorError::Unauthorized`] if `granted` does not satisfy the policy
    /// - [`ValidatorError::RecursionDepthExceeded`] if the policy nests deeper
    ///   than `limits.max_depth`
    pub fn authorize<G: GrantedTokens<T> + ?Sized>(
        &self,
        granted: &G,
        limits: &EvaluationLimits,
    ) -> Result<(), ValidatorError> {
        let Some(root) = &self.root else {
            return Ok(());
        };
        match evaluate_bounded(root.as_ref(), granted, 0, limits.max_depth) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ValidatorError::Unauthorized),
            Err(err) => {
                tracing::warn!(
                    limit = limits.max_depth,
                    "policy evaluation exceeded the nesting limit"
                );
                Err(err)
            }
        }
    }
}

impl<T> Default for Validator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("root", &self.root)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{root}"),
            None => f.write_str("<unrestricted>"),
        }
    }
}
