//! Policy evaluation against a set of granted tokens.

use std::collections::{BTreeSet, HashSet};
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use crate::error::ValidatorError;
use crate::node::{Leaf, Node};

/// A collection of tokens a caller currently holds.
///
/// Implemented for the usual std collections so callers can evaluate a
/// policy against whatever they already have without flattening it first.
pub trait GrantedTokens<T> {
    /// Whether `token` was granted.
    fn holds(&self, token: &T) -> bool;
}

impl<T: Eq + Hash, S: BuildHasher> GrantedTokens<T> for HashSet<T, S> {
    fn holds(&self, token: &T) -> bool {
        self.contains(token)
    }
}

impl<T: Ord> GrantedTokens<T> for BTreeSet<T> {
    fn holds(&self, token: &T) -> bool {
        self.contains(token)
    }
}

impl<T: PartialEq> GrantedTokens<T> for [T] {
    fn holds(&self, token: &T) -> bool {
        self.contains(token)
    }
}

impl<T: PartialEq> GrantedTokens<T> for Vec<T> {
    fn holds(&self, token: &T) -> bool {
        self.as_slice().contains(token)
    }
}

/// One argument to [`Validator::validate`](crate::Validator::validate): a
/// single token or a batch of them. Both are flattened into one pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Grant<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> From<T> for Grant<T> {
    fn from(token: T) -> Self {
        Self::One(token)
    }
}

impl<T> From<Vec<T>> for Grant<T> {
    fn from(tokens: Vec<T>) -> Self {
        Self::Many(tokens)
    }
}

impl<T, const N: usize> From<[T; N]> for Grant<T> {
    fn from(tokens: [T; N]) -> Self {
        Self::Many(tokens.into())
    }
}

impl<T: Clone> From<&[T]> for Grant<T> {
    fn from(tokens: &[T]) -> Self {
        Self::Many(tokens.to_vec())
    }
}

/// Flatten grant arguments into a single set.
pub(crate) fn flatten<T, I, G>(grants: I) -> HashSet<T>
where
    T: Eq + Hash,
    I: IntoIterator<Item = G>,
    G: Into<Grant<T>>,
{
    let mut granted = HashSet::new();
    for grant in grants {
        match grant.into() {
            Grant::One(token) => {
                granted.insert(token);
            }
            Grant::Many(tokens) => granted.extend(tokens),
        }
    }
    granted
}

fn leaf_held<T, G: GrantedTokens<T> + ?Sized>(leaf: &Leaf<T>, granted: &G) -> bool {
    match leaf {
        Leaf::Token(token) => granted.holds(token),
        Leaf::Empty => false,
    }
}

enum Step<'a, T> {
    Enter(&'a Node<T>),
    And(std::slice::Iter<'a, Arc<Node<T>>>),
    Or(std::slice::Iter<'a, Arc<Node<T>>>),
    Not,
}

/// Evaluate `node` against `granted`, short-circuiting `And`/`Or`.
///
/// Walks the tree with an explicit stack, so nesting depth is bounded only
/// by memory.
#[must_use]
pub fn evaluate<T, G: GrantedTokens<T> + ?Sized>(node: &Node<T>, granted: &G) -> bool {
    let mut steps = vec![Step::Enter(node)];
    // Result of the most recently finished subtree.
    let mut held = false;
    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(Node::Scope(leaf)) => held = leaf_held(leaf, granted),
            Step::Enter(Node::And(children)) => {
                held = true;
                steps.push(Step::And(children.iter()));
            }
            Step::Enter(Node::Or(children)) => {
                held = false;
                steps.push(Step::Or(children.iter()));
            }
            Step::Enter(Node::Not(child)) => {
                steps.push(Step::Not);
                steps.push(Step::Enter(child));
            }
            Step::And(mut rest) if held => {
                if let Some(child) = rest.next() {
                    steps.push(Step::And(rest));
                    steps.push(Step::Enter(child));
                }
            }
            Step::Or(mut rest) if !held => {
                if let Some(child) = rest.next() {
                    steps.push(Step::Or(rest));
                    steps.push(Step::Enter(child));
                }
            }
            Step::And(_) | Step::Or(_) => {}
            Step::Not => held = !held,
        }
    }
    held
}

/// Evaluate `node` with a nesting budget.
///
/// Every child is visited so that an over-deep policy is reported no matter
/// which tokens were granted.
pub(crate) fn evaluate_bounded<T, G: GrantedTokens<T> + ?Sized>(
    node: &Node<T>,
    granted: &G,
    depth: usize,
    max_depth: usize,
) -> Result<bool, ValidatorError> {
    if depth > max_depth {
        return Err(ValidatorError::RecursionDepthExceeded { limit: max_depth });
    }
    match node {
        Node::Scope(leaf) => Ok(leaf_held(leaf, granted)),
        Node::And(children) => children.iter().try_fold(true, |acc, child| {
            evaluate_bounded(child.as_ref(), granted, depth + 1, max_depth).map(|held| acc && held)
        }),
        Node::Or(children) => children.iter().try_fold(false, |acc, child| {
            evaluate_bounded(child.as_ref(), granted, depth + 1, max_depth).map(|held| acc || held)
        }),
        Node::Not(child) => {
            evaluate_bounded(child.as_ref(), granted, depth + 1, max_depth).map(|held| !held)
        }
    }
}
