//! Canonical policy tree.
//!
//! Every [`Validator`](crate::Validator) owns at most one root [`Node`]. Nodes
//! are immutable once built and children are held behind [`Arc`], so a
//! derived validator shares the subtrees of the validator it came from
//! instead of copying them.

use std::fmt;
use std::sync::Arc;

/// Kind of a requirement group.
///
/// Shared by raw [`Group`](crate::Group) descriptors and canonical nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GroupKind {
    /// A single required token.
    Scope,
    /// Every child must hold.
    And,
    /// At least one child must hold.
    Or,
    /// The child must not hold.
    Not,
}

impl GroupKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scope => "Scope",
            Self::And => "And",
            Self::Or => "Or",
            Self::Not => "Not",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `Scope` leaf.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Leaf<T> {
    /// A required token.
    Token(T),
    /// Stand-in for an empty sub-validator. Never matches a granted token.
    Empty,
}

/// A list holding at least one element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NonEmpty<N>(Vec<N>);

impl<N> NonEmpty<N> {
    /// Wrap `items`, or return `None` if there are none.
    #[must_use]
    pub fn new(items: Vec<N>) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Self(items))
        }
    }

    /// A list of exactly one element.
    #[must_use]
    pub fn one(item: N) -> Self {
        Self(vec![item])
    }

    /// A list of exactly two elements.
    #[must_use]
    pub fn pair(first: N, second: N) -> Self {
        Self(vec![first, second])
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[N] {
        &self.0
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, N> {
        self.0.iter()
    }

    /// Unwrap the only element, or give the list back if it holds more.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged when the list has more than one element.
    pub fn into_single(mut self) -> Result<N, Self> {
        if self.0.len() != 1 {
            return Err(self);
        }
        match self.0.pop() {
            Some(item) => Ok(item),
            None => Err(self),
        }
    }
}

impl<'a, N> IntoIterator for &'a NonEmpty<N> {
    type Item = &'a N;
    type IntoIter = std::slice::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Canonical boolean expression over tokens.
///
/// Only the normalizer builds nodes from user input, so every tree that
/// reaches the evaluator is well formed: `And`/`Or` always have children and
/// `Not` always has exactly one.
///
/// Dropping, evaluating and measuring a tree use an explicit work stack, so
/// long builder chains are safe. `Display`, equality and
/// [`Validator::authorize`](crate::Validator::authorize) recurse, the latter
/// only down to its configured limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node<T> {
    Scope(Leaf<T>),
    And(NonEmpty<Arc<Node<T>>>),
    Or(NonEmpty<Arc<Node<T>>>),
    Not(Arc<Node<T>>),
}

impl<T> Node<T> {
    /// A leaf requiring `token`.
    #[must_use]
    pub fn scope(token: T) -> Self {
        Self::Scope(Leaf::Token(token))
    }

    /// The placeholder leaf substituted for an empty sub-validator.
    #[must_use]
    pub fn empty_scope() -> Self {
        Self::Scope(Leaf::Empty)
    }

    #[must_use]
    pub fn kind(&self) -> GroupKind {
        match self {
            Self::Scope(_) => GroupKind::Scope,
            Self::And(_) => GroupKind::And,
            Self::Or(_) => GroupKind::Or,
            Self::Not(_) => GroupKind::Not,
        }
    }

    /// Number of nesting levels below this node. A leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            match node {
                Self::Scope(_) => {}
                Self::And(children) | Self::Or(children) => {
                    pending.extend(children.iter().map(|child| (child.as_ref(), level + 1)));
                }
                Self::Not(child) => pending.push((child.as_ref(), level + 1)),
            }
        }
        deepest
    }

    /// Move uniquely owned subtrees onto `pending`, leaving `self` shallow.
    fn detach_children(&mut self, pending: &mut Vec<Arc<Self>>) {
        match self {
            Self::Scope(_) => {}
            Self::And(children) | Self::Or(children) => pending.append(&mut children.0),
            Self::Not(child) => {
                if Arc::strong_count(child) == 1 && !matches!(child.as_ref(), Self::Scope(_)) {
                    pending.push(std::mem::replace(child, Arc::new(Self::empty_scope())));
                }
            }
        }
    }
}

impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(child) = pending.pop() {
            // Shared subtrees stay alive through their other owners.
            if let Some(mut node) = Arc::into_inner(child) {
                node.detach_children(&mut pending);
            }
        }
    }
}

impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scope(Leaf::Token(token)) => write!(f, "{token}"),
            Self::Scope(Leaf::Empty) => f.write_str("<empty>"),
            Self::And(children) => write_joined(f, children, " AND "),
            Self::Or(children) => write_joined(f, children, " OR "),
            Self::Not(child) => write!(f, "NOT {child}"),
        }
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    children: &NonEmpty<Arc<Node<T>>>,
    separator: &str,
) -> fmt::Result {
    if let [only] = children.as_slice() {
        return write!(f, "{only}");
    }
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}
