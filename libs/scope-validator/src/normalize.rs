//! Requirement normalizer.
//!
//! Turns any accepted [`Requirement`] into a canonical [`Node`]:
//!
//! | input | canonical form |
//! |-------|----------------|
//! | token `t` | `Scope(t)` |
//! | collection `[a, b, ..]` | `And(a, b, ..)` |
//! | sub-validator | its root, or `Scope(<empty>)` if it has none |
//! | `{Scope, t}` | `Scope(t)` |
//! | `{And, [a, b, ..]}` / `{And, x}` | `And(a, b, ..)` / `And(x)` |
//! | `{Or, [a, b, ..]}` / `{Or, x}` | `Or(a, b, ..)` / `Or(x)` |
//! | `{Not, [a, b, ..]}` / `{Not, x}` | `Not(Or(a, b, ..))` / `Not(x)` |
//!
//! Empty collections and `Scope` descriptors that do not carry exactly one
//! token are rejected with [`ValidatorError::InvalidInput`].

use std::sync::Arc;

use crate::error::ValidatorError;
use crate::node::{GroupKind, NonEmpty, Node};
use crate::requirement::Requirement;
use crate::validator::Validator;

type Children<T> = NonEmpty<Arc<Node<T>>>;

/// Normalize a requirement into a canonical node.
///
/// # Errors
///
/// Returns [`ValidatorError::InvalidInput`] if the requirement (or anything
/// nested in it) is outside the accepted shapes.
pub fn normalize<T>(requirement: Requirement<T>) -> Result<Arc<Node<T>>, ValidatorError> {
    match requirement {
        Requirement::Token(token) => Ok(Arc::new(Node::scope(token))),
        Requirement::All(items) => Ok(Arc::new(Node::And(normalize_each(items)?))),
        Requirement::Validator(validator) => Ok(embed(&validator)),
        Requirement::Group(group) => {
            let (kind, values) = group.into_parts();
            normalize_group(kind, values)
        }
    }
}

/// Root of a sub-validator, shared rather than copied.
fn embed<T>(validator: &Validator<T>) -> Arc<Node<T>> {
    validator
        .root()
        .map_or_else(|| Arc::new(Node::empty_scope()), Arc::clone)
}

fn normalize_group<T>(
    kind: GroupKind,
    values: Requirement<T>,
) -> Result<Arc<Node<T>>, ValidatorError> {
    let node = match kind {
        GroupKind::Scope => match values {
            Requirement::Token(token) => Node::scope(token),
            _ => {
                return Err(ValidatorError::invalid_input(
                    "a `Scope` descriptor must carry exactly one token",
                ));
            }
        },
        GroupKind::And => Node::And(children_of(values)?),
        GroupKind::Or => Node::Or(children_of(values)?),
        GroupKind::Not => match values {
            // None of the listed requirements may hold.
            Requirement::All(items) => Node::Not(Arc::new(Node::Or(normalize_each(items)?))),
            single => Node::Not(normalize(single)?),
        },
    };
    Ok(Arc::new(node))
}

fn children_of<T>(values: Requirement<T>) -> Result<Children<T>, ValidatorError> {
    match values {
        Requirement::All(items) => normalize_each(items),
        single => Ok(NonEmpty::one(normalize(single)?)),
    }
}

pub(crate) fn normalize_each<T, I, R>(items: I) -> Result<Children<T>, ValidatorError>
where
    I: IntoIterator<Item = R>,
    R: Into<Requirement<T>>,
{
    let nodes = items
        .into_iter()
        .map(|item| normalize(item.into()))
        .collect::<Result<Vec<_>, _>>()?;
    NonEmpty::new(nodes).ok_or_else(|| ValidatorError::invalid_input("empty requirement list"))
}
