//! Input-facing requirement shapes accepted by the builder.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ValidatorError;
use crate::node::GroupKind;
use crate::validator::Validator;

/// One argument to a builder combinator.
///
/// Every shape resolves to a canonical [`Node`](crate::Node) through
/// [`normalize`](crate::normalize). Most callers never name this type and
/// rely on the `From` conversions instead:
///
/// ```
/// use scope_validator::{Group, Validator};
///
/// let admin = Validator::<&str>::new().with("admin")?;
/// let policy = Validator::<&str>::new()
///     .with("read")?                          // a token
///     .and(vec!["write", "execute"])?         // a collection (AND-ed)
///     .or(Group::and(["edit", "publish"]))?   // a raw descriptor
///     .or(&admin)?;                           // a sub-validator
/// assert!(policy.validate(["admin"]));
/// # Ok::<(), scope_validator::ValidatorError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Requirement<T> {
    /// A bare token.
    Token(T),
    /// A bare collection; its elements are AND-ed.
    All(Vec<Requirement<T>>),
    /// A raw `{kind, values}` descriptor.
    Group(Group<T>),
    /// A nested validator used as a sub-expression.
    Validator(Validator<T>),
}

/// Raw `{kind, values}` group descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group<T> {
    kind: GroupKind,
    values: Box<Requirement<T>>,
}

impl<T> Group<T> {
    #[must_use]
    pub fn new(kind: GroupKind, values: impl Into<Requirement<T>>) -> Self {
        Self {
            kind,
            values: Box::new(values.into()),
        }
    }

    #[must_use]
    pub fn scope(token: T) -> Self {
        Self::new(GroupKind::Scope, Requirement::Token(token))
    }

    #[must_use]
    pub fn and(values: impl Into<Requirement<T>>) -> Self {
        Self::new(GroupKind::And, values)
    }

    #[must_use]
    pub fn or(values: impl Into<Requirement<T>>) -> Self {
        Self::new(GroupKind::Or, values)
    }

    #[must_use]
    pub fn not(values: impl Into<Requirement<T>>) -> Self {
        Self::new(GroupKind::Not, values)
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &Requirement<T> {
        &self.values
    }

    pub(crate) fn into_parts(self) -> (GroupKind, Requirement<T>) {
        (self.kind, *self.values)
    }
}

impl<T> From<T> for Requirement<T> {
    fn from(token: T) -> Self {
        Self::Token(token)
    }
}

impl<T> From<Vec<T>> for Requirement<T> {
    fn from(tokens: Vec<T>) -> Self {
        Self::All(tokens.into_iter().map(Self::Token).collect())
    }
}

impl<T, const N: usize> From<[T; N]> for Requirement<T> {
    fn from(tokens: [T; N]) -> Self {
        Self::All(tokens.into_iter().map(Self::Token).collect())
    }
}

impl<T> From<Vec<Requirement<T>>> for Requirement<T> {
    fn from(requirements: Vec<Requirement<T>>) -> Self {
        Self::All(requirements)
    }
}

impl<T> From<Group<T>> for Requirement<T> {
    fn from(group: Group<T>) -> Self {
        Self::Group(group)
    }
}

impl<T> From<Validator<T>> for Requirement<T> {
    fn from(validator: Validator<T>) -> Self {
        Self::Validator(validator)
    }
}

impl<T> From<&Validator<T>> for Requirement<T> {
    fn from(validator: &Validator<T>) -> Self {
        Self::Validator(validator.clone())
    }
}

impl<T: DeserializeOwned> Requirement<T> {
    /// Read a requirement from its loosely typed JSON form.
    ///
    /// Accepted shapes:
    /// - a scalar that deserializes into `T`;
    /// - an array of accepted shapes (AND-ed);
    /// - an object `{"type": "Scope"|"And"|"Or"|"Not", "values": <shape>}`
    ///   (`"kind"` is accepted in place of `"type"`).
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::InvalidInput`] for any other shape.
    pub fn from_json(value: &Value) -> Result<Self, ValidatorError> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::All),
            Value::Object(fields) => {
                let kind = fields
                    .get("type")
                    .or_else(|| fields.get("kind"))
                    .ok_or_else(|| ValidatorError::invalid_input("descriptor has no `type`"))?;
                let kind = GroupKind::deserialize_json(kind)?;
                let values = fields
                    .get("values")
                    .ok_or_else(|| ValidatorError::invalid_input("descriptor has no `values`"))?;
                Ok(Self::Group(Group::new(kind, Self::from_json(values)?)))
            }
            Value::Null => Err(ValidatorError::invalid_input("null is not a requirement")),
            scalar => serde_json::from_value(scalar.clone())
                .map(Self::Token)
                .map_err(|e| ValidatorError::invalid_input(format!("invalid token {scalar}: {e}"))),
        }
    }
}

impl GroupKind {
    fn deserialize_json(value: &Value) -> Result<Self, ValidatorError> {
        serde_json::from_value(value.clone())
            .map_err(|_| ValidatorError::invalid_input(format!("unknown group kind {value}")))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_reads_scalars_arrays_and_descriptors() {
        let req = Requirement::<String>::from_json(&json!([
            "read:all",
            {"type": "Or", "values": ["delete:all", "create:all"]},
            {"kind": "Not", "values": "read:product"},
        ]))
        .unwrap();

        let expected = Requirement::All(vec![
            Requirement::Token("read:all".to_owned()),
            Requirement::Group(Group::or(vec![
                "delete:all".to_owned(),
                "create:all".to_owned(),
            ])),
            Requirement::Group(Group::not("read:product".to_owned())),
        ]);
        assert_eq!(req, expected);
    }

    #[test]
    fn from_json_reads_numeric_tokens() {
        let req = Requirement::<i32>::from_json(&json!({"type": "And", "values": [100, 200]}))
            .unwrap();
        assert_eq!(req, Requirement::Group(Group::and(vec![100, 200])));
    }

    #[test]
    fn from_json_rejects_descriptor_without_values() {
        let err = Requirement::<String>::from_json(&json!({"type": "Or"})).unwrap_err();
        assert!(matches!(err, ValidatorError::InvalidInput { .. }));
    }

    #[test]
    fn from_json_rejects_unknown_kind() {
        let err =
            Requirement::<String>::from_json(&json!({"type": "Xor", "values": ["a"]})).unwrap_err();
        assert_eq!(
            err,
            ValidatorError::InvalidInput {
                reason: "unknown group kind \"Xor\"".to_owned()
            }
        );
    }

    #[test]
    fn from_json_rejects_null_and_mistyped_tokens() {
        assert!(Requirement::<String>::from_json(&Value::Null).is_err());
        assert!(Requirement::<i32>::from_json(&json!("not-a-number")).is_err());
        assert!(Requirement::<String>::from_json(&json!(true)).is_err());
    }

    #[test]
    fn group_exposes_kind_and_values() {
        let group = Group::<i32>::not(vec![2, 3]);
        assert_eq!(group.kind(), GroupKind::Not);
        assert_eq!(
            group.values(),
            &Requirement::All(vec![Requirement::Token(2), Requirement::Token(3)])
        );

        let group = Group::<i32>::scope(4);
        assert_eq!(group.kind(), GroupKind::Scope);
        assert_eq!(group.values(), &Requirement::Token(4));
    }

    #[test]
    fn borrowed_validator_converts_to_sub_expression() {
        let sub = Validator::<&str>::new().with("a").unwrap();
        let req = Requirement::<&str>::from(&sub);
        assert_eq!(req, Requirement::Validator(sub));
    }
}
