#![allow(clippy::unwrap_used, clippy::expect_used)]

use permission_guard::{
    Decision, DenyReason, GuardConfig, GuardError, OperationGuard, Permission,
    PermissionValidator, Principal, Subject, policies,
};
use scope_validator::{EvaluationLimits, ValidatorError};
use serde_json::json;
use tracing_test::traced_test;

fn principal(permissions: &[&str]) -> Principal {
    Principal::from_claims(json!({
        "sub": 42,
        "exp": 1_900_000_000,
        "username": "casey",
        "email": "casey@example.com",
        "permissions": permissions,
    }))
    .unwrap()
}

#[test]
fn test_signed_in_guard() {
    let guard = OperationGuard::new("grocery-list", policies::signed_in());

    assert_eq!(guard.check(None), Decision::Deny(DenyReason::Unauthenticated));
    assert_eq!(guard.check(Some(&principal(&[]))), Decision::Allow);
}

#[test]
fn test_product_admin_guard() {
    let guard = OperationGuard::new("admin-products", policies::product_admin().unwrap());

    assert!(guard
        .check(Some(&principal(&["create:product", "update:product"])))
        .is_allowed());
    assert_eq!(
        guard.check(Some(&principal(&["create:product"]))),
        Decision::Deny(DenyReason::Forbidden)
    );
    // `*:all` is not an implicit wildcard.
    assert_eq!(
        guard.check(Some(&principal(&["create:all", "update:all"]))),
        Decision::Deny(DenyReason::Forbidden)
    );
}

#[test]
fn test_report_price_guard() {
    let guard = OperationGuard::new("report-price", policies::report_price().unwrap());

    assert!(guard.check(Some(&principal(&["create:all"]))).is_allowed());
    assert!(guard.check(Some(&principal(&["create:price_report"]))).is_allowed());
    assert!(!guard.check(Some(&principal(&["read:price_report"]))).is_allowed());
}

#[test]
fn test_unknown_permissions_grant_nothing() {
    let guard = OperationGuard::new("read-users", policies::read_users().unwrap());
    let p = principal(&["read:everything", "read:user"]);
    assert!(guard.check(Some(&p)).is_allowed());

    let p = principal(&["read:everything"]);
    assert_eq!(guard.check(Some(&p)), Decision::Deny(DenyReason::Forbidden));
}

#[test]
fn test_unguarded_operation() {
    let guard = OperationGuard::unguarded("login");
    assert_eq!(guard.check(None), Decision::Allow);
    assert!(guard.enforce(None).is_ok());
}

#[test]
fn test_decision_redirect_uses_config() {
    let config: GuardConfig =
        serde_json::from_value(json!({"login_redirect": "/sign-in"})).unwrap();
    let guard = OperationGuard::new("delete-users", policies::delete_users().unwrap())
        .with_limits(config.limits.clone());

    let decision = guard.check(Some(&principal(&["read:all"])));
    assert_eq!(decision.redirect(&config), Some("/sign-in"));

    let decision = guard.check(Some(&principal(&["delete:user"])));
    assert_eq!(decision.redirect(&config), None);
}

#[test]
#[traced_test]
fn test_denial_is_logged() {
    let guard = OperationGuard::new("create-users", policies::create_users().unwrap());
    let err = guard.enforce(Some(&principal(&["read:user"]))).unwrap_err();

    assert!(matches!(err, GuardError::Forbidden { ref operation } if operation == "create-users"));
    assert!(logs_contain("denied: missing permissions"));
    assert!(logs_contain("create:all OR create:user"));
}

#[test]
#[traced_test]
fn test_depth_fault_is_forbidden_and_logged() {
    let mut validator = PermissionValidator::new().with(Permission::ReadAll).unwrap();
    for _ in 0..4 {
        validator = validator.not(Permission::DeleteAll).unwrap();
    }
    let guard =
        OperationGuard::new("deep", validator).with_limits(EvaluationLimits { max_depth: 2 });
    let p = principal(&["read:all"]);

    assert_eq!(guard.check(Some(&p)), Decision::Deny(DenyReason::Forbidden));
    let err = guard.enforce(Some(&p)).unwrap_err();
    assert!(matches!(
        err,
        GuardError::Policy(ValidatorError::RecursionDepthExceeded { limit: 2 })
    ));
    assert_eq!(err.reason(), "Forbidden");
    assert!(logs_contain("policy evaluation failed"));
}

#[test]
fn test_numeric_subject_from_issuer_claims() {
    let p = Principal::from_claims(json!({
        "sub": 42,
        "exp": 1_900_000_000,
        "username": "a",
        "email": "a@x",
        "permissions": ["read:all"],
    }))
    .unwrap();
    assert_eq!(p.sub, Subject::Id(42));

    let guard = OperationGuard::new("read-users", policies::read_users().unwrap());
    assert_eq!(guard.operation(), "read-users");
    assert!(guard.check(Some(&p)).is_allowed());
}

#[test]
fn test_invalid_claims() {
    let err = Principal::from_claims(json!({"sub": "not-an-id", "username": "x", "email": "y"}))
        .unwrap_err();
    assert!(err.to_string().starts_with("invalid claims:"));
}

#[test]
fn test_guard_policy_from_json_descriptor() {
    let requirement = scope_validator::Requirement::<Permission>::from_json(&json!({
        "type": "Or",
        "values": ["update:all", ["update:marketplace", "read:marketplace"]],
    }))
    .unwrap();
    let guard = OperationGuard::new(
        "edit-marketplace",
        PermissionValidator::new().with(requirement).unwrap(),
    );

    assert!(guard.check(Some(&principal(&["update:all"]))).is_allowed());
    assert!(guard
        .check(Some(&principal(&["update:marketplace", "read:marketplace"])))
        .is_allowed());
    assert!(!guard.check(Some(&principal(&["update:marketplace"]))).is_allowed());
}
