//! Policies for the application's protected operations.

use scope_validator::ValidatorError;

use crate::permission::{Permission, PermissionValidator};

/// Any signed-in user.
#[must_use]
pub fn signed_in() -> PermissionValidator {
    PermissionValidator::new()
}

/// Managing the product catalog.
///
/// # Errors
///
/// Propagates [`ValidatorError`] from the builder.
pub fn product_admin() -> Result<PermissionValidator, ValidatorError> {
    PermissionValidator::new()
        .with(Permission::CreateProduct)?
        .and(Permission::UpdateProduct)
}

/// Submitting a price report.
///
/// # Errors
///
/// See [`product_admin`].
pub fn report_price() -> Result<PermissionValidator, ValidatorError> {
    PermissionValidator::new()
        .with(Permission::CreateAll)?
        .or(Permission::CreatePriceReport)
}

/// Listing and viewing users.
///
/// # Errors
///
/// See [`product_admin`].
pub fn read_users() -> Result<PermissionValidator, ValidatorError> {
    any_of(Permission::ReadAll, Permission::ReadUser)
}

/// Creating users.
///
/// # Errors
///
/// See [`product_admin`].
pub fn create_users() -> Result<PermissionValidator, ValidatorError> {
    any_of(Permission::CreateAll, Permission::CreateUser)
}

/// Deleting users.
///
/// # Errors
///
/// See [`product_admin`].
pub fn delete_users() -> Result<PermissionValidator, ValidatorError> {
    any_of(Permission::DeleteAll, Permission::DeleteUser)
}

fn any_of(
    global: Permission,
    scoped: Permission,
) -> Result<PermissionValidator, ValidatorError> {
    PermissionValidator::new().with(global)?.or(scoped)
}
