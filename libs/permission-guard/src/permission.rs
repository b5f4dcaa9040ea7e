//! Permission vocabulary.
//!
//! Permissions are `<action>:<resource>` pairs; `*:all` grants the action on
//! every resource only when a policy says so, there is no implicit wildcard.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use scope_validator::Validator;

/// A permission a principal may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "create:all")]
    CreateAll,
    #[serde(rename = "read:all")]
    ReadAll,
    #[serde(rename = "update:all")]
    UpdateAll,
    #[serde(rename = "delete:all")]
    DeleteAll,

    #[serde(rename = "create:marketplace")]
    CreateMarketplace,
    #[serde(rename = "read:marketplace")]
    ReadMarketplace,
    #[serde(rename = "update:marketplace")]
    UpdateMarketplace,
    #[serde(rename = "delete:marketplace")]
    DeleteMarketplace,

    #[serde(rename = "create:price_report")]
    CreatePriceReport,
    #[serde(rename = "read:price_report")]
    ReadPriceReport,
    #[serde(rename = "update:price_report")]
    UpdatePriceReport,
    #[serde(rename = "delete:price_report")]
    DeletePriceReport,

    #[serde(rename = "create:product")]
    CreateProduct,
    #[serde(rename = "read:product")]
    ReadProduct,
    #[serde(rename = "update:product")]
    UpdateProduct,
    #[serde(rename = "delete:product")]
    DeleteProduct,

    #[serde(rename = "create:user")]
    CreateUser,
    #[serde(rename = "read:user")]
    ReadUser,
    #[serde(rename = "update:user")]
    UpdateUser,
    #[serde(rename = "delete:user")]
    DeleteUser,
}

/// A policy over [`Permission`]s.
pub type PermissionValidator = Validator<Permission>;

impl Permission {
    pub const ALL: [Self; 20] = [
        Self::CreateAll,
        Self::ReadAll,
        Self::UpdateAll,
        Self::DeleteAll,
        Self::CreateMarketplace,
        Self::ReadMarketplace,
        Self::UpdateMarketplace,
        Self::DeleteMarketplace,
        Self::CreatePriceReport,
        Self::ReadPriceReport,
        Self::UpdatePriceReport,
        Self::DeletePriceReport,
        Self::CreateProduct,
        Self::ReadProduct,
        Self::UpdateProduct,
        Self::DeleteProduct,
        Self::CreateUser,
        Self::ReadUser,
        Self::UpdateUser,
        Self::DeleteUser,
    ];

    /// Wire name, e.g. `"read:product"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateAll => "create:all",
            Self::ReadAll => "read:all",
            Self::UpdateAll => "update:all",
            Self::DeleteAll => "delete:all",
            Self::CreateMarketplace => "create:marketplace",
            Self::ReadMarketplace => "read:marketplace",
            Self::UpdateMarketplace => "update:marketplace",
            Self::DeleteMarketplace => "delete:marketplace",
            Self::CreatePriceReport => "create:price_report",
            Self::ReadPriceReport => "read:price_report",
            Self::UpdatePriceReport => "update:price_report",
            Self::DeletePriceReport => "delete:price_report",
            Self::CreateProduct => "create:product",
            Self::ReadProduct => "read:product",
            Self::UpdateProduct => "update:product",
            Self::DeleteProduct => "delete:product",
            Self::CreateUser => "create:user",
            Self::ReadUser => "read:user",
            Self::UpdateUser => "update:user",
            Self::DeleteUser => "delete:user",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A permission name outside the known vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|permission| permission.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_owned()))
    }
}
