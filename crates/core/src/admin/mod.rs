//! Management API module
//!
//! This module provides the ManagementApi trait and the types for managing
//! service accounts and permissions and for reading usage reports.

mod types;
mod usage;

pub use types::{
    Action, CreateServiceAccountRequest, CreatedServiceAccount, Permission, PermissionType,
    ServiceAccount, UpdateServiceAccountRequest,
};
pub use usage::{
    Bucket, Buckets, CurrentUsage, Month, MonthYear, MonthlyUsage, SubAccount, SubAccountUsage,
    Usage, monthly_total_usage_gb,
};

use async_trait::async_trait;

use crate::error::Result;

/// Resource operations of the management API.
///
/// Implementations authenticate every call with the bearer token they hold.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    // ==================== Service Account Operations ====================

    /// Create a service account; the response carries its one-time secret
    async fn create_service_account(
        &self,
        request: &CreateServiceAccountRequest,
    ) -> Result<CreatedServiceAccount>;

    /// List all service accounts
    async fn list_service_accounts(&self) -> Result<Vec<ServiceAccount>>;

    /// Get a service account by ID
    async fn get_service_account(&self, id: &str) -> Result<ServiceAccount>;

    /// Replace name, description and permissions of a service account
    async fn update_service_account(
        &self,
        id: &str,
        request: &UpdateServiceAccountRequest,
    ) -> Result<()>;

    /// Enable a service account
    async fn enable_service_account(&self, id: &str) -> Result<()>;

    /// Disable a service account
    async fn disable_service_account(&self, id: &str) -> Result<()>;

    /// Delete a service account
    async fn delete_service_account(&self, id: &str) -> Result<()>;

    // ==================== Permission Operations ====================

    /// Create a permission.
    ///
    /// Policy permissions without a policy document are rejected locally
    /// with [`crate::Error::PolicyMissing`].
    async fn create_permission(&self, permission: &Permission) -> Result<Permission>;

    /// List all permissions
    async fn list_permissions(&self) -> Result<Vec<Permission>>;

    /// Get a permission by ID
    async fn get_permission(&self, id: &str) -> Result<Permission>;

    /// Update a permission
    async fn update_permission(&self, id: &str, permission: &Permission) -> Result<()>;

    /// Delete a permission
    async fn delete_permission(&self, id: &str) -> Result<()>;

    // ==================== Usage Operations ====================

    /// Monthly usage between `from` and `to`, inclusive.
    ///
    /// The API rejects ranges longer than six months.
    async fn monthly_usage(&self, from: MonthYear, to: MonthYear) -> Result<MonthlyUsage>;

    /// Current usage across all buckets
    async fn current_usage(&self) -> Result<CurrentUsage>;
}
