//! Management API implementation
//!
//! Implements the ManagementApi trait for [`Client`]. Each operation maps to
//! one authenticated request; see the trait for the semantics.

use async_trait::async_trait;
use lc_core::admin::{
    CreateServiceAccountRequest, CreatedServiceAccount, CurrentUsage, ManagementApi, MonthYear,
    MonthlyUsage, Permission, ServiceAccount, UpdateServiceAccountRequest,
};
use lc_core::{Error, Result};
use reqwest::Method;

use crate::client::Client;

const SERVICE_ACCOUNTS: &str = "/service-accounts";
const PERMISSIONS: &str = "/permissions";
const MONTHLY_USAGE: &str = "/usage/monthly";
const CURRENT_USAGE: &str = "/usage/current";

fn service_account_path(id: &str) -> String {
    format!("{SERVICE_ACCOUNTS}/{}", urlencoding::encode(id))
}

fn permission_path(id: &str) -> String {
    format!("{PERMISSIONS}/{}", urlencoding::encode(id))
}

fn monthly_usage_path(from: MonthYear, to: MonthYear) -> String {
    let query = [
        ("fromMonth", from.month.to_string()),
        ("fromYear", from.year.to_string()),
        ("toMonth", to.month.to_string()),
        ("toYear", to.year.to_string()),
    ];
    let query_string = query
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{MONTHLY_USAGE}?{query_string}")
}

#[async_trait]
impl ManagementApi for Client {
    // ==================== Service Account Operations ====================

    async fn create_service_account(
        &self,
        request: &CreateServiceAccountRequest,
    ) -> Result<CreatedServiceAccount> {
        self.send_json(Method::POST, SERVICE_ACCOUNTS, request)
            .await
    }

    async fn list_service_accounts(&self) -> Result<Vec<ServiceAccount>> {
        self.get_json(SERVICE_ACCOUNTS).await
    }

    async fn get_service_account(&self, id: &str) -> Result<ServiceAccount> {
        self.get_json(&service_account_path(id)).await
    }

    async fn update_service_account(
        &self,
        id: &str,
        request: &UpdateServiceAccountRequest,
    ) -> Result<()> {
        let body = serde_json::to_vec(request)?;
        self.request_no_response(Method::PUT, &service_account_path(id), Some(body))
            .await
    }

    async fn enable_service_account(&self, id: &str) -> Result<()> {
        let path = format!("{}/enabled", service_account_path(id));
        self.request_no_response(Method::PUT, &path, None).await
    }

    async fn disable_service_account(&self, id: &str) -> Result<()> {
        let path = format!("{}/enabled", service_account_path(id));
        self.request_no_response(Method::DELETE, &path, None).await
    }

    async fn delete_service_account(&self, id: &str) -> Result<()> {
        self.request_no_response(Method::DELETE, &service_account_path(id), None)
            .await
    }

    // ==================== Permission Operations ====================

    async fn create_permission(&self, permission: &Permission) -> Result<Permission> {
        if permission.is_policy_permission() && permission.policy.is_empty() {
            return Err(Error::PolicyMissing);
        }
        self.send_json(Method::POST, PERMISSIONS, permission).await
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>> {
        self.get_json(PERMISSIONS).await
    }

    async fn get_permission(&self, id: &str) -> Result<Permission> {
        self.get_json(&permission_path(id)).await
    }

    async fn update_permission(&self, id: &str, permission: &Permission) -> Result<()> {
        let body = serde_json::to_vec(permission)?;
        self.request_no_response(Method::PUT, &permission_path(id), Some(body))
            .await
    }

    async fn delete_permission(&self, id: &str) -> Result<()> {
        self.request_no_response(Method::DELETE, &permission_path(id), None)
            .await
    }

    // ==================== Usage Operations ====================

    async fn monthly_usage(&self, from: MonthYear, to: MonthYear) -> Result<MonthlyUsage> {
        self.get_json(&monthly_usage_path(from, to)).await
    }

    async fn current_usage(&self) -> Result<CurrentUsage> {
        self.get_json(CURRENT_USAGE).await
    }
}
