//! Service account and permission type definitions
//!
//! Request and response payloads for the `/service-accounts` and
//! `/permissions` endpoints.

use serde::{Deserialize, Serialize};

/// Scope a permission applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionType {
    /// Every bucket in the account
    AllBuckets,
    /// Buckets whose names start with the permission's prefix
    BucketPrefix,
    /// An explicit list of buckets
    BucketNames,
    /// An attached IAM-style policy document
    Policy,
}

impl std::fmt::Display for PermissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionType::AllBuckets => write!(f, "all-buckets"),
            PermissionType::BucketPrefix => write!(f, "bucket-prefix"),
            PermissionType::BucketNames => write!(f, "bucket-names"),
            PermissionType::Policy => write!(f, "policy"),
        }
    }
}

impl std::str::FromStr for PermissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all-buckets" => Ok(PermissionType::AllBuckets),
            "bucket-prefix" => Ok(PermissionType::BucketPrefix),
            "bucket-names" => Ok(PermissionType::BucketNames),
            "policy" => Ok(PermissionType::Policy),
            _ => Err(format!("Invalid permission type: {s}")),
        }
    }
}

/// Operations a permission allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    AllOperations,
    ReadOnly,
    WriteOnly,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::AllOperations => write!(f, "all-operations"),
            Action::ReadOnly => write!(f, "read-only"),
            Action::WriteOnly => write!(f, "write-only"),
        }
    }
}

/// A named access grant that can be assigned to service accounts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub permission_type: Option<PermissionType>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ready_state: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Action>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buckets: Vec<String>,

    /// Policy document, required when the type is [`PermissionType::Policy`]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub policy: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub create_time: String,
}

impl Permission {
    /// Create a permission granting `actions` on the named buckets
    pub fn for_buckets(
        name: impl Into<String>,
        actions: Action,
        buckets: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            permission_type: Some(PermissionType::BucketNames),
            actions: Some(actions),
            buckets: buckets.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Create a permission backed by a policy document
    pub fn for_policy(name: impl Into<String>, policy: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permission_type: Some(PermissionType::Policy),
            policy: policy.into(),
            ..Default::default()
        }
    }

    pub fn is_policy_permission(&self) -> bool {
        self.permission_type == Some(PermissionType::Policy)
    }
}

/// Request body for creating a service account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceAccountRequest {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Permission IDs granted to the account
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl CreateServiceAccountRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_permission(mut self, permission_id: impl Into<String>) -> Self {
        self.permissions.push(permission_id.into());
        self
    }
}

/// Response to service account creation.
///
/// This is the only time the API reveals the account's secret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedServiceAccount {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub access_key: String,

    #[serde(default)]
    pub secret: String,

    #[serde(default)]
    pub expiration_date: String,
}

/// Request body for updating a service account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceAccountRequest {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

/// A service account as reported by list and get calls.
///
/// Depending on the endpoint, some fields are left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccount {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub expiration_date: String,

    #[serde(default)]
    pub ready_state: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}
