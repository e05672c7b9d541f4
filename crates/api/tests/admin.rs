//! Management API operations against a mock API

mod support;

use lc_core::admin::{
    Action, CreateServiceAccountRequest, ManagementApi, Month, MonthYear, Permission,
    PermissionType, UpdateServiceAccountRequest,
};
use lc_core::{Error, ErrorCatalog, KnownError};
use serde_json::json;
use support::{api_path, connected_client};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_create_service_account() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("POST"))
        .and(path(api_path("/service-accounts")))
        .and(header("authorization", "Bearer abc"))
        .and(body_json(json!({
            "name": "backup",
            "description": "nightly backups",
            "permissions": ["p-1"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "sa-1",
            "accessKey": "AK",
            "secret": "SK",
            "expirationDate": "2027-01-01T00:00:00Z",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateServiceAccountRequest::new("backup")
        .with_description("nightly backups")
        .with_permission("p-1");
    let created = client.create_service_account(&request).await.unwrap();

    assert_eq!(created.id, "sa-1");
    assert_eq!(created.access_key, "AK");
    assert_eq!(created.secret, "SK");
}

#[tokio::test]
async fn test_list_and_get_service_accounts() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("GET"))
        .and(path(api_path("/service-accounts")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "sa-1", "name": "backup", "enabled": true},
            {"id": "sa-2", "name": "reports", "enabled": false},
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/service-accounts/sa-2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "sa-2",
            "name": "reports",
            "enabled": false,
            "permissions": ["p-1", "p-2"],
        })))
        .mount(&server)
        .await;

    let accounts = client.list_service_accounts().await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert!(accounts[0].enabled);

    let account = client.get_service_account("sa-2").await.unwrap();
    assert_eq!(account.name, "reports");
    assert_eq!(account.permissions, vec!["p-1", "p-2"]);
}

#[tokio::test]
async fn test_update_enable_disable_delete_service_account() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("PUT"))
        .and(path(api_path("/service-accounts/sa-1")))
        .and(body_json(json!({"name": "renamed", "permissions": ["p-3"]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("/service-accounts/sa-1/enabled")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api_path("/service-accounts/sa-1/enabled")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api_path("/service-accounts/sa-1")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let update = UpdateServiceAccountRequest {
        name: "renamed".to_string(),
        permissions: vec!["p-3".to_string()],
        ..Default::default()
    };
    client.update_service_account("sa-1", &update).await.unwrap();
    client.enable_service_account("sa-1").await.unwrap();
    client.disable_service_account("sa-1").await.unwrap();
    client.delete_service_account("sa-1").await.unwrap();
}

#[tokio::test]
async fn test_permission_crud() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("POST"))
        .and(path(api_path("/permissions")))
        .and(body_json(json!({
            "name": "logs-ro",
            "type": "bucket-names",
            "actions": "read-only",
            "buckets": ["logs"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "p-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/permissions/p-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p-1",
            "name": "logs-ro",
            "type": "bucket-names",
            "readyState": true,
            "actions": "read-only",
            "buckets": ["logs"],
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(api_path("/permissions/p-1")))
        .and(body_json(json!({
            "name": "logs-all",
            "type": "bucket-names",
            "actions": "all-operations",
            "buckets": ["logs"],
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .create_permission(&Permission::for_buckets("logs-ro", Action::ReadOnly, ["logs"]))
        .await
        .unwrap();
    assert_eq!(created.id, "p-1");

    let fetched = client.get_permission("p-1").await.unwrap();
    assert_eq!(fetched.permission_type, Some(PermissionType::BucketNames));
    assert!(fetched.ready_state);

    let updated = Permission::for_buckets("logs-all", Action::AllOperations, ["logs"]);
    client.update_permission("p-1", &updated).await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_permission() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("DELETE"))
        .and(path(api_path("/permissions/gone")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "PermissionNotFound",
            "message": "Permission was not found",
        })))
        .mount(&server)
        .await;

    let err = client.delete_permission("gone").await.unwrap_err();

    assert_eq!(err.api_code(), Some("PermissionNotFound"));
    assert_eq!(err.http_status(), Some(404));
    assert_eq!(
        err.classify(client.error_catalog()),
        Some(KnownError::PermissionNotFound)
    );
}

#[tokio::test]
async fn test_duplicate_permission_name() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("POST"))
        .and(path(api_path("/permissions")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "PermissionNameAlreadyExists",
            "message": "Permission name already exists",
        })))
        .mount(&server)
        .await;

    let err = client
        .create_permission(&Permission::for_buckets("dup", Action::WriteOnly, ["b"]))
        .await
        .unwrap_err();

    assert_eq!(
        err.classify(&ErrorCatalog::default()),
        Some(KnownError::PermissionExists)
    );
    assert_eq!(err.classify(&ErrorCatalog::empty()), None);
}

#[tokio::test]
async fn test_policy_permission_requires_document() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("POST"))
        .and(path(api_path("/permissions")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "p-9"})))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .create_permission(&Permission::for_policy("custom", ""))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::PolicyMissing));
}

#[tokio::test]
async fn test_monthly_usage_query() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("GET"))
        .and(path(api_path("/usage/monthly")))
        .and(query_param("fromMonth", "6"))
        .and(query_param("fromYear", "2023"))
        .and(query_param("toMonth", "8"))
        .and(query_param("toYear", "2023"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "usageByBucket": [
                {"year": 2023, "month": 6, "totalUsageGB": 1.0},
                {"year": 2023, "month": 7, "totalUsageGB": 2.0},
                {"year": 2023, "month": 8, "totalUsageGB": 3.0},
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let usage = client
        .monthly_usage(
            MonthYear::new(Month::June, 2023),
            MonthYear::new(Month::August, 2023),
        )
        .await
        .unwrap();

    assert_eq!(usage.usage_by_bucket.len(), 3);
    assert_eq!(usage.usage_by_bucket[2].month, Some(Month::August));
    assert_eq!(usage.usage_by_bucket[2].total_usage_gb, 3.0);
}

#[tokio::test]
async fn test_current_usage() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    Mock::given(method("GET"))
        .and(path(api_path("/usage/current")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "usageByBucket": {
                "numBuckets": 2,
                "totalUsageGB": 1.5,
                "buckets": [
                    {"name": "logs", "usageGB": 1.0},
                    {"name": "media", "usageGB": 0.5},
                ],
            },
            "usageBySubAccount": {"totalUsageGB": 0.0},
        })))
        .mount(&server)
        .await;

    let usage = client.current_usage().await.unwrap();
    assert_eq!(usage.usage_by_bucket.num_buckets, Some(2));
    assert_eq!(usage.usage_by_bucket.bytes_used_combined(), 1_500_000_000);
    assert!(usage.usage_by_sub_account.sub_accounts.is_empty());
}
