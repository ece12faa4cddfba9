//! Integration tests for the vendor CRUD HTTP surface.

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{authed_request, response_json, send, setup_test_app, vendor_payload};

#[tokio::test]
async fn create_then_get_round_trip() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let response = send(
        &app,
        authed_request(
            "POST",
            "/vendors",
            "u1@example.com",
            Some(json!({
                "vendorName": "Acme",
                "bankAccountNo": "123",
                "bankName": "X Bank",
                "addressLine2": "Line2"
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response
        .headers()
        .get("Location")
        .unwrap()
        .to_str()?
        .to_string();
    assert!(location.starts_with("/vendors/"));

    let created = response_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert!(id.parse::<Uuid>().is_ok());
    assert_eq!(created["vendorName"], "Acme");
    assert_eq!(created["bankAccountNo"], "123");
    assert_eq!(created["bankName"], "X Bank");
    assert_eq!(created["addressLine2"], "Line2");
    assert_eq!(created["createdBy"], "u1@example.com");
    assert_eq!(location, format!("/vendors/{}", id));

    let response = send(
        &app,
        authed_request("GET", &format!("/vendors/{}", id), "u1@example.com", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let fetched = response_json(response).await;
    assert_eq!(fetched["id"], id.as_str());
    assert_eq!(fetched["vendorName"], "Acme");
    assert_eq!(fetched["bankAccountNo"], "123");

    Ok(())
}

#[tokio::test]
async fn create_trims_whitespace_before_persisting() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let response = send(
        &app,
        authed_request(
            "POST",
            "/vendors",
            "u1@example.com",
            Some(json!({
                "vendorName": " Acme ",
                "bankAccountNo": " 123 ",
                "bankName": " X Bank ",
                "addressLine1": "  1 Main St ",
                "addressLine2": " Line2 "
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = response_json(response).await;
    assert_eq!(created["vendorName"], "Acme");
    assert_eq!(created["bankAccountNo"], "123");
    assert_eq!(created["bankName"], "X Bank");
    assert_eq!(created["addressLine1"], "1 Main St");
    assert_eq!(created["addressLine2"], "Line2");
    assert_eq!(created["city"], "");

    Ok(())
}

#[tokio::test]
async fn create_rejects_missing_required_fields() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let response = send(
        &app,
        authed_request(
            "POST",
            "/vendors",
            "u1@example.com",
            Some(json!({
                "vendorName": "Acme",
                "addressLine2": "   "
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error = response_json(response).await;
    assert_eq!(error["code"], "VALIDATION_FAILED");
    assert!(error["details"]["bankAccountNo"].is_string());
    assert!(error["details"]["bankName"].is_string());
    assert!(error["details"]["addressLine2"].is_string());

    Ok(())
}

#[tokio::test]
async fn duplicate_bank_account_for_same_owner_conflicts() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let response = send(
        &app,
        authed_request(
            "POST",
            "/vendors",
            "u1@example.com",
            Some(vendor_payload("Acme", "123")),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Equal after trimming counts as a duplicate
    let response = send(
        &app,
        authed_request(
            "POST",
            "/vendors",
            "u1@example.com",
            Some(vendor_payload("Other", " 123 ")),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let error = response_json(response).await;
    assert_eq!(error["code"], "CONFLICT");

    Ok(())
}

#[tokio::test]
async fn update_replaces_fields_and_checks_uniqueness() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let first = response_json(
        send(
            &app,
            authed_request(
                "POST",
                "/vendors",
                "u1@example.com",
                Some(vendor_payload("Acme", "123")),
            ),
        )
        .await,
    )
    .await;
    let second = response_json(
        send(
            &app,
            authed_request(
                "POST",
                "/vendors",
                "u1@example.com",
                Some(vendor_payload("Beta", "456")),
            ),
        )
        .await,
    )
    .await;
    let second_id = second["id"].as_str().unwrap();

    // Taking the first vendor's account number conflicts
    let response = send(
        &app,
        authed_request(
            "PUT",
            &format!("/vendors/{}", second_id),
            "u1@example.com",
            Some(vendor_payload("Beta", "123")),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Keeping its own account number never conflicts
    let response = send(
        &app,
        authed_request(
            "PUT",
            &format!("/vendors/{}", second_id),
            "u1@example.com",
            Some(vendor_payload("Beta Renamed", "456")),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = response_json(response).await;
    assert_eq!(updated["vendorName"], "Beta Renamed");
    assert_eq!(updated["bankAccountNo"], "456");
    assert_eq!(updated["createdAt"], second["createdAt"]);
    assert_eq!(updated["createdBy"], "u1@example.com");

    // A free account number is accepted
    let response = send(
        &app,
        authed_request(
            "PUT",
            &format!("/vendors/{}", second_id),
            "u1@example.com",
            Some(vendor_payload("Beta Renamed", "789")),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let _ = first;
    Ok(())
}

#[tokio::test]
async fn update_validates_id_and_fields() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let response = send(
        &app,
        authed_request(
            "PUT",
            "/vendors/not-a-uuid",
            "u1@example.com",
            Some(vendor_payload("Acme", "123")),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        authed_request(
            "PUT",
            &format!("/vendors/{}", Uuid::new_v4()),
            "u1@example.com",
            Some(json!({ "vendorName": "Acme" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        authed_request(
            "PUT",
            &format!("/vendors/{}", Uuid::new_v4()),
            "u1@example.com",
            Some(vendor_payload("Acme", "123")),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn delete_returns_confirmation_and_removes_record() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let created = response_json(
        send(
            &app,
            authed_request(
                "POST",
                "/vendors",
                "u1@example.com",
                Some(vendor_payload("Acme", "123")),
            ),
        )
        .await,
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = send(
        &app,
        authed_request("DELETE", &format!("/vendors/{}", id), "u1@example.com", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let confirmation = response_json(response).await;
    assert_eq!(confirmation["message"], "Vendor deleted successfully");
    assert_eq!(confirmation["deletedVendor"]["id"], id.as_str());
    assert_eq!(confirmation["deletedVendor"]["vendorName"], "Acme");

    let response = send(
        &app,
        authed_request("GET", &format!("/vendors/{}", id), "u1@example.com", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn delete_unknown_id_is_not_found_and_malformed_id_is_invalid() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let response = send(
        &app,
        authed_request(
            "DELETE",
            &format!("/vendors/{}", Uuid::new_v4()),
            "u1@example.com",
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error = response_json(response).await;
    assert_eq!(error["code"], "NOT_FOUND");

    let response = send(
        &app,
        authed_request("DELETE", "/vendors/not-a-uuid", "u1@example.com", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = response_json(response).await;
    assert_eq!(error["code"], "VALIDATION_FAILED");

    Ok(())
}

#[tokio::test]
async fn list_paginates_with_metadata() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    for i in 0..15 {
        let response = send(
            &app,
            authed_request(
                "POST",
                "/vendors",
                "u1@example.com",
                Some(vendor_payload(
                    &format!("Vendor {i:02}"),
                    &format!("acct-{i:02}"),
                )),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(
        &app,
        authed_request("GET", "/vendors?page=1&limit=10", "u1@example.com", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["vendors"].as_array().unwrap().len(), 10);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["total"], 15);
    assert_eq!(body["pagination"]["totalPages"], 2);
    assert_eq!(body["pagination"]["hasNext"], true);
    assert_eq!(body["pagination"]["hasPrev"], false);

    // Newest first: the most recently created vendor leads the listing
    assert_eq!(body["vendors"][0]["vendorName"], "Vendor 14");

    let response = send(
        &app,
        authed_request("GET", "/vendors?page=2&limit=10", "u1@example.com", None),
    )
    .await;
    let body = response_json(response).await;
    assert_eq!(body["vendors"].as_array().unwrap().len(), 5);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["totalPages"], 2);
    assert_eq!(body["pagination"]["hasNext"], false);
    assert_eq!(body["pagination"]["hasPrev"], true);

    Ok(())
}

#[tokio::test]
async fn list_defaults_and_caps_page_parameters() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    for i in 0..12 {
        send(
            &app,
            authed_request(
                "POST",
                "/vendors",
                "u1@example.com",
                Some(vendor_payload(
                    &format!("Vendor {i:02}"),
                    &format!("acct-{i:02}"),
                )),
            ),
        )
        .await;
    }

    // Non-numeric parameters fall back to page=1, limit=10
    let response = send(
        &app,
        authed_request(
            "GET",
            "/vendors?page=abc&limit=nope",
            "u1@example.com",
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["vendors"].as_array().unwrap().len(), 10);
    assert_eq!(body["pagination"]["page"], 1);

    // Absent parameters use the defaults
    let response = send(&app, authed_request("GET", "/vendors", "u1@example.com", None)).await;
    let body = response_json(response).await;
    assert_eq!(body["vendors"].as_array().unwrap().len(), 10);

    // An oversized limit is capped at the configured maximum (100)
    let response = send(
        &app,
        authed_request("GET", "/vendors?limit=100000", "u1@example.com", None),
    )
    .await;
    let body = response_json(response).await;
    assert_eq!(body["vendors"].as_array().unwrap().len(), 12);
    assert_eq!(body["pagination"]["totalPages"], 1);

    Ok(())
}

#[tokio::test]
async fn list_survives_extreme_page_numbers() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    for i in 0..3 {
        send(
            &app,
            authed_request(
                "POST",
                "/vendors",
                "u1@example.com",
                Some(vendor_payload(
                    &format!("Vendor {i}"),
                    &format!("acct-{i}"),
                )),
            ),
        )
        .await;
    }

    // A page number at the top of the u64 range must not overflow the
    // pagination arithmetic; it simply lands past the end of the data
    let response = send(
        &app,
        authed_request(
            "GET",
            &format!("/vendors?page={}&limit=10", u64::MAX),
            "u1@example.com",
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert!(body["vendors"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["page"], u64::MAX);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["hasNext"], false);
    assert_eq!(body["pagination"]["hasPrev"], true);

    Ok(())
}

#[tokio::test]
async fn list_on_empty_store_returns_zero_counts() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let response = send(&app, authed_request("GET", "/vendors", "u1@example.com", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert!(body["vendors"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 0);
    assert_eq!(body["pagination"]["totalPages"], 0);
    assert_eq!(body["pagination"]["hasNext"], false);
    assert_eq!(body["pagination"]["hasPrev"], false);

    Ok(())
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    // No Authorization header at all
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/vendors")
        .header("X-Owner-Id", "u1@example.com")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Valid token but no resolvable owner identity
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/vendors")
        .header(
            "Authorization",
            format!("Bearer {}", test_utils::TEST_TOKEN),
        )
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = response_json(response).await;
    assert_eq!(error["code"], "UNAUTHORIZED");

    Ok(())
}

#[tokio::test]
async fn root_and_health_are_public() -> Result<()> {
    let (app, _db) = setup_test_app().await?;

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["service"], "vendor-registry");

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
