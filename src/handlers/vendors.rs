//! # Vendors API Handlers
//!
//! This module contains handlers for the vendor CRUD endpoints. Every handler
//! requires a resolved [`OwnerIdentity`] and scopes all store access to that
//! owner; a record owned by someone else is reported as not found.

use crate::auth::{OwnerHeader, OwnerIdentity};
use crate::error::{ApiError, conflict, not_found, validation_error};
use crate::repositories::vendor::{VendorFields, VendorRepository};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Request payload for creating or updating a vendor
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorPayload {
    /// Display name of the vendor (required)
    #[schema(example = "Acme Corp")]
    pub vendor_name: Option<String>,
    /// Bank account number, unique per owner (required)
    #[schema(example = "DE02120300000000202051")]
    pub bank_account_no: Option<String>,
    /// Name of the vendor's bank (required)
    #[schema(example = "X Bank")]
    pub bank_name: Option<String>,
    /// First address line (optional)
    pub address_line1: Option<String>,
    /// Second address line (required)
    pub address_line2: Option<String>,
    /// City (optional)
    pub city: Option<String>,
    /// Country (optional)
    pub country: Option<String>,
    /// Zip code (optional)
    pub zip_code: Option<String>,
}

/// Vendor record as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorDto {
    /// Unique identifier for the vendor
    #[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    pub vendor_name: String,
    pub bank_account_no: String,
    pub bank_name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub country: String,
    pub zip_code: String,
    /// Identity of the owner who created this vendor
    pub created_by: String,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last mutation timestamp (ISO 8601)
    pub updated_at: String,
}

fn to_rfc3339(value: DateTimeWithTimeZone) -> String {
    let utc: DateTime<Utc> = value.with_timezone(&Utc);
    utc.to_rfc3339()
}

impl From<crate::models::vendor::Model> for VendorDto {
    fn from(model: crate::models::vendor::Model) -> Self {
        Self {
            id: model.id,
            vendor_name: model.vendor_name,
            bank_account_no: model.bank_account_no,
            bank_name: model.bank_name,
            address_line1: model.address_line1,
            address_line2: model.address_line2,
            city: model.city,
            country: model.country,
            zip_code: model.zip_code,
            created_by: model.created_by,
            created_at: to_rfc3339(model.created_at),
            updated_at: to_rfc3339(model.updated_at),
        }
    }
}

/// Query parameters for vendor listing
#[derive(Debug, Default, Deserialize, Serialize, IntoParams, ToSchema)]
pub struct ListVendorsQuery {
    /// 1-based page number (default: 1; non-numeric values fall back to the default)
    pub page: Option<String>,
    /// Page size (default: 10, capped at the configured maximum)
    pub limit: Option<String>,
}

/// Pagination metadata for vendor listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDto {
    pub page: u64,
    pub total_pages: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Response wrapper for vendor listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListVendorsResponse {
    pub vendors: Vec<VendorDto>,
    pub pagination: PaginationDto,
}

/// Minimal confirmation for a deleted vendor
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedVendorDto {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub vendor_name: String,
}

/// Response for vendor deletion
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteVendorResponse {
    pub message: String,
    pub deleted_vendor: DeletedVendorDto,
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Trim all fields and require the mandatory ones to be non-empty afterwards.
fn validate_payload(payload: VendorPayload) -> Result<VendorFields, ApiError> {
    let fields = VendorFields {
        vendor_name: trimmed(payload.vendor_name),
        bank_account_no: trimmed(payload.bank_account_no),
        bank_name: trimmed(payload.bank_name),
        address_line1: trimmed(payload.address_line1),
        address_line2: trimmed(payload.address_line2),
        city: trimmed(payload.city),
        country: trimmed(payload.country),
        zip_code: trimmed(payload.zip_code),
    };

    let mut field_errors = serde_json::Map::new();
    for (name, value) in [
        ("vendorName", &fields.vendor_name),
        ("bankAccountNo", &fields.bank_account_no),
        ("bankName", &fields.bank_name),
        ("addressLine2", &fields.address_line2),
    ] {
        if value.is_empty() {
            field_errors.insert(
                name.to_string(),
                serde_json::Value::String("Required field is missing or empty".to_string()),
            );
        }
    }

    if !field_errors.is_empty() {
        return Err(validation_error(
            "Missing required fields",
            serde_json::Value::Object(field_errors),
        ));
    }

    Ok(fields)
}

fn parse_vendor_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse::<Uuid>().map_err(|_| {
        validation_error(
            "Invalid vendor ID",
            serde_json::json!({ "id": "Must be a valid UUID" }),
        )
    })
}

/// Parse a 1-based page number; absent, non-numeric, or zero values fall back to 1.
fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

/// Parse the page size; absent, non-numeric, or zero values fall back to the
/// configured default, and the result is capped at the configured maximum.
fn parse_limit(raw: Option<&str>, default_size: u64, max_size: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|limit| *limit >= 1)
        .unwrap_or(default_size)
        .min(max_size)
}

/// List the owner's vendors, newest first, with page metadata
#[utoipa::path(
    get,
    path = "/vendors",
    security(("bearer_auth" = [])),
    params(OwnerHeader, ListVendorsQuery),
    responses(
        (status = 200, description = "One page of the owner's vendors", body = ListVendorsResponse),
        (status = 401, description = "Unauthorized", body = ApiError)
    ),
    tag = "vendors"
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    Query(query): Query<ListVendorsQuery>,
) -> Result<Json<ListVendorsResponse>, ApiError> {
    let page = parse_page(query.page.as_deref());
    let limit = parse_limit(
        query.limit.as_deref(),
        state.config.default_page_size,
        state.config.max_page_size,
    );

    let repo = VendorRepository::new(&state.db);
    let result = repo.list(owner.as_str(), page, limit).await?;

    let pagination = PaginationDto {
        page,
        total_pages: result.total.div_ceil(limit),
        total: result.total,
        has_next: page
            .checked_mul(limit)
            .is_some_and(|shown| shown < result.total),
        has_prev: page > 1,
    };

    Ok(Json(ListVendorsResponse {
        vendors: result.vendors.into_iter().map(VendorDto::from).collect(),
        pagination,
    }))
}

/// Create a new vendor owned by the caller
#[utoipa::path(
    post,
    path = "/vendors",
    security(("bearer_auth" = [])),
    params(OwnerHeader),
    request_body = VendorPayload,
    responses(
        (status = 201, description = "Vendor created successfully", body = VendorDto, headers(
            ("Location", description = "URL of the created vendor")
        )),
        (status = 400, description = "Missing required fields", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 409, description = "Duplicate bank account for this owner", body = ApiError)
    ),
    tag = "vendors"
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    payload: Result<Json<VendorPayload>, JsonRejection>,
) -> Result<(StatusCode, [(&'static str, String); 1], Json<VendorDto>), ApiError> {
    let Json(payload) = payload.map_err(ApiError::from)?;
    let fields = validate_payload(payload)?;

    let repo = VendorRepository::new(&state.db);

    // Pre-check for a friendlier error message; the unique index remains the
    // source of truth, and a losing race still maps to 409 via the DbErr path.
    if repo
        .find_by_bank_account(owner.as_str(), &fields.bank_account_no, None)
        .await?
        .is_some()
    {
        return Err(conflict("Vendor with this bank account already exists"));
    }

    let vendor = repo.create(owner.as_str(), fields).await?;
    let location = format!("/vendors/{}", vendor.id);

    Ok((
        StatusCode::CREATED,
        [("Location", location)],
        Json(VendorDto::from(vendor)),
    ))
}

/// Fetch one of the owner's vendors by id
#[utoipa::path(
    get,
    path = "/vendors/{id}",
    security(("bearer_auth" = [])),
    params(
        OwnerHeader,
        ("id" = String, Path, description = "Vendor UUID")
    ),
    responses(
        (status = 200, description = "Vendor retrieved successfully", body = VendorDto),
        (status = 400, description = "Invalid vendor ID", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Vendor not found", body = ApiError)
    ),
    tag = "vendors"
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    Path(id): Path<String>,
) -> Result<Json<VendorDto>, ApiError> {
    let vendor_id = parse_vendor_id(&id)?;

    let repo = VendorRepository::new(&state.db);
    let vendor = repo
        .find_by_id(owner.as_str(), vendor_id)
        .await?
        .ok_or_else(|| not_found("Vendor not found"))?;

    Ok(Json(VendorDto::from(vendor)))
}

/// Replace all mutable fields of one of the owner's vendors
#[utoipa::path(
    put,
    path = "/vendors/{id}",
    security(("bearer_auth" = [])),
    params(
        OwnerHeader,
        ("id" = String, Path, description = "Vendor UUID")
    ),
    request_body = VendorPayload,
    responses(
        (status = 200, description = "Vendor updated successfully", body = VendorDto),
        (status = 400, description = "Invalid vendor ID or missing required fields", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Vendor not found", body = ApiError),
        (status = 409, description = "Duplicate bank account for this owner", body = ApiError)
    ),
    tag = "vendors"
)]
pub async fn update_vendor(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    Path(id): Path<String>,
    payload: Result<Json<VendorPayload>, JsonRejection>,
) -> Result<Json<VendorDto>, ApiError> {
    let vendor_id = parse_vendor_id(&id)?;
    let Json(payload) = payload.map_err(ApiError::from)?;
    let fields = validate_payload(payload)?;

    let repo = VendorRepository::new(&state.db);
    let existing = repo
        .find_by_id(owner.as_str(), vendor_id)
        .await?
        .ok_or_else(|| not_found("Vendor not found"))?;

    // Re-check uniqueness only when the account number actually changes,
    // excluding the record being updated.
    if fields.bank_account_no != existing.bank_account_no
        && repo
            .find_by_bank_account(owner.as_str(), &fields.bank_account_no, Some(vendor_id))
            .await?
            .is_some()
    {
        return Err(conflict(
            "Another vendor with this bank account already exists",
        ));
    }

    let updated = repo.update(existing, fields).await?;

    Ok(Json(VendorDto::from(updated)))
}

/// Delete one of the owner's vendors
#[utoipa::path(
    delete,
    path = "/vendors/{id}",
    security(("bearer_auth" = [])),
    params(
        OwnerHeader,
        ("id" = String, Path, description = "Vendor UUID")
    ),
    responses(
        (status = 200, description = "Vendor deleted successfully", body = DeleteVendorResponse),
        (status = 400, description = "Invalid vendor ID", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Vendor not found", body = ApiError)
    ),
    tag = "vendors"
)]
pub async fn delete_vendor(
    State(state): State<AppState>,
    owner: OwnerIdentity,
    Path(id): Path<String>,
) -> Result<Json<DeleteVendorResponse>, ApiError> {
    let vendor_id = parse_vendor_id(&id)?;

    let repo = VendorRepository::new(&state.db);
    let existing = repo
        .find_by_id(owner.as_str(), vendor_id)
        .await?
        .ok_or_else(|| not_found("Vendor not found"))?;

    let deleted_vendor = DeletedVendorDto {
        id: existing.id,
        vendor_name: existing.vendor_name.clone(),
    };

    repo.delete(existing).await?;

    Ok(Json(DeleteVendorResponse {
        message: "Vendor deleted successfully".to_string(),
        deleted_vendor,
    }))
}
