//! # Authentication and Authorization
//!
//! This module resolves the authenticated owner identity for protected API
//! endpoints. Service callers authenticate with a static bearer token; the
//! upstream identity provider forwards the authenticated end-user identity in
//! the `X-Owner-Id` header. Both are required, and the resolved identity is
//! passed into every handler as a request-scoped value rather than ambient
//! session state.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::IntoParams;

use crate::config::AppConfig;
use crate::error::{ApiError, unauthorized};
use crate::server::AppState;

/// Header carrying the authenticated end-user identity.
pub const OWNER_HEADER: &str = "X-Owner-Id";

/// Authenticated owner identity resolved from the request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnerIdentity(pub String);

impl OwnerIdentity {
    /// The identity string recorded as `created_by` on owned records.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.config)
    }
}

/// Authentication middleware that validates the bearer token and resolves the
/// owner identity header.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = request.headers().clone();

    let token = extract_bearer_token(&headers)?;
    validate_token(&config, token)?;

    let owner = extract_owner_identity(&headers)?;
    tracing::debug!(owner = %owner.0, "Authenticated request");

    let mut request = request;
    request.extensions_mut().insert(owner);

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized(Some("Missing Authorization header")))
        .and_then(|value| {
            value
                .to_str()
                .map_err(|_| unauthorized(Some("Invalid Authorization header")))
        })
        .and_then(|header| {
            header
                .strip_prefix("Bearer ")
                .ok_or_else(|| unauthorized(Some("Authorization header must use Bearer scheme")))
        })
}

fn validate_token(config: &AppConfig, token: &str) -> Result<(), ApiError> {
    let is_valid = config
        .api_tokens
        .iter()
        .any(|configured| ConstantTimeEq::ct_eq(token.as_bytes(), configured.as_bytes()).into());

    if is_valid {
        Ok(())
    } else {
        Err(unauthorized(Some("Invalid bearer token")))
    }
}

fn extract_owner_identity(headers: &HeaderMap) -> Result<OwnerIdentity, ApiError> {
    let header_value = headers
        .get(OWNER_HEADER)
        .ok_or_else(|| unauthorized(Some("Missing X-Owner-Id header")))?
        .to_str()
        .map_err(|_| unauthorized(Some("X-Owner-Id header must be valid UTF-8")))?;

    let identity = header_value.trim();
    if identity.is_empty() {
        return Err(unauthorized(Some("X-Owner-Id header must not be empty")));
    }

    Ok(OwnerIdentity(identity.to_string()))
}

/// OpenAPI header parameter for X-Owner-Id
#[derive(Debug, Serialize, Deserialize, IntoParams, utoipa::ToSchema)]
#[into_params(parameter_in = Header)]
pub struct OwnerHeader {
    /// Authenticated identity (email) that scopes the request to its owner
    #[serde(rename = "X-Owner-Id")]
    #[param(rename = "X-Owner-Id", value_type = String)]
    pub owner_id: String,
}

impl<S> FromRequestParts<S> for OwnerIdentity
where
    Arc<AppConfig>: FromRef<S>,
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<OwnerIdentity>()
            .cloned()
            .ok_or_else(|| unauthorized(Some("Owner identity not resolved")))
    }
}
