//! # Data Models
//!
//! This module contains all the data models used throughout the Vendor Registry API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod vendor;

pub use vendor::Entity as Vendor;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "vendor-registry".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
