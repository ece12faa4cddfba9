//! Vendor entity model
//!
//! This module contains the SeaORM entity model for the vendors table, which
//! stores owner-scoped vendor records with bank and address details.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Vendor record owned by exactly one identity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    /// Unique identifier for the vendor (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Display name of the vendor
    pub vendor_name: String,

    /// Bank account number, unique per owner
    pub bank_account_no: String,

    /// Name of the vendor's bank
    pub bank_name: String,

    /// First address line (optional, empty string when absent)
    pub address_line1: String,

    /// Second address line (required)
    pub address_line2: String,

    /// City (optional, empty string when absent)
    pub city: String,

    /// Country (optional, empty string when absent)
    pub country: String,

    /// Zip code (optional, empty string when absent)
    pub zip_code: String,

    /// Identity of the owner who created this vendor; immutable
    pub created_by: String,

    /// Timestamp when the vendor was created; immutable
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp refreshed on every mutation
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
