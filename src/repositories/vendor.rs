//! # Vendor Repository
//!
//! This module contains the repository implementation for Vendor entities.
//! Every method takes the owner identity as a mandatory parameter and filters
//! on `created_by`; there is no unscoped access path, so a record owned by
//! another identity is indistinguishable from a record that does not exist.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::models::vendor::{self, Entity as Vendor, Model as VendorModel};

/// Mutable vendor fields, trimmed and validated by the caller.
#[derive(Debug, Clone)]
pub struct VendorFields {
    pub vendor_name: String,
    pub bank_account_no: String,
    pub bank_name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub country: String,
    pub zip_code: String,
}

/// One page of an owner's vendors together with the owner's total count.
#[derive(Debug)]
pub struct VendorPage {
    pub vendors: Vec<VendorModel>,
    pub total: u64,
}

/// Repository for vendor database operations
pub struct VendorRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VendorRepository<'a> {
    /// Create a new VendorRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// List one page of the owner's vendors, newest first.
    ///
    /// `page` is 1-based; ordering is `created_at` descending with `id`
    /// descending as a stable tiebreak for records created in the same instant.
    pub async fn list(&self, owner: &str, page: u64, per_page: u64) -> Result<VendorPage, DbErr> {
        let paginator = Vendor::find()
            .filter(vendor::Column::CreatedBy.eq(owner))
            .order_by_desc(vendor::Column::CreatedAt)
            .order_by_desc(vendor::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;

        // Clamp the fetch index so an out-of-range page yields an empty
        // result instead of overflowing the offset computation.
        let page_index = page
            .saturating_sub(1)
            .min(total.div_ceil(per_page.max(1)));
        let vendors = paginator.fetch_page(page_index).await?;

        Ok(VendorPage { vendors, total })
    }

    /// Find a vendor by id within the owner's scope
    pub async fn find_by_id(&self, owner: &str, id: Uuid) -> Result<Option<VendorModel>, DbErr> {
        Vendor::find_by_id(id)
            .filter(vendor::Column::CreatedBy.eq(owner))
            .one(self.db)
            .await
    }

    /// Find the owner's vendor holding the given bank account number,
    /// optionally excluding one record (the record being updated).
    pub async fn find_by_bank_account(
        &self,
        owner: &str,
        bank_account_no: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<VendorModel>, DbErr> {
        let mut query = Vendor::find()
            .filter(vendor::Column::CreatedBy.eq(owner))
            .filter(vendor::Column::BankAccountNo.eq(bank_account_no));

        if let Some(excluded_id) = exclude {
            query = query.filter(vendor::Column::Id.ne(excluded_id));
        }

        query.one(self.db).await
    }

    /// Insert a new vendor owned by `owner` with `created_at = updated_at = now`
    pub async fn create(&self, owner: &str, fields: VendorFields) -> Result<VendorModel, DbErr> {
        let now = Utc::now();

        let active = vendor::ActiveModel {
            id: Set(Uuid::new_v4()),
            vendor_name: Set(fields.vendor_name),
            bank_account_no: Set(fields.bank_account_no),
            bank_name: Set(fields.bank_name),
            address_line1: Set(fields.address_line1),
            address_line2: Set(fields.address_line2),
            city: Set(fields.city),
            country: Set(fields.country),
            zip_code: Set(fields.zip_code),
            created_by: Set(owner.to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        active.insert(self.db).await
    }

    /// Replace all mutable fields of an existing vendor and refresh `updated_at`.
    ///
    /// `id`, `created_by`, and `created_at` are never touched.
    pub async fn update(
        &self,
        existing: VendorModel,
        fields: VendorFields,
    ) -> Result<VendorModel, DbErr> {
        let mut active = existing.into_active_model();
        active.vendor_name = Set(fields.vendor_name);
        active.bank_account_no = Set(fields.bank_account_no);
        active.bank_name = Set(fields.bank_name);
        active.address_line1 = Set(fields.address_line1);
        active.address_line2 = Set(fields.address_line2);
        active.city = Set(fields.city);
        active.country = Set(fields.country);
        active.zip_code = Set(fields.zip_code);
        active.updated_at = Set(Utc::now().into());

        active.update(self.db).await
    }

    /// Remove a vendor record
    pub async fn delete(&self, existing: VendorModel) -> Result<(), DbErr> {
        existing.delete(self.db).await?;
        Ok(())
    }
}
