//! Migration to create the vendors table.
//!
//! This migration creates the vendors table which stores owner-scoped vendor
//! records, with a compound unique index guaranteeing that no two vendors of
//! the same owner share a bank account number.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vendors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vendors::VendorName).text().not_null())
                    .col(ColumnDef::new(Vendors::BankAccountNo).text().not_null())
                    .col(ColumnDef::new(Vendors::BankName).text().not_null())
                    .col(
                        ColumnDef::new(Vendors::AddressLine1)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Vendors::AddressLine2).text().not_null())
                    .col(ColumnDef::new(Vendors::City).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Vendors::Country)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Vendors::ZipCode)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Vendors::CreatedBy).text().not_null())
                    .col(
                        ColumnDef::new(Vendors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Vendors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Uniqueness invariant: one bank account number per owner. The handler
        // pre-check is only a courtesy; this index is the source of truth.
        manager
            .create_index(
                Index::create()
                    .name("idx_vendors_owner_bank_account")
                    .table(Vendors::Table)
                    .col(Vendors::CreatedBy)
                    .col(Vendors::BankAccountNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index on (created_by, created_at) for owner-scoped listing queries
        manager
            .create_index(
                Index::create()
                    .name("idx_vendors_owner_created_at")
                    .table(Vendors::Table)
                    .col(Vendors::CreatedBy)
                    .col(Vendors::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes first
        manager
            .drop_index(
                Index::drop()
                    .name("idx_vendors_owner_bank_account")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_vendors_owner_created_at").to_owned())
            .await?;

        // Then drop table
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Vendors {
    Table,
    Id,
    VendorName,
    BankAccountNo,
    BankName,
    AddressLine1,
    AddressLine2,
    City,
    Country,
    ZipCode,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
