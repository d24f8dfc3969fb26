//! Initial schema migration.
//!
//! Creates the complete schema for Flockbook:
//!
//! - `users`: credentials and role
//! - `batches`: production cycles owned by a user
//! - `expenses`: costs recorded against a batch
//! - `earnings`: revenue recorded against a batch
//!
//! Money and quantity columns are stored as decimal text.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(Iden)]
enum Batches {
    Table,
    Id,
    UserId,
    Name,
    Status,
    StartDate,
    EndDate,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    BatchId,
    ItemName,
    Quantity,
    CostPerUnit,
    Total,
    Category,
    IsRecurring,
    TransactionDate,
    WeekOfGiving,
    UnitLabel,
    Attachment,
    AttachmentName,
    CreatedAt,
}

#[derive(Iden)]
enum Earnings {
    Table,
    Id,
    BatchId,
    ItemName,
    Quantity,
    AmountPerUnit,
    Total,
    Category,
    TransactionDate,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("USER"),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Batches
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Batches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Batches::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Batches::UserId).string().not_null())
                    .col(ColumnDef::new(Batches::Name).string().not_null())
                    .col(
                        ColumnDef::new(Batches::Status)
                            .string()
                            .not_null()
                            .default("IN_PROGRESS"),
                    )
                    .col(ColumnDef::new(Batches::StartDate).date().not_null())
                    .col(ColumnDef::new(Batches::EndDate).date())
                    .col(ColumnDef::new(Batches::Notes).text())
                    .col(ColumnDef::new(Batches::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-batches-user_id")
                            .from(Batches::Table, Batches::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-batches-user_id")
                    .table(Batches::Table)
                    .col(Batches::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::BatchId).string().not_null())
                    .col(ColumnDef::new(Expenses::ItemName).string().not_null())
                    .col(ColumnDef::new(Expenses::Quantity).string().not_null())
                    .col(ColumnDef::new(Expenses::CostPerUnit).string().not_null())
                    .col(ColumnDef::new(Expenses::Total).string().not_null())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::IsRecurring)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Expenses::TransactionDate).date())
                    .col(ColumnDef::new(Expenses::WeekOfGiving).integer())
                    .col(ColumnDef::new(Expenses::UnitLabel).string())
                    .col(ColumnDef::new(Expenses::Attachment).string())
                    .col(ColumnDef::new(Expenses::AttachmentName).string())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-batch_id")
                            .from(Expenses::Table, Expenses::BatchId)
                            .to(Batches::Table, Batches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-batch_id")
                    .table(Expenses::Table)
                    .col(Expenses::BatchId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Earnings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Earnings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Earnings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Earnings::BatchId).string().not_null())
                    .col(ColumnDef::new(Earnings::ItemName).string().not_null())
                    .col(ColumnDef::new(Earnings::Quantity).string().not_null())
                    .col(ColumnDef::new(Earnings::AmountPerUnit).string().not_null())
                    .col(ColumnDef::new(Earnings::Total).string().not_null())
                    .col(ColumnDef::new(Earnings::Category).string().not_null())
                    .col(ColumnDef::new(Earnings::TransactionDate).date())
                    .col(ColumnDef::new(Earnings::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-earnings-batch_id")
                            .from(Earnings::Table, Earnings::BatchId)
                            .to(Batches::Table, Batches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-earnings-batch_id")
                    .table(Earnings::Table)
                    .col(Earnings::BatchId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Earnings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Batches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
