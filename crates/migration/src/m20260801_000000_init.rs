//! Initial schema migration - creates all tables from scratch.
//!
//! Complete schema for the expense-split ledger:
//!
//! - `users`: authentication
//! - `receipts`: receipt headers, one per upload
//! - `line_items`: categorized items belonging to a receipt
//! - `warranty_info`: optional warranty tracking row per receipt
//! - `split_info`: split header (payer, strategy) per receipt
//! - `split_participants`: per-person share and settlement status
//! - `item_assignments`: item ownership for custom splits
//! - `user_quotas`: per-category monthly budgets
//! - `notifications`: settlement and spending alerts

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Email,
    Password,
    DisplayName,
    CreatedAt,
}

#[derive(Iden)]
enum Receipts {
    Table,
    Id,
    UserEmail,
    MerchantName,
    TransactionDate,
    TotalMinor,
    Currency,
    CreatedAt,
}

#[derive(Iden)]
enum LineItems {
    Table,
    Id,
    ReceiptId,
    Description,
    Quantity,
    PriceMinor,
    Category,
}

#[derive(Iden)]
enum WarrantyInfo {
    Table,
    ReceiptId,
    IsTracked,
    EndDate,
    DaysRemaining,
}

#[derive(Iden)]
enum SplitInfo {
    Table,
    Id,
    ReceiptId,
    PayerEmail,
    Strategy,
}

#[derive(Iden)]
enum SplitParticipants {
    Table,
    Id,
    SplitInfoId,
    Email,
    ShareMinor,
    PaidMinor,
    OwesMinor,
    Status,
}

#[derive(Iden)]
enum ItemAssignments {
    Table,
    Id,
    SplitInfoId,
    LineItemId,
    AssignedTo,
}

#[derive(Iden)]
enum UserQuotas {
    Table,
    Id,
    UserEmail,
    Category,
    AmountMinor,
    UpdatedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    UserEmail,
    Title,
    Message,
    Kind,
    IsRead,
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
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Receipts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Receipts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Receipts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Receipts::UserEmail).string().not_null())
                    .col(ColumnDef::new(Receipts::MerchantName).string().not_null())
                    .col(ColumnDef::new(Receipts::TransactionDate).date().not_null())
                    .col(ColumnDef::new(Receipts::TotalMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Receipts::Currency)
                            .string()
                            .not_null()
                            .default("INR"),
                    )
                    .col(ColumnDef::new(Receipts::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-receipts-user_email-transaction_date")
                    .table(Receipts::Table)
                    .col(Receipts::UserEmail)
                    .col(Receipts::TransactionDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Line items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LineItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LineItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LineItems::ReceiptId).string().not_null())
                    .col(ColumnDef::new(LineItems::Description).string().not_null())
                    .col(ColumnDef::new(LineItems::Quantity).double().not_null())
                    .col(
                        ColumnDef::new(LineItems::PriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LineItems::Category).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-line_items-receipt_id")
                            .from(LineItems::Table, LineItems::ReceiptId)
                            .to(Receipts::Table, Receipts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-line_items-receipt_id")
                    .table(LineItems::Table)
                    .col(LineItems::ReceiptId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Warranty info
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(WarrantyInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WarrantyInfo::ReceiptId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WarrantyInfo::IsTracked).boolean().not_null())
                    .col(ColumnDef::new(WarrantyInfo::EndDate).date())
                    .col(ColumnDef::new(WarrantyInfo::DaysRemaining).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-warranty_info-receipt_id")
                            .from(WarrantyInfo::Table, WarrantyInfo::ReceiptId)
                            .to(Receipts::Table, Receipts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Split info
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SplitInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SplitInfo::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SplitInfo::ReceiptId).string().not_null())
                    .col(ColumnDef::new(SplitInfo::PayerEmail).string().not_null())
                    .col(ColumnDef::new(SplitInfo::Strategy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-split_info-receipt_id")
                            .from(SplitInfo::Table, SplitInfo::ReceiptId)
                            .to(Receipts::Table, Receipts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-split_info-receipt_id-unique")
                    .table(SplitInfo::Table)
                    .col(SplitInfo::ReceiptId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Split participants
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SplitParticipants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SplitParticipants::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SplitParticipants::SplitInfoId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SplitParticipants::Email).string().not_null())
                    .col(
                        ColumnDef::new(SplitParticipants::ShareMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SplitParticipants::PaidMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SplitParticipants::OwesMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SplitParticipants::Status).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-split_participants-split_info_id")
                            .from(SplitParticipants::Table, SplitParticipants::SplitInfoId)
                            .to(SplitInfo::Table, SplitInfo::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-split_participants-split_info_id-email-unique")
                    .table(SplitParticipants::Table)
                    .col(SplitParticipants::SplitInfoId)
                    .col(SplitParticipants::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-split_participants-email")
                    .table(SplitParticipants::Table)
                    .col(SplitParticipants::Email)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Item assignments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ItemAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItemAssignments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ItemAssignments::SplitInfoId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ItemAssignments::LineItemId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ItemAssignments::AssignedTo).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-item_assignments-split_info_id")
                            .from(ItemAssignments::Table, ItemAssignments::SplitInfoId)
                            .to(SplitInfo::Table, SplitInfo::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-item_assignments-split_info_id")
                    .table(ItemAssignments::Table)
                    .col(ItemAssignments::SplitInfoId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. User quotas
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(UserQuotas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserQuotas::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserQuotas::UserEmail).string().not_null())
                    .col(ColumnDef::new(UserQuotas::Category).string().not_null())
                    .col(
                        ColumnDef::new(UserQuotas::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserQuotas::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-user_quotas-user_email-category-unique")
                    .table(UserQuotas::Table)
                    .col(UserQuotas::UserEmail)
                    .col(UserQuotas::Category)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Notifications
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserEmail).string().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).string().not_null())
                    .col(ColumnDef::new(Notifications::Kind).string().not_null())
                    .col(ColumnDef::new(Notifications::IsRead).boolean().not_null())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-notifications-user_email-created_at")
                    .table(Notifications::Table)
                    .col(Notifications::UserEmail)
                    .col(Notifications::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserQuotas::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ItemAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SplitParticipants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SplitInfo::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WarrantyInfo::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LineItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Receipts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
