use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Currency of prices as submitted. Everything the server returns is INR.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
    Gbp,
    Jpy,
    Aud,
    Cad,
}

pub mod receipt {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Category {
        Home,
        Food,
        Health,
        Restaurant,
        Shopping,
        Travel,
        Entertainment,
        Fuel,
        Other,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LineItemNew {
        /// Client-chosen id, referenced by custom-split assignments.
        pub id: Uuid,
        pub description: String,
        pub quantity: f64,
        /// Minor units of the receipt's currency.
        pub price_minor: i64,
        pub category: Category,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptNew {
        pub merchant_name: String,
        pub transaction_date: NaiveDate,
        pub currency: Option<Currency>,
        pub line_items: Vec<LineItemNew>,
        pub track_warranty: Option<bool>,
        pub split: Option<super::split::SplitNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LineItemView {
        pub id: Uuid,
        pub description: String,
        pub quantity: f64,
        /// INR minor units after conversion.
        pub price_minor: i64,
        pub category: Category,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WarrantyView {
        pub is_tracked: bool,
        pub end_date: Option<NaiveDate>,
        pub days_remaining: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptView {
        pub id: Uuid,
        pub user_email: String,
        pub merchant_name: String,
        pub transaction_date: NaiveDate,
        /// INR minor units.
        pub total_minor: i64,
        pub line_items: Vec<LineItemView>,
        pub warranty: Option<WarrantyView>,
        pub split: Option<super::split::SplitView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptCreated {
        pub id: Uuid,
        /// Spending alert fired by this receipt, if any.
        pub alert: Option<super::quota::AlertView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptListResponse {
        pub receipts: Vec<ReceiptView>,
    }
}

pub mod split {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SplitStrategy {
        Equal,
        Custom,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SettlementStatus {
        Unsettled,
        Pending,
        Settled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemAssignmentNew {
        pub line_item_id: Uuid,
        pub assigned_to: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitNew {
        /// Counterparty emails; the uploader is the payer and is implied.
        pub participants: Vec<String>,
        pub strategy: SplitStrategy,
        /// Required for `custom`, ignored for `equal`.
        pub assignments: Option<Vec<ItemAssignmentNew>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantView {
        pub email: String,
        pub share_minor: i64,
        pub paid_minor: i64,
        pub owes_minor: i64,
        pub status: SettlementStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitView {
        pub payer: String,
        pub strategy: SplitStrategy,
        pub participants: Vec<ParticipantView>,
    }

    /// Request body for the payer confirming a participant's settlement.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ConfirmSettlement {
        pub participant_email: String,
    }
}

pub mod balance {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Direction {
        /// The user owes the counterparty on this receipt.
        Owe,
        /// The counterparty owes the user.
        Owed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionView {
        pub receipt_id: Uuid,
        pub merchant_name: String,
        pub transaction_date: NaiveDate,
        pub amount_minor: i64,
        pub direction: Direction,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CounterpartyView {
        pub email: String,
        /// Positive when the counterparty owes the user.
        pub net_minor: i64,
        pub contributions: Vec<ContributionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalancesResponse {
        pub counterparties: Vec<CounterpartyView>,
        pub total_owed_to_user_minor: i64,
        pub total_user_owes_minor: i64,
    }
}

pub mod quota {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct QuotaUpsert {
        pub category: super::receipt::Category,
        /// INR minor units; must be >= 0.
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct QuotaView {
        pub category: super::receipt::Category,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct QuotasResponse {
        pub quotas: Vec<QuotaView>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Crossing {
        Warning,
        Exceeded,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AlertView {
        pub category: super::receipt::Category,
        pub crossing: Crossing,
        pub current_spend_minor: i64,
        pub quota_minor: i64,
    }
}

pub mod notification {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum NotificationKind {
        SplitSettlement,
        SpendingAlert,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotificationView {
        pub id: Uuid,
        pub title: String,
        pub message: String,
        pub kind: NotificationKind,
        pub is_read: bool,
        /// RFC3339 timestamp in UTC.
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotificationListResponse {
        pub notifications: Vec<NotificationView>,
    }
}
