//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Category, Currency, item_assignments::ItemAssignment, splits::SplitStrategy};

/// A line item as submitted by the caller, priced in `CreateReceiptCmd`'s
/// currency.
#[derive(Clone, Debug)]
pub struct NewLineItem {
    /// Caller-chosen id, referenced by custom-split assignments.
    pub id: Uuid,
    pub description: String,
    pub quantity: f64,
    pub price_minor: i64,
    pub category: Category,
}

/// Split request attached to a new receipt.
#[derive(Clone, Debug)]
pub struct NewSplit {
    /// Counterparties; the uploader is added as payer automatically.
    pub participants: Vec<String>,
    pub strategy: SplitStrategy,
    /// Required for [`SplitStrategy::Custom`], ignored otherwise.
    pub assignments: Vec<ItemAssignment>,
}

/// Create a receipt (optionally shared).
#[derive(Clone, Debug)]
pub struct CreateReceiptCmd {
    pub user_email: String,
    pub merchant_name: String,
    pub transaction_date: NaiveDate,
    pub currency: Currency,
    pub line_items: Vec<NewLineItem>,
    pub track_warranty: bool,
    pub split: Option<NewSplit>,
}

impl CreateReceiptCmd {
    #[must_use]
    pub fn new(
        user_email: impl Into<String>,
        merchant_name: impl Into<String>,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            merchant_name: merchant_name.into(),
            transaction_date,
            currency: Currency::default(),
            line_items: Vec::new(),
            track_warranty: false,
            split: None,
        }
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn line_item(
        mut self,
        description: impl Into<String>,
        quantity: f64,
        price_minor: i64,
        category: Category,
    ) -> Self {
        self.line_items.push(NewLineItem {
            id: Uuid::new_v4(),
            description: description.into(),
            quantity,
            price_minor,
            category,
        });
        self
    }

    #[must_use]
    pub fn track_warranty(mut self) -> Self {
        self.track_warranty = true;
        self
    }

    #[must_use]
    pub fn split(mut self, split: NewSplit) -> Self {
        self.split = Some(split);
        self
    }
}

impl NewSplit {
    #[must_use]
    pub fn equal(participants: Vec<String>) -> Self {
        Self {
            participants,
            strategy: SplitStrategy::Equal,
            assignments: Vec::new(),
        }
    }

    #[must_use]
    pub fn custom(participants: Vec<String>, assignments: Vec<ItemAssignment>) -> Self {
        Self {
            participants,
            strategy: SplitStrategy::Custom,
            assignments,
        }
    }
}
