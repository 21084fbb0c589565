//! Expense-split ledger: share computation, balances, settlement and quotas.
//!
//! All money is stored in INR minor units (paise). Foreign-currency
//! receipts are converted once at creation time through a
//! [`CurrencyConverter`], so every downstream number is a plain `i64`.

pub use alerts::{AlertComposer, AlertMessage, PushSender};
pub use balances::{BalanceSummary, Contribution, CounterpartyBalance, Direction};
pub use categories::Category;
pub use commands::{CreateReceiptCmd, NewLineItem, NewSplit};
pub use convert::{CurrencyConverter, FixedRates};
pub use currency::Currency;
pub use error::EngineError;
pub use item_assignments::ItemAssignment;
pub use line_items::LineItem;
pub use money::MoneyMinor;
pub use notifications::{Notification, NotificationKind};
pub use ops::{Engine, EngineBuilder};
pub use optimistic::TentativeStatus;
pub use participants::{Participant, SettlementStatus};
pub use quotas::{Crossing, Quota, QuotaAlert, detect_crossing};
pub use receipts::{Receipt, WarrantyInfo};
pub use shares::compute_shares;
pub use splits::{SplitInfo, SplitStrategy};

mod alerts;
mod balances;
mod categories;
mod commands;
mod convert;
mod currency;
mod error;
mod item_assignments;
mod line_items;
mod money;
mod notifications;
mod ops;
mod optimistic;
mod participants;
mod quotas;
mod receipts;
mod shares;
mod splits;
mod warranty;

pub type ResultEngine<T> = Result<T, EngineError>;
