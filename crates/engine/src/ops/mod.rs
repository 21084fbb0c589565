use sea_orm::DatabaseConnection;

use crate::convert::{CurrencyConverter, FixedRates};

mod balances;
mod notifications;
mod quotas;
mod receipts;
mod settlement;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The expense-split ledger.
///
/// Holds only the database handle and the currency converter; every read is
/// recomputed from the store, so concurrent server tasks can share one
/// `Engine` behind an `Arc` without additional locking.
pub struct Engine {
    database: DatabaseConnection,
    converter: Box<dyn CurrencyConverter>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_email(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    converter: Box<dyn CurrencyConverter>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            converter: Box::new(FixedRates),
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the currency converter (defaults to the fixed rate table).
    pub fn converter(mut self, converter: Box<dyn CurrencyConverter>) -> EngineBuilder {
        self.converter = converter;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
            converter: self.converter,
        }
    }
}
