use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Currency code attached to an incoming receipt.
///
/// The ledger itself is mono-currency: every persisted amount is in INR minor
/// units (paise). Foreign receipts pass through a [`CurrencyConverter`] before
/// any share math, so `Currency` only matters at the intake edge.
///
/// [`CurrencyConverter`]: crate::convert::CurrencyConverter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Aud => "AUD",
            Currency::Cad => "CAD",
        }
    }

    /// `true` for the home currency (no conversion needed).
    #[must_use]
    pub const fn is_home(self) -> bool {
        matches!(self, Currency::Inr)
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Currency::Inr),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "JPY" => Ok(Currency::Jpy),
            "AUD" => Ok(Currency::Aud),
            "CAD" => Ok(Currency::Cad),
            other => Err(EngineError::CurrencyMismatch(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
