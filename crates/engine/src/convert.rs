//! Currency conversion at the receipt intake edge.
//!
//! Share math only makes sense once every amount is in home-currency minor
//! units, so conversion runs before [`compute_shares`] and a conversion
//! failure aborts receipt creation entirely.
//!
//! [`compute_shares`]: crate::shares::compute_shares

use crate::{Currency, EngineError};

/// Converts foreign amounts into INR minor units.
pub trait CurrencyConverter: Send + Sync {
    /// Converts `amount_minor` expressed in `from` into INR minor units.
    fn to_home(&self, amount_minor: i64, from: Currency) -> Result<i64, EngineError>;
}

/// Static conversion table.
///
/// Rates are approximate and only suitable for development; a production
/// deployment would swap in a rate-feed backed implementation of
/// [`CurrencyConverter`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedRates;

impl FixedRates {
    const fn rate_to_inr(from: Currency) -> Option<f64> {
        match from {
            Currency::Inr => Some(1.0),
            Currency::Usd => Some(83.5),
            Currency::Eur => Some(90.2),
            Currency::Gbp => Some(106.1),
            Currency::Jpy => Some(0.53),
            Currency::Aud => Some(55.4),
            Currency::Cad => Some(61.2),
        }
    }
}

impl CurrencyConverter for FixedRates {
    fn to_home(&self, amount_minor: i64, from: Currency) -> Result<i64, EngineError> {
        if from.is_home() {
            return Ok(amount_minor);
        }
        let rate = Self::rate_to_inr(from).ok_or_else(|| {
            EngineError::CurrencyMismatch(format!("no conversion rate for {from}"))
        })?;
        let converted = (amount_minor as f64 * rate).round();
        if !converted.is_finite() || converted.abs() > i64::MAX as f64 {
            return Err(EngineError::InvalidAmount(
                "converted amount out of range".to_string(),
            ));
        }
        Ok(converted as i64)
    }
}
