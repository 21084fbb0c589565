use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Fixed spending categories a line item can belong to.
///
/// Quotas are configured per category, so this is a closed set rather than a
/// free-form label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

impl Category {
    /// Canonical category label used by the database and the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Food => "Food",
            Self::Health => "Health",
            Self::Restaurant => "Restaurant",
            Self::Shopping => "Shopping",
            Self::Travel => "Travel",
            Self::Entertainment => "Entertainment",
            Self::Fuel => "Fuel",
            Self::Other => "Other",
        }
    }

    /// All categories, in display order.
    pub const ALL: [Category; 9] = [
        Self::Home,
        Self::Food,
        Self::Health,
        Self::Restaurant,
        Self::Shopping,
        Self::Travel,
        Self::Entertainment,
        Self::Fuel,
        Self::Other,
    ];
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Home" => Ok(Self::Home),
            "Food" => Ok(Self::Food),
            "Health" => Ok(Self::Health),
            "Restaurant" => Ok(Self::Restaurant),
            "Shopping" => Ok(Self::Shopping),
            "Travel" => Ok(Self::Travel),
            "Entertainment" => Ok(Self::Entertainment),
            "Fuel" => Ok(Self::Fuel),
            "Other" => Ok(Self::Other),
            other => Err(EngineError::KeyNotFound(format!(
                "unknown category: {other}"
            ))),
        }
    }
}
