//! # Currency Types
//!
//! Supported currencies and the per-currency charge floors the orchestrator
//! validates against before any provider call.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::BillingError;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    MXN,
}

impl Currency {
    /// Returns the ISO 4217 currency code in the lowercase wire form
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::JPY => "jpy",
            Currency::CAD => "cad",
            Currency::AUD => "aud",
            Currency::CHF => "chf",
            Currency::MXN => "mxn",
        }
    }

    /// Smallest chargeable amount in minor units (Stripe's documented minimums)
    pub fn minimum_charge(&self) -> i64 {
        match self {
            Currency::USD => 50,
            Currency::EUR => 50,
            Currency::GBP => 30,
            Currency::JPY => 50,
            Currency::CAD => 50,
            Currency::AUD => 50,
            Currency::CHF => 50,
            Currency::MXN => 1000,
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::GBP
    }
}

impl FromStr for Currency {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usd" => Ok(Currency::USD),
            "eur" => Ok(Currency::EUR),
            "gbp" => Ok(Currency::GBP),
            "jpy" => Ok(Currency::JPY),
            "cad" => Ok(Currency::CAD),
            "aud" => Ok(Currency::AUD),
            "chf" => Ok(Currency::CHF),
            "mxn" => Ok(Currency::MXN),
            other => Err(BillingError::UnsupportedCurrency {
                currency: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}
