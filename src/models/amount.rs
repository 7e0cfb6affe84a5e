use std::fmt;
use std::str::FromStr;
use crate::models::error::PixError;
use crate::utils::amount::normalize_amount;

/// A strictly positive monetary value held in minor units (centavos).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    cents: u64,
}

impl Amount {
    /// Returns `None` for zero; the payment code has no meaning for a zero amount.
    pub fn from_cents(cents: u64) -> Option<Self> {
        if cents == 0 {
            None
        } else {
            Some(Self { cents })
        }
    }

    pub fn cents(&self) -> u64 {
        self.cents
    }

    /// Locale display form, e.g. `R$ 1.234,56`. Never embedded in a payload.
    pub fn to_brl_display(&self) -> String {
        let units = (self.cents / 100).to_string();
        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, digit) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }
        format!("R$ {},{:02}", grouped, self.cents % 100)
    }
}

/// Canonical form with a literal point and exactly two fractional digits.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl FromStr for Amount {
    type Err = PixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_amount(s)
    }
}
