use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Reward points awarded to a receipt.
pub type Points = u64;

/// Opaque identifier handed back to callers after a receipt is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReceiptId(pub String);

impl ReceiptId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ReceiptId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ReceiptId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Non-negative money value with exactly two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// True when the amount carries no cents.
    pub fn is_whole(&self) -> bool {
        self.0.fract().is_zero()
    }

    pub fn is_multiple_of(&self, step: Decimal) -> bool {
        if step.is_zero() {
            return false;
        }
        (self.0 % step).is_zero()
    }

    /// `ceil(amount * ratio)` as whole points, saturating on overflow.
    pub fn ceil_share(&self, ratio: Decimal) -> Points {
        self.0
            .checked_mul(ratio)
            .and_then(|share| share.ceil().to_u64())
            .unwrap_or(Points::MAX)
    }

    /// Parse the text of a JSON number, allowing zero to two fractional digits.
    pub fn from_number_text(raw: &str) -> Result<Self, AmountParseError> {
        let (whole, cents) = match raw.split_once('.') {
            Some((_, "")) => return Err(AmountParseError::Format(raw.to_string())),
            Some(parts) => parts,
            None => (raw, ""),
        };
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !digits(whole) || !digits(cents) || cents.len() > 2 {
            return Err(AmountParseError::Format(raw.to_string()));
        }

        let mut value =
            Decimal::from_str(raw).map_err(|_| AmountParseError::OutOfRange(raw.to_string()))?;
        value.rescale(2);
        Ok(Self(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (whole, cents) = raw
            .split_once('.')
            .ok_or_else(|| AmountParseError::Format(raw.to_string()))?;

        let digits_only = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits_only(whole) || !digits_only(cents) || cents.len() != 2 {
            return Err(AmountParseError::Format(raw.to_string()));
        }

        Decimal::from_str(raw)
            .map(Self)
            .map_err(|_| AmountParseError::OutOfRange(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountParseError {
    #[error("amount '{0}' must look like 12.34")]
    Format(String),
    #[error("amount '{0}' is too large")]
    OutOfRange(String),
}

/// Single purchased line on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub short_description: String,
    pub price: Amount,
}

/// Validated receipt ready for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub retailer: String,
    pub purchase_date: NaiveDate,
    pub purchase_time: NaiveTime,
    pub items: Vec<ReceiptItem>,
    pub total: Amount,
}

/// Stored association between an issued identifier and the points it earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredReceipt {
    pub id: ReceiptId,
    pub points: Points,
}
