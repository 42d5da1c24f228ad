//! Conversion of raw JSON submissions into scoring-ready [`Receipt`] values.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::domain::{Amount, AmountParseError, Receipt, ReceiptItem};

/// Receipt exactly as submitted over the API, before any checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSubmission {
    pub retailer: String,
    pub purchase_date: String,
    pub purchase_time: String,
    pub items: Vec<ItemSubmission>,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSubmission {
    pub short_description: String,
    pub price: PriceInput,
}

/// Item prices arrive either as `"6.49"` or as a bare JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Text(String),
    Number(serde_json::Number),
}

impl PriceInput {
    fn to_amount(&self) -> Result<Amount, AmountParseError> {
        match self {
            PriceInput::Text(raw) => raw.trim().parse(),
            PriceInput::Number(number) => Amount::from_number_text(&number.to_string()),
        }
    }
}

impl From<&str> for PriceInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReceiptValidationError {
    #[error("retailer must not be empty")]
    EmptyRetailer,
    #[error("retailer '{0}' contains unsupported characters")]
    InvalidRetailer(String),
    #[error("purchaseDate '{0}' must be a YYYY-MM-DD date")]
    InvalidPurchaseDate(String),
    #[error("purchaseTime '{0}' must be a 24-hour HH:MM time")]
    InvalidPurchaseTime(String),
    #[error("receipt must list at least one item")]
    NoItems,
    #[error("item {index} has an empty shortDescription")]
    EmptyDescription { index: usize },
    #[error("item {index} price is invalid: {source}")]
    InvalidPrice {
        index: usize,
        #[source]
        source: AmountParseError,
    },
    #[error("total is invalid: {0}")]
    InvalidTotal(#[source] AmountParseError),
}

fn is_retailer_char(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '&')
}

fn parse_date(raw: &str) -> Result<NaiveDate, ReceiptValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ReceiptValidationError::InvalidPurchaseDate(raw.to_string()))
}

fn parse_time(raw: &str) -> Result<NaiveTime, ReceiptValidationError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| ReceiptValidationError::InvalidPurchaseTime(raw.to_string()))
}

fn validate_item(
    index: usize,
    item: ItemSubmission,
) -> Result<ReceiptItem, ReceiptValidationError> {
    if item.short_description.trim().is_empty() {
        return Err(ReceiptValidationError::EmptyDescription { index });
    }

    let price = item
        .price
        .to_amount()
        .map_err(|source| ReceiptValidationError::InvalidPrice { index, source })?;

    Ok(ReceiptItem {
        short_description: item.short_description,
        price,
    })
}

impl TryFrom<ReceiptSubmission> for Receipt {
    type Error = ReceiptValidationError;

    fn try_from(submission: ReceiptSubmission) -> Result<Self, Self::Error> {
        let ReceiptSubmission {
            retailer,
            purchase_date,
            purchase_time,
            items,
            total,
        } = submission;

        if retailer.trim().is_empty() {
            return Err(ReceiptValidationError::EmptyRetailer);
        }
        if !retailer.chars().all(is_retailer_char) {
            return Err(ReceiptValidationError::InvalidRetailer(retailer));
        }

        let purchase_date = parse_date(&purchase_date)?;
        let purchase_time = parse_time(&purchase_time)?;

        if items.is_empty() {
            return Err(ReceiptValidationError::NoItems);
        }
        let items = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| validate_item(index, item))
            .collect::<Result<Vec<_>, _>>()?;

        let total = total
            .trim()
            .parse::<Amount>()
            .map_err(ReceiptValidationError::InvalidTotal)?;

        Ok(Receipt {
            retailer,
            purchase_date,
            purchase_time,
            items,
            total,
        })
    }
}
