use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;

use super::super::domain::{Points, Receipt};
use super::{ScoreComponent, ScoringRule};

const ROUND_DOLLAR_POINTS: Points = 50;
const QUARTER_MULTIPLE_POINTS: Points = 25;
const ITEM_PAIR_POINTS: Points = 5;
const ODD_DAY_POINTS: Points = 6;
const AFTERNOON_POINTS: Points = 10;

fn quarter() -> Decimal {
    Decimal::new(25, 2)
}

fn description_share() -> Decimal {
    Decimal::new(2, 1)
}

pub(crate) fn score_receipt(receipt: &Receipt) -> Vec<ScoreComponent> {
    let mut components = Vec::new();

    let alphanumeric = receipt
        .retailer
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .count() as Points;
    if alphanumeric > 0 {
        components.push(ScoreComponent {
            rule: ScoringRule::RetailerName,
            points: alphanumeric,
            notes: format!(
                "{alphanumeric} alphanumeric character(s) in '{}'",
                receipt.retailer
            ),
        });
    }

    if receipt.total.is_whole() {
        components.push(ScoreComponent {
            rule: ScoringRule::RoundDollarTotal,
            points: ROUND_DOLLAR_POINTS,
            notes: format!("total {} has no cents", receipt.total),
        });
    }

    if receipt.total.is_multiple_of(quarter()) {
        components.push(ScoreComponent {
            rule: ScoringRule::QuarterMultipleTotal,
            points: QUARTER_MULTIPLE_POINTS,
            notes: format!("total {} is a multiple of 0.25", receipt.total),
        });
    }

    let pairs = (receipt.items.len() / 2) as Points;
    if pairs > 0 {
        components.push(ScoreComponent {
            rule: ScoringRule::ItemPairs,
            points: pairs.saturating_mul(ITEM_PAIR_POINTS),
            notes: format!("{pairs} pair(s) across {} item(s)", receipt.items.len()),
        });
    }

    for (index, item) in receipt.items.iter().enumerate() {
        let trimmed = item.short_description.trim();
        // Length in UTF-16 code units, so characters outside the BMP count twice.
        if trimmed.encode_utf16().count() % 3 != 0 {
            continue;
        }
        let points = item.price.ceil_share(description_share());
        if points > 0 {
            components.push(ScoreComponent {
                rule: ScoringRule::DescriptionLength,
                points,
                notes: format!(
                    "item {index} '{trimmed}' priced {} has a description length divisible by 3",
                    item.price
                ),
            });
        }
    }

    let day = receipt.purchase_date.day();
    if day % 2 == 1 {
        components.push(ScoreComponent {
            rule: ScoringRule::OddPurchaseDay,
            points: ODD_DAY_POINTS,
            notes: format!("purchased on day {day}"),
        });
    }

    let (hour, minute) = (
        receipt.purchase_time.hour(),
        receipt.purchase_time.minute(),
    );
    // 14:00 itself and 16:00 onwards earn nothing.
    if (hour == 14 && minute > 0) || hour == 15 {
        components.push(ScoreComponent {
            rule: ScoringRule::AfternoonPurchase,
            points: AFTERNOON_POINTS,
            notes: format!("purchased at {hour:02}:{minute:02}"),
        });
    }

    components
}
