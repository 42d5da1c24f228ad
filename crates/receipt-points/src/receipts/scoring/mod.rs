mod rules;

use serde::Serialize;

use super::domain::{Points, Receipt};

/// Stateless evaluator applying the reward rules to a receipt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, receipt: &Receipt) -> Points {
        self.breakdown(receipt).total
    }

    /// Per-rule contributions, for audits and the CLI report.
    pub fn breakdown(&self, receipt: &Receipt) -> ScoreBreakdown {
        let components = rules::score_receipt(receipt);
        let total = components
            .iter()
            .fold(0, |acc: Points, component| acc.saturating_add(component.points));
        ScoreBreakdown { components, total }
    }
}

/// Reward rules. Each one contributes independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    RetailerName,
    RoundDollarTotal,
    QuarterMultipleTotal,
    ItemPairs,
    DescriptionLength,
    OddPurchaseDay,
    AfternoonPurchase,
}

impl ScoringRule {
    pub fn label(&self) -> &'static str {
        match self {
            ScoringRule::RetailerName => "Retailer name",
            ScoringRule::RoundDollarTotal => "Round dollar total",
            ScoringRule::QuarterMultipleTotal => "Total is a multiple of 0.25",
            ScoringRule::ItemPairs => "Item pairs",
            ScoringRule::DescriptionLength => "Item description length",
            ScoringRule::OddPurchaseDay => "Odd purchase day",
            ScoringRule::AfternoonPurchase => "Afternoon purchase",
        }
    }
}

/// Discrete contribution to a receipt's score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreComponent {
    pub rule: ScoringRule,
    pub points: Points,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    pub total: Points,
}

impl ScoreBreakdown {
    pub fn points_for(&self, rule: ScoringRule) -> Points {
        self.components
            .iter()
            .filter(|component| component.rule == rule)
            .fold(0, |acc: Points, component| acc.saturating_add(component.points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipts::domain::ReceiptItem;
    use chrono::{NaiveDate, NaiveTime};

    fn item(description: &str, price: &str) -> ReceiptItem {
        ReceiptItem {
            short_description: description.to_string(),
            price: price.parse().expect("valid price"),
        }
    }

    fn receipt(retailer: &str, date: (i32, u32, u32), time: (u32, u32), total: &str) -> Receipt {
        Receipt {
            retailer: retailer.to_string(),
            purchase_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("valid date"),
            purchase_time: NaiveTime::from_hms_opt(time.0, time.1, 0).expect("valid time"),
            items: vec![item("Pepsi", "1.25"), item("Chips", "2.00")],
            total: total.parse().expect("valid total"),
        }
    }

    fn target_receipt() -> Receipt {
        Receipt {
            items: vec![
                item("Mountain Dew 12PK", "6.49"),
                item("Emils Cheese Pizza", "12.25"),
                item("Knorr Creamy Chicken", "1.26"),
                item("Doritos Nacho Cheese", "3.35"),
                item("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
            ],
            ..receipt("Target", (2022, 1, 1), (13, 1), "35.35")
        }
    }

    fn corner_market_receipt() -> Receipt {
        Receipt {
            items: vec![
                item("Gatorade", "2.25"),
                item("Gatorade", "2.25"),
                item("Gatorade", "2.25"),
                item("Gatorade", "2.25"),
            ],
            ..receipt("M&M Corner Market", (2022, 3, 20), (14, 33), "9.00")
        }
    }

    #[test]
    fn scores_target_example() {
        let engine = ScoringEngine::new();
        let receipt = target_receipt();
        let breakdown = engine.breakdown(&receipt);

        assert_eq!(breakdown.points_for(ScoringRule::RetailerName), 6);
        assert_eq!(breakdown.points_for(ScoringRule::ItemPairs), 10);
        assert_eq!(breakdown.points_for(ScoringRule::DescriptionLength), 6);
        assert_eq!(breakdown.points_for(ScoringRule::OddPurchaseDay), 6);
        assert_eq!(breakdown.total, 28);
        assert_eq!(engine.score(&receipt), 28);
    }

    #[test]
    fn scores_corner_market_example() {
        let engine = ScoringEngine::new();
        let breakdown = engine.breakdown(&corner_market_receipt());

        assert_eq!(breakdown.points_for(ScoringRule::RetailerName), 14);
        assert_eq!(breakdown.points_for(ScoringRule::RoundDollarTotal), 50);
        assert_eq!(breakdown.points_for(ScoringRule::QuarterMultipleTotal), 25);
        assert_eq!(breakdown.points_for(ScoringRule::AfternoonPurchase), 10);
        assert_eq!(breakdown.total, 109);
    }

    #[test]
    fn plain_target_receipt_only_earns_name_and_pair_points() {
        let receipt = receipt("Target", (2022, 1, 2), (13, 0), "35.35");
        assert_eq!(ScoringEngine::new().score(&receipt), 6 + 5);
    }

    #[test]
    fn round_total_also_counts_as_quarter_multiple() {
        let engine = ScoringEngine::new();
        let breakdown = engine.breakdown(&receipt("-", (2022, 1, 2), (9, 0), "10.00"));
        assert_eq!(breakdown.points_for(ScoringRule::RoundDollarTotal), 50);
        assert_eq!(breakdown.points_for(ScoringRule::QuarterMultipleTotal), 25);

        let quarter_only = engine.breakdown(&receipt("-", (2022, 1, 2), (9, 0), "10.75"));
        assert_eq!(quarter_only.points_for(ScoringRule::RoundDollarTotal), 0);
        assert_eq!(quarter_only.points_for(ScoringRule::QuarterMultipleTotal), 25);
    }

    #[test]
    fn afternoon_window_keeps_its_boundaries() {
        let engine = ScoringEngine::new();
        let cases = [
            ((13, 59), 0),
            ((14, 0), 0),
            ((14, 1), 10),
            ((15, 0), 10),
            ((15, 59), 10),
            ((16, 0), 0),
        ];
        for (time, expected) in cases {
            let breakdown = engine.breakdown(&receipt("-", (2022, 1, 2), time, "1.01"));
            assert_eq!(
                breakdown.points_for(ScoringRule::AfternoonPurchase),
                expected,
                "purchase time {time:?}"
            );
        }
    }

    #[test]
    fn single_item_earns_no_pair_points() {
        let mut single = receipt("-", (2022, 1, 2), (9, 0), "1.01");
        single.items.truncate(1);
        let breakdown = ScoringEngine::new().breakdown(&single);
        assert_eq!(breakdown.points_for(ScoringRule::ItemPairs), 0);
    }

    #[test]
    fn odd_day_of_month_earns_bonus() {
        let engine = ScoringEngine::new();
        let odd = engine.breakdown(&receipt("-", (2022, 1, 15), (9, 0), "1.01"));
        let even = engine.breakdown(&receipt("-", (2022, 1, 16), (9, 0), "1.01"));
        assert_eq!(odd.points_for(ScoringRule::OddPurchaseDay), 6);
        assert_eq!(even.points_for(ScoringRule::OddPurchaseDay), 0);
    }

    #[test]
    fn description_rule_trims_before_measuring() {
        let mut padded = receipt("-", (2022, 1, 2), (9, 0), "1.01");
        padded.items = vec![item("  abc  ", "4.99"), item("abcd", "100.00")];
        let breakdown = ScoringEngine::new().breakdown(&padded);
        assert_eq!(breakdown.points_for(ScoringRule::DescriptionLength), 1);
    }

    #[test]
    fn description_length_counts_utf16_units() {
        let mut emoji = receipt("-", (2022, 1, 2), (9, 0), "1.01");
        emoji.items = vec![item("\u{1F355}a", "5.00"), item("\u{e9}ab", "10.00")];
        let breakdown = ScoringEngine::new().breakdown(&emoji);
        assert_eq!(breakdown.points_for(ScoringRule::DescriptionLength), 1 + 2);
    }

    #[test]
    fn zero_total_is_scored_without_failing() {
        let mut empty = receipt("", (2022, 1, 2), (9, 0), "0.00");
        empty.items = vec![item("ab", "0.00")];
        assert_eq!(ScoringEngine::new().score(&empty), 75);
    }

    #[test]
    fn scoring_is_repeatable_and_leaves_receipt_untouched() {
        let engine = ScoringEngine::new();
        let receipt = target_receipt();
        let snapshot = receipt.clone();
        assert_eq!(engine.score(&receipt), engine.score(&receipt));
        assert_eq!(receipt, snapshot);
    }
}
