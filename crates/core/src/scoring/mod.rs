//! Points calculation.
//!
//! Each rule in [`rules`] is a pure function of a [`Receipt`]. [`score_receipt`] runs all of
//! them against the same receipt and sums the sub-scores; the [`ScoringPolicy`] decides what a
//! rule failure (an unparseable amount, date or time) does to the result.

pub mod error;
pub mod money;
pub mod rules;

use crate::domain::receipt::Receipt;
use error::{RuleFailure, ScoringError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Retailer,
    Total,
    ItemCount,
    Description,
    PurchaseDay,
    PurchaseTime,
}

impl Rule {
    pub fn name(self) -> &'static str {
        match self {
            Rule::Retailer => "retailer",
            Rule::Total => "total",
            Rule::ItemCount => "item-count",
            Rule::Description => "description",
            Rule::PurchaseDay => "purchase-day",
            Rule::PurchaseTime => "purchase-time",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoringPolicy {
    /// Any rule failure rejects the whole receipt.
    #[default]
    Strict,
    /// A failing rule contributes 0 and the rest still count.
    Lenient,
}

impl FromStr for ScoringPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => anyhow::bail!("unknown scoring policy {other:?} (expected strict or lenient)"),
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsBreakdown {
    pub retailer: u64,
    pub total: u64,
    pub item_count: u64,
    pub description: u64,
    pub purchase_day: u64,
    pub purchase_time: u64,
}

impl PointsBreakdown {
    /// Sum of every sub-score. Saturates at `u64::MAX` instead of wrapping.
    pub fn points(&self) -> u64 {
        [
            self.total,
            self.item_count,
            self.description,
            self.purchase_day,
            self.purchase_time,
        ]
        .into_iter()
        .fold(self.retailer, u64::saturating_add)
    }
}

/// Runs every rule against `receipt`. Rules never short-circuit each other: under
/// [`ScoringPolicy::Strict`] the error lists every rule that failed.
pub fn score_receipt(
    receipt: &Receipt,
    policy: ScoringPolicy,
) -> Result<PointsBreakdown, ScoringError> {
    let mut failures = Vec::new();
    let mut settle = |rule: Rule, result: Result<u64, ScoringError>| match result {
        Ok(points) => points,
        Err(error) => {
            tracing::warn!(rule = rule.name(), %policy, error = %error, "scoring rule failed");
            failures.push(RuleFailure { rule, error });
            0
        }
    };

    let breakdown = PointsBreakdown {
        retailer: rules::retailer_points(receipt),
        total: settle(Rule::Total, rules::total_points(receipt)),
        item_count: rules::item_count_points(receipt),
        description: settle(Rule::Description, rules::description_points(receipt)),
        purchase_day: settle(Rule::PurchaseDay, rules::purchase_day_points(receipt)),
        purchase_time: settle(Rule::PurchaseTime, rules::purchase_time_points(receipt)),
    };

    if policy == ScoringPolicy::Strict && !failures.is_empty() {
        return Err(ScoringError::InvalidReceipt(failures));
    }

    Ok(breakdown)
}

pub fn points_for(receipt: &Receipt, policy: ScoringPolicy) -> Result<u64, ScoringError> {
    score_receipt(receipt, policy).map(|breakdown| breakdown.points())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::receipt::Item;

    fn target_receipt() -> Receipt {
        Receipt {
            id: None,
            retailer: "Target".to_string(),
            purchase_date: "2022-01-01".to_string(),
            purchase_time: "13:01".to_string(),
            items: vec![
                Item::new("Mountain Dew 12PK", "6.49"),
                Item::new("Emils Cheese Pizza", "12.25"),
                Item::new("Knorr Creamy Chicken", "1.26"),
                Item::new("Doritos Nacho Cheese", "3.35"),
                Item::new("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
            ],
            total: "35.35".to_string(),
        }
    }

    fn corner_market_receipt() -> Receipt {
        Receipt {
            id: None,
            retailer: "M&M Corner Market".to_string(),
            purchase_date: "2022-03-20".to_string(),
            purchase_time: "14:33".to_string(),
            items: vec![
                Item::new("Gatorade", "2.25"),
                Item::new("Gatorade", "2.25"),
                Item::new("Gatorade", "2.25"),
                Item::new("Gatorade", "2.25"),
            ],
            total: "9.00".to_string(),
        }
    }

    #[test]
    fn scores_target_receipt() {
        let breakdown = score_receipt(&target_receipt(), ScoringPolicy::Strict).unwrap();
        assert_eq!(
            breakdown,
            PointsBreakdown {
                retailer: 6,
                total: 0,
                item_count: 10,
                // Pizza (18 chars) -> 3, Klarbrunn (24 chars) -> 3.
                description: 6,
                purchase_day: 6,
                purchase_time: 0,
            }
        );
        assert_eq!(breakdown.points(), 28);
    }

    #[test]
    fn scores_corner_market_receipt() {
        let points = points_for(&corner_market_receipt(), ScoringPolicy::Strict).unwrap();
        // 14 retailer + 75 total + 10 items + 0 descriptions + 0 even day + 10 afternoon
        assert_eq!(points, 109);
    }

    #[test]
    fn points_equal_the_sum_of_independent_rules() {
        let receipt = target_receipt();
        let expected = rules::retailer_points(&receipt)
            + rules::total_points(&receipt).unwrap()
            + rules::item_count_points(&receipt)
            + rules::description_points(&receipt).unwrap()
            + rules::purchase_day_points(&receipt).unwrap()
            + rules::purchase_time_points(&receipt).unwrap();
        assert_eq!(points_for(&receipt, ScoringPolicy::Strict).unwrap(), expected);
    }

    #[test]
    fn scoring_is_repeatable() {
        let receipt = corner_market_receipt();
        let first = score_receipt(&receipt, ScoringPolicy::Strict).unwrap();
        for _ in 0..3 {
            assert_eq!(score_receipt(&receipt, ScoringPolicy::Strict).unwrap(), first);
        }
    }

    #[test]
    fn empty_receipt_fails_strict_scoring_on_every_parsed_field() {
        let err = score_receipt(&Receipt::default(), ScoringPolicy::Strict).unwrap_err();
        assert_eq!(
            err.failed_rules(),
            vec![Rule::Total, Rule::PurchaseDay, Rule::PurchaseTime]
        );
    }

    #[test]
    fn strict_policy_reports_all_failures() {
        let mut receipt = target_receipt();
        receipt.total = "abc".to_string();
        receipt.purchase_time = "1:01pm".to_string();
        receipt.items[0].price = "free".to_string();

        let err = score_receipt(&receipt, ScoringPolicy::Strict).unwrap_err();
        assert_eq!(
            err.failed_rules(),
            vec![Rule::Total, Rule::Description, Rule::PurchaseTime]
        );
        assert!(err.to_string().starts_with("invalid receipt data: "));
    }

    #[test]
    fn lenient_policy_zeroes_failing_rules_only() {
        let mut receipt = target_receipt();
        receipt.total = "abc".to_string();
        receipt.purchase_date = "01/01/2022".to_string();

        let breakdown = score_receipt(&receipt, ScoringPolicy::Lenient).unwrap();
        assert_eq!(breakdown.total, 0);
        assert_eq!(breakdown.purchase_day, 0);
        assert_eq!(breakdown.points(), 6 + 10 + 6);
    }

    #[test]
    fn points_saturate_instead_of_overflowing() {
        let breakdown = PointsBreakdown {
            retailer: 6,
            total: 75,
            description: u64::MAX,
            ..PointsBreakdown::default()
        };
        assert_eq!(breakdown.points(), u64::MAX);
    }

    #[test]
    fn oversized_price_fails_scoring_instead_of_panicking() {
        let mut receipt = target_receipt();
        receipt.items[1].price = "99999999999999999999999999.00".to_string();
        receipt.items[4].price = "99999999999999999999999999.00".to_string();

        let err = score_receipt(&receipt, ScoringPolicy::Strict).unwrap_err();
        assert_eq!(err.failed_rules(), vec![Rule::Description]);

        let breakdown = score_receipt(&receipt, ScoringPolicy::Lenient).unwrap();
        assert_eq!(breakdown.description, 0);
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("strict".parse::<ScoringPolicy>().unwrap(), ScoringPolicy::Strict);
        assert_eq!(" Lenient ".parse::<ScoringPolicy>().unwrap(), ScoringPolicy::Lenient);
        assert!("loose".parse::<ScoringPolicy>().is_err());
        assert_eq!(ScoringPolicy::default(), ScoringPolicy::Strict);
    }
}
