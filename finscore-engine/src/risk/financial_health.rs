//! Financial health score for banks and insurers.
//!
//! Altman Z assumes an industrial balance sheet; for financial companies,
//! where leverage is the business model, this 0–10 score takes its place.

use serde::{Deserialize, Serialize};

use crate::ratios::{RatioKey, RatioSet};
use crate::safe_math::safe_div;
use crate::snapshot::FinancialSnapshot;

/// Score assigned when no component has data.
const NEUTRAL_SCORE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthTier {
    Strong,
    Good,
    Neutral,
    Weak,
}

impl HealthTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            HealthTier::Strong
        } else if score >= 6.0 {
            HealthTier::Good
        } else if score >= 4.0 {
            HealthTier::Neutral
        } else {
            HealthTier::Weak
        }
    }
}

/// Points earned by one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthComponent {
    pub name: String,
    pub value: f64,
    pub points: u8,
    pub max_points: u8,
}

/// Financial health result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialHealthResult {
    /// 0–10, scaled over the components that had data
    pub score: f64,
    pub tier: HealthTier,
    pub components: Vec<HealthComponent>,
    /// True when fewer than three components had data
    pub limited_data: bool,
}

/// Score a financial-sector company.
pub fn financial_health(snapshot: &FinancialSnapshot, ratios: &RatioSet) -> FinancialHealthResult {
    let mut components = Vec::new();

    if let Some(roa) = ratios.get(RatioKey::ReturnOnAssets) {
        let points = if roa >= 0.01 {
            3
        } else if roa >= 0.007 {
            2
        } else if roa >= 0.004 {
            1
        } else {
            0
        };
        components.push(component("return_on_assets", roa, points, 3));
    }

    if let Some(roe) = ratios.get(RatioKey::ReturnOnEquity) {
        let points = if roe >= 0.12 {
            3
        } else if roe >= 0.08 {
            2
        } else if roe >= 0.06 {
            1
        } else {
            0
        };
        components.push(component("return_on_equity", roe, points, 3));
    }

    // Bank-scale leverage; equity / assets when debt is not reported
    let c = &snapshot.current;
    match ratios.get(RatioKey::DebtToEquity).filter(|de| *de >= 0.0) {
        Some(de) => {
            let points = if de < 10.0 {
                2
            } else if de < 15.0 {
                1
            } else {
                0
            };
            components.push(component("debt_to_equity", de, points, 2));
        }
        None => {
            if let Some(equity_ratio) = safe_div(c.total_equity, c.total_assets) {
                let points = if equity_ratio >= 0.08 {
                    2
                } else if equity_ratio >= 0.05 {
                    1
                } else {
                    0
                };
                components.push(component("equity_to_assets", equity_ratio, points, 2));
            }
        }
    }

    if let (Some(equity), Some(prior_equity)) = (c.total_equity, snapshot.prior.total_equity) {
        if prior_equity > 0.0 {
            let growth = equity / prior_equity - 1.0;
            components.push(component("book_value_growth", growth, u8::from(growth > 0.0), 1));
        }
    }

    if let Some(payout) = ratios.get(RatioKey::PayoutRatio) {
        let sustainable = payout > 0.0 && payout <= 0.6;
        components.push(component("payout_ratio", payout, u8::from(sustainable), 1));
    }

    let earned: u32 = components.iter().map(|c| u32::from(c.points)).sum();
    let possible: u32 = components.iter().map(|c| u32::from(c.max_points)).sum();
    let score = if possible == 0 {
        NEUTRAL_SCORE
    } else {
        (f64::from(earned) / f64::from(possible) * 100.0).round() / 10.0
    };

    FinancialHealthResult {
        score,
        tier: HealthTier::from_score(score),
        limited_data: components.len() < 3,
        components,
    }
}

fn component(name: &str, value: f64, points: u8, max_points: u8) -> HealthComponent {
    HealthComponent {
        name: name.to_string(),
        value,
        points,
        max_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratios::RatioCalculator;
    use crate::snapshot::PeriodFinancials;

    fn make_bank() -> FinancialSnapshot {
        let mut snapshot = FinancialSnapshot::new("BANK");
        snapshot.sector = Some("Banks—Diversified".into());
        snapshot.current = PeriodFinancials {
            total_assets: Some(10_000.0),
            total_equity: Some(900.0),
            total_debt: Some(7_200.0),
            net_income: Some(120.0),
            dividends_paid: Some(-40.0),
            ..Default::default()
        };
        snapshot.prior.total_equity = Some(850.0);
        snapshot
    }

    #[test]
    fn test_healthy_bank() {
        let snapshot = make_bank();
        let ratios = RatioCalculator::new().calculate(&snapshot);
        let result = financial_health(&snapshot, &ratios);

        // ROA 1.2% → 3, ROE 13.3% → 3, D/E 8 → 2, equity grew → 1, payout 33% → 1
        assert_eq!(result.score, 10.0);
        assert_eq!(result.tier, HealthTier::Strong);
        assert_eq!(result.components.len(), 5);
        assert!(!result.limited_data);
    }

    #[test]
    fn test_thin_bank() {
        let mut snapshot = make_bank();
        snapshot.current.net_income = Some(30.0);
        snapshot.current.total_debt = Some(14_000.0);
        snapshot.current.dividends_paid = Some(-30.0);
        let ratios = RatioCalculator::new().calculate(&snapshot);
        let result = financial_health(&snapshot, &ratios);

        // ROA 0.3% → 0, ROE 3.3% → 0, D/E 15.6 → 0, growth → 1, payout 100% → 0
        assert_eq!(result.score, 1.0);
        assert_eq!(result.tier, HealthTier::Weak);
    }

    #[test]
    fn test_no_data_is_neutral_and_limited() {
        let snapshot = FinancialSnapshot::new("EMPTY");
        let ratios = RatioCalculator::new().calculate(&snapshot);
        let result = financial_health(&snapshot, &ratios);
        assert_eq!(result.score, 5.0);
        assert_eq!(result.tier, HealthTier::Neutral);
        assert!(result.limited_data);
        assert!(result.components.is_empty());
    }
}
