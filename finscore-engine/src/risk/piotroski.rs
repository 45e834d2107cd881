//! Piotroski F-Score.
//!
//! Nine binary tests in three groups:
//!
//! - Profitability: ROA > 0, OCF > 0, ROA improving, OCF > net income
//! - Leverage / liquidity: long-term debt ratio decreasing, current ratio
//!   improving, no new shares issued
//! - Efficiency: gross margin improving, asset turnover improving
//!
//! A test whose inputs are absent scores 0 and is marked unavailable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ScoringConfig;
use crate::error::ModelOutcome;
use crate::safe_math::safe_div;
use crate::snapshot::{FinancialSnapshot, PeriodFinancials};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiotroskiGroup {
    Profitability,
    Leverage,
    Efficiency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiotroskiCriterion {
    PositiveRoa,
    PositiveOperatingCashFlow,
    ImprovingRoa,
    CashFlowExceedsEarnings,
    DecreasingLeverage,
    ImprovingCurrentRatio,
    NoDilution,
    ImprovingGrossMargin,
    ImprovingAssetTurnover,
}

impl PiotroskiCriterion {
    pub const ALL: [PiotroskiCriterion; 9] = [
        PiotroskiCriterion::PositiveRoa,
        PiotroskiCriterion::PositiveOperatingCashFlow,
        PiotroskiCriterion::ImprovingRoa,
        PiotroskiCriterion::CashFlowExceedsEarnings,
        PiotroskiCriterion::DecreasingLeverage,
        PiotroskiCriterion::ImprovingCurrentRatio,
        PiotroskiCriterion::NoDilution,
        PiotroskiCriterion::ImprovingGrossMargin,
        PiotroskiCriterion::ImprovingAssetTurnover,
    ];

    pub fn group(self) -> PiotroskiGroup {
        use PiotroskiCriterion::*;
        match self {
            PositiveRoa | PositiveOperatingCashFlow | ImprovingRoa | CashFlowExceedsEarnings => {
                PiotroskiGroup::Profitability
            }
            DecreasingLeverage | ImprovingCurrentRatio | NoDilution => PiotroskiGroup::Leverage,
            ImprovingGrossMargin | ImprovingAssetTurnover => PiotroskiGroup::Efficiency,
        }
    }

    /// Whether the test requires a strict year-over-year improvement.
    pub fn is_improvement(self) -> bool {
        use PiotroskiCriterion::*;
        matches!(
            self,
            ImprovingRoa
                | DecreasingLeverage
                | ImprovingCurrentRatio
                | ImprovingGrossMargin
                | ImprovingAssetTurnover
        )
    }
}

/// Outcome of one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub criterion: PiotroskiCriterion,
    pub group: PiotroskiGroup,
    pub passed: bool,
    /// False when inputs were absent; the test then scores 0
    pub available: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiotroskiTier {
    Strong,
    Neutral,
    Weak,
}

impl fmt::Display for PiotroskiTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PiotroskiTier::Strong => write!(f, "strong"),
            PiotroskiTier::Neutral => write!(f, "neutral"),
            PiotroskiTier::Weak => write!(f, "weak"),
        }
    }
}

/// Piotroski F-Score result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiotroskiResult {
    /// 0–9
    pub score: u8,
    pub tier: PiotroskiTier,
    /// Number of tests that had their inputs
    pub available_criteria: u8,
    pub criteria: Vec<CriterionResult>,
}

impl PiotroskiResult {
    pub fn criterion(&self, criterion: PiotroskiCriterion) -> Option<&CriterionResult> {
        self.criteria.iter().find(|c| c.criterion == criterion)
    }
}

/// Piotroski F-Score model.
#[derive(Debug, Clone)]
pub struct PiotroskiModel {
    strong_threshold: u8,
    weak_threshold: u8,
}

impl Default for PiotroskiModel {
    fn default() -> Self {
        Self::new()
    }
}

fn roa(p: &PeriodFinancials) -> Option<f64> {
    safe_div(p.net_income, p.total_assets)
}

fn leverage(p: &PeriodFinancials) -> Option<f64> {
    safe_div(p.long_term_debt, p.total_assets)
}

fn current_ratio(p: &PeriodFinancials) -> Option<f64> {
    safe_div(p.current_assets, p.current_liabilities)
}

fn gross_margin(p: &PeriodFinancials) -> Option<f64> {
    safe_div(p.gross_profit(), p.revenue)
}

fn asset_turnover(p: &PeriodFinancials) -> Option<f64> {
    safe_div(p.revenue, p.total_assets)
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.4}", v))
}

impl PiotroskiModel {
    pub fn new() -> Self {
        Self::with_config(&ScoringConfig::default())
    }

    pub fn with_config(config: &ScoringConfig) -> Self {
        Self {
            strong_threshold: config.piotroski_strong_threshold,
            weak_threshold: config.piotroski_weak_threshold,
        }
    }

    pub fn tier(&self, score: u8) -> PiotroskiTier {
        if score >= self.strong_threshold {
            PiotroskiTier::Strong
        } else if score <= self.weak_threshold {
            PiotroskiTier::Weak
        } else {
            PiotroskiTier::Neutral
        }
    }

    /// Score a snapshot. Insufficient data only when no test had its inputs.
    pub fn score(&self, snapshot: &FinancialSnapshot) -> ModelOutcome<PiotroskiResult> {
        let criteria: Vec<CriterionResult> = PiotroskiCriterion::ALL
            .iter()
            .map(|criterion| self.evaluate(*criterion, &snapshot.current, &snapshot.prior))
            .collect();

        let available_criteria = criteria.iter().filter(|c| c.available).count() as u8;
        if available_criteria == 0 {
            return ModelOutcome::missing(&["net_income", "total_assets", "operating_cash_flow"]);
        }

        let score = criteria.iter().filter(|c| c.passed).count() as u8;

        ModelOutcome::Computed(PiotroskiResult {
            score,
            tier: self.tier(score),
            available_criteria,
            criteria,
        })
    }

    fn evaluate(
        &self,
        criterion: PiotroskiCriterion,
        cur: &PeriodFinancials,
        prior: &PeriodFinancials,
    ) -> CriterionResult {
        use PiotroskiCriterion::*;

        let (outcome, detail) = match criterion {
            PositiveRoa => {
                let value = roa(cur);
                (value.map(|v| v > 0.0), format!("ROA {}", fmt_opt(value)))
            }
            PositiveOperatingCashFlow => {
                let value = cur.operating_cash_flow;
                (value.map(|v| v > 0.0), format!("OCF {}", fmt_opt(value)))
            }
            ImprovingRoa => compare(roa(cur), roa(prior), "ROA", |c, p| c > p),
            CashFlowExceedsEarnings => match (cur.operating_cash_flow, cur.net_income) {
                (Some(ocf), Some(ni)) => (
                    Some(ocf > ni),
                    format!("OCF {:.2} vs net income {:.2}", ocf, ni),
                ),
                _ => (None, "OCF or net income missing".to_string()),
            },
            DecreasingLeverage => {
                compare(leverage(cur), leverage(prior), "long-term debt / assets", |c, p| c < p)
            }
            ImprovingCurrentRatio => {
                compare(current_ratio(cur), current_ratio(prior), "current ratio", |c, p| c > p)
            }
            NoDilution => compare(
                cur.shares_outstanding,
                prior.shares_outstanding,
                "shares outstanding",
                |c, p| c <= p,
            ),
            ImprovingGrossMargin => {
                compare(gross_margin(cur), gross_margin(prior), "gross margin", |c, p| c > p)
            }
            ImprovingAssetTurnover => compare(
                asset_turnover(cur),
                asset_turnover(prior),
                "asset turnover",
                |c, p| c > p,
            ),
        };

        CriterionResult {
            criterion,
            group: criterion.group(),
            passed: outcome.unwrap_or(false),
            available: outcome.is_some(),
            detail,
        }
    }
}

/// Compare current against prior; absent when either side is missing.
fn compare(
    current: Option<f64>,
    prior: Option<f64>,
    label: &str,
    passes: impl Fn(f64, f64) -> bool,
) -> (Option<bool>, String) {
    match (current, prior) {
        (Some(c), Some(p)) => (
            Some(passes(c, p)),
            format!("{} {:.4} (prior {:.4})", label, c, p),
        ),
        _ => (
            None,
            format!("{} {} (prior {})", label, fmt_opt(current), fmt_opt(prior)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_period() -> PeriodFinancials {
        PeriodFinancials {
            total_assets: Some(1000.0),
            current_assets: Some(400.0),
            current_liabilities: Some(200.0),
            long_term_debt: Some(300.0),
            shares_outstanding: Some(100.0),
            revenue: Some(800.0),
            gross_profit: Some(320.0),
            net_income: Some(60.0),
            operating_cash_flow: Some(90.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_identical_periods_fail_every_improvement() {
        let mut snapshot = FinancialSnapshot::new("FLAT");
        snapshot.current = make_period();
        snapshot.prior = make_period();

        let result = PiotroskiModel::new().score(&snapshot);
        let result = result.computed().unwrap();
        for criterion in result.criteria.iter().filter(|c| c.criterion.is_improvement()) {
            assert!(!criterion.passed, "{:?} should fail", criterion.criterion);
            assert!(criterion.available);
        }
        // ROA > 0, OCF > 0, OCF > NI, no dilution
        assert_eq!(result.score, 4);
        assert_eq!(result.tier, PiotroskiTier::Neutral);
    }

    #[test]
    fn test_weak_company_scores_two() {
        let mut snapshot = FinancialSnapshot::new("WEAK");
        snapshot.prior = make_period();
        snapshot.current = PeriodFinancials {
            // ROA 1% (prior 6%), OCF positive but below earnings
            net_income: Some(10.0),
            operating_cash_flow: Some(5.0),
            // more debt, worse liquidity, dilution
            long_term_debt: Some(400.0),
            current_liabilities: Some(300.0),
            shares_outstanding: Some(120.0),
            // thinner margin, slower turnover
            gross_profit: Some(200.0),
            revenue: Some(700.0),
            ..make_period()
        };

        let result = PiotroskiModel::new().score(&snapshot);
        let result = result.computed().unwrap();
        assert_eq!(result.score, 2);
        assert_eq!(result.tier, PiotroskiTier::Weak);
        assert!(result.criterion(PiotroskiCriterion::PositiveRoa).unwrap().passed);
        assert!(
            result
                .criterion(PiotroskiCriterion::PositiveOperatingCashFlow)
                .unwrap()
                .passed
        );
    }

    #[test]
    fn test_strong_company() {
        let mut snapshot = FinancialSnapshot::new("STRONG");
        snapshot.prior = make_period();
        snapshot.current = PeriodFinancials {
            net_income: Some(90.0),
            operating_cash_flow: Some(130.0),
            long_term_debt: Some(250.0),
            current_assets: Some(450.0),
            shares_outstanding: Some(98.0),
            gross_profit: Some(380.0),
            revenue: Some(900.0),
            ..make_period()
        };

        let result = PiotroskiModel::new().score(&snapshot);
        let result = result.computed().unwrap();
        assert_eq!(result.score, 9);
        assert_eq!(result.tier, PiotroskiTier::Strong);
    }

    #[test]
    fn test_missing_prior_period() {
        let mut snapshot = FinancialSnapshot::new("NEW");
        snapshot.current = make_period();

        let result = PiotroskiModel::new().score(&snapshot);
        let result = result.computed().unwrap();
        assert_eq!(result.available_criteria, 3);
        assert_eq!(result.score, 3);
        let improving = result
            .criterion(PiotroskiCriterion::ImprovingRoa)
            .unwrap();
        assert!(!improving.available);
        assert!(!improving.passed);
    }

    #[test]
    fn test_empty_snapshot_is_insufficient() {
        let outcome = PiotroskiModel::new().score(&FinancialSnapshot::new("EMPTY"));
        assert!(matches!(outcome, ModelOutcome::InsufficientData { .. }));
    }

    #[test]
    fn test_tiers() {
        let model = PiotroskiModel::new();
        assert_eq!(model.tier(9), PiotroskiTier::Strong);
        assert_eq!(model.tier(7), PiotroskiTier::Strong);
        assert_eq!(model.tier(6), PiotroskiTier::Neutral);
        assert_eq!(model.tier(4), PiotroskiTier::Neutral);
        assert_eq!(model.tier(3), PiotroskiTier::Weak);
        assert_eq!(model.tier(0), PiotroskiTier::Weak);
    }
}
