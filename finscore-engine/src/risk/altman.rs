//! Altman Z-Score.
//!
//! `Z = 1.2·X1 + 1.4·X2 + 3.3·X3 + 0.6·X4 + 1.0·X5`
//!
//! | term | ratio |
//! |------|-------|
//! | X1 | working capital / total assets |
//! | X2 | retained earnings / total assets |
//! | X3 | EBIT / total assets |
//! | X4 | market value of equity / total liabilities |
//! | X5 | sales / total assets |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ScoringConfig;
use crate::error::{missing_fields, ModelOutcome};
use crate::snapshot::FinancialSnapshot;

/// Bankruptcy-risk zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltmanZone {
    Safe,
    Grey,
    Distress,
}

impl fmt::Display for AltmanZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AltmanZone::Safe => write!(f, "safe"),
            AltmanZone::Grey => write!(f, "grey"),
            AltmanZone::Distress => write!(f, "distress"),
        }
    }
}

/// The five weighted ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltmanComponents {
    pub working_capital_to_assets: f64,
    pub retained_earnings_to_assets: f64,
    pub ebit_to_assets: f64,
    pub market_equity_to_liabilities: f64,
    pub sales_to_assets: f64,
}

/// Altman Z-Score result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltmanResult {
    pub z_score: f64,
    pub zone: AltmanZone,
    pub components: AltmanComponents,
}

/// Altman Z-Score model with configurable zone thresholds.
#[derive(Debug, Clone)]
pub struct AltmanModel {
    safe_threshold: f64,
    distress_threshold: f64,
}

impl Default for AltmanModel {
    fn default() -> Self {
        Self::new()
    }
}

impl AltmanModel {
    pub fn new() -> Self {
        Self::with_config(&ScoringConfig::default())
    }

    pub fn with_config(config: &ScoringConfig) -> Self {
        Self {
            safe_threshold: config.altman_safe_threshold,
            distress_threshold: config.altman_distress_threshold,
        }
    }

    /// Zone for a Z value: safe above the safe threshold, distress below the
    /// distress threshold, grey in between (both ends inclusive).
    pub fn zone(&self, z_score: f64) -> AltmanZone {
        if z_score > self.safe_threshold {
            AltmanZone::Safe
        } else if z_score >= self.distress_threshold {
            AltmanZone::Grey
        } else {
            AltmanZone::Distress
        }
    }

    /// Score a snapshot. Any absent input yields insufficient data; zero
    /// total assets or liabilities is degenerate.
    pub fn score(&self, snapshot: &FinancialSnapshot) -> ModelOutcome<AltmanResult> {
        let c = &snapshot.current;
        let inputs = [
            ("working_capital", c.working_capital()),
            ("retained_earnings", c.retained_earnings),
            ("operating_income", c.operating_income),
            ("market_cap", snapshot.market_cap()),
            ("total_liabilities", c.liabilities()),
            ("revenue", c.revenue),
            ("total_assets", c.total_assets),
        ];
        let missing = missing_fields(&inputs);
        if !missing.is_empty() {
            return ModelOutcome::missing(&missing);
        }

        let [working_capital, retained_earnings, ebit, market_equity, liabilities, sales, assets] =
            inputs.map(|(_, value)| value.unwrap_or_default());

        if assets == 0.0 {
            return ModelOutcome::degenerate("total assets is zero");
        }
        if liabilities == 0.0 {
            return ModelOutcome::degenerate("total liabilities is zero");
        }

        let components = AltmanComponents {
            working_capital_to_assets: working_capital / assets,
            retained_earnings_to_assets: retained_earnings / assets,
            ebit_to_assets: ebit / assets,
            market_equity_to_liabilities: market_equity / liabilities,
            sales_to_assets: sales / assets,
        };

        let z_score = 1.2 * components.working_capital_to_assets
            + 1.4 * components.retained_earnings_to_assets
            + 3.3 * components.ebit_to_assets
            + 0.6 * components.market_equity_to_liabilities
            + 1.0 * components.sales_to_assets;

        if !z_score.is_finite() {
            return ModelOutcome::degenerate("z-score is not finite");
        }

        ModelOutcome::Computed(AltmanResult {
            z_score,
            zone: self.zone(z_score),
            components,
        })
    }
}
