//! Discount rate estimation (CAPM WACC).

use crate::config::{DcfConfig, ScoringConfig};
use crate::ratios::{RatioKey, RatioSet};
use crate::sector::Sector;
use crate::snapshot::FinancialSnapshot;

use super::types::{InputSource, WaccMethod, WaccResult};

/// Spread over the risk-free rate by book D/E bucket: (upper bound, spread).
const DEBT_SPREADS: &[(f64, f64)] = &[(0.3, 0.01), (0.6, 0.02), (1.0, 0.03)];
const HIGH_LEVERAGE_SPREAD: f64 = 0.05;

/// Below this debt-to-equity the company is treated as all-equity financed.
const NEGLIGIBLE_LEVERAGE: f64 = 0.01;

/// Reported pre-tax cost of debt outside this band is treated as noise.
const MAX_REPORTED_COST_OF_DEBT: f64 = 0.25;

/// CAPM-based WACC estimator.
#[derive(Debug, Clone)]
pub struct WaccModel {
    risk_free_rate: f64,
    market_risk_premium: f64,
    dcf: DcfConfig,
}

impl Default for WaccModel {
    fn default() -> Self {
        Self::new()
    }
}

impl WaccModel {
    pub fn new() -> Self {
        Self::with_config(&ScoringConfig::default())
    }

    pub fn with_config(config: &ScoringConfig) -> Self {
        Self {
            risk_free_rate: config.risk_free_rate,
            market_risk_premium: config.market_risk_premium,
            dcf: config.dcf.clone(),
        }
    }

    /// Cost of equity = risk-free rate + beta × market risk premium.
    pub fn cost_of_equity(&self, beta: f64) -> f64 {
        self.risk_free_rate + beta * self.market_risk_premium
    }

    /// Synthetic pre-tax cost of debt from leverage.
    pub fn synthetic_cost_of_debt(&self, debt_to_equity: f64) -> f64 {
        let spread = DEBT_SPREADS
            .iter()
            .find(|(bound, _)| debt_to_equity < *bound)
            .map_or(HIGH_LEVERAGE_SPREAD, |(_, spread)| *spread);
        self.risk_free_rate + spread
    }

    /// Estimate the WACC for a snapshot.
    pub fn estimate(&self, snapshot: &FinancialSnapshot, ratios: &RatioSet, sector: Sector) -> WaccResult {
        let c = &snapshot.current;

        let (beta, beta_source) = match snapshot.market.beta.filter(|b| b.is_finite()) {
            Some(beta) => (beta, InputSource::Reported),
            None => (sector.benchmarks().beta, InputSource::SectorDefault),
        };
        let cost_of_equity = self.cost_of_equity(beta);

        let tax_rate = c
            .tax_rate
            .filter(|t| (0.0..1.0).contains(t))
            .unwrap_or(self.dcf.default_tax_rate);

        let equity = ratios.get(RatioKey::MarketCap).filter(|e| *e > 0.0);
        let debt = c.debt().filter(|d| *d >= 0.0);

        let mut result = WaccResult {
            wacc: self.dcf.flat_discount_rate,
            method: WaccMethod::FlatRate,
            cost_of_equity,
            beta,
            beta_source,
            cost_of_debt: None,
            cost_of_debt_source: None,
            tax_rate,
            equity_weight: 1.0,
            debt_weight: 0.0,
            clamped: false,
        };

        match (equity, debt) {
            (Some(e), Some(d)) if d / e >= NEGLIGIBLE_LEVERAGE => {
                let (cost_of_debt, source) = match c
                    .interest_expense
                    .map(f64::abs)
                    .and_then(|interest| (d > 0.0).then(|| interest / d))
                    .filter(|kd| *kd > 0.0 && *kd < MAX_REPORTED_COST_OF_DEBT)
                {
                    Some(kd) => (kd, InputSource::Reported),
                    None => {
                        let leverage = ratios
                            .get(RatioKey::DebtToEquity)
                            .filter(|de| *de >= 0.0)
                            .unwrap_or(d / e);
                        (self.synthetic_cost_of_debt(leverage), InputSource::Estimated)
                    }
                };

                let total = e + d;
                result.equity_weight = e / total;
                result.debt_weight = d / total;
                result.cost_of_debt = Some(cost_of_debt);
                result.cost_of_debt_source = Some(source);
                result.method = WaccMethod::Capm;
                result.wacc = cost_of_equity * result.equity_weight
                    + cost_of_debt * (1.0 - tax_rate) * result.debt_weight;
            }
            (Some(_), _) => {
                // Negligible or unreported debt
                result.method = WaccMethod::EquityOnly;
                result.wacc = cost_of_equity;
            }
            (None, _) => {}
        }

        let bounded = result.wacc.clamp(self.dcf.wacc_floor, self.dcf.wacc_ceiling);
        if (bounded - result.wacc).abs() > f64::EPSILON {
            tracing::debug!(
                symbol = %snapshot.symbol,
                raw = result.wacc,
                bounded,
                "WACC clamped"
            );
            result.clamped = true;
            result.wacc = bounded;
        }

        result
    }
}
