//! Threshold band tables.
//!
//! Each rule maps one metric value to signed points through ordered bands.
//! Bounds are multiplied by a scale, so sector-relative rules (P/E,
//! EV/EBITDA, D/E) share the table format with absolute ones.

use super::types::Metric;
use self::Direction::{HigherIsBetter, LowerIsBetter};

/// Which side of a bound is favourable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// First band with `value >= bound` matches
    HigherIsBetter,
    /// First band with `value <= bound` matches
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub bound: f64,
    pub points: i32,
    pub reason: &'static str,
}

const fn band(bound: f64, points: i32, reason: &'static str) -> Band {
    Band {
        bound,
        points,
        reason,
    }
}

/// Threshold table for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRule {
    pub metric: Metric,
    pub direction: Direction,
    pub bands: &'static [Band],
    /// Points and reason when no band matches; `None` contributes nothing
    pub fallback: Option<(i32, &'static str)>,
}

impl BandRule {
    /// Points for `value` with bounds multiplied by `scale`.
    pub fn evaluate(&self, value: f64, scale: f64) -> Option<(i32, &'static str)> {
        if !value.is_finite() {
            return None;
        }
        self.bands
            .iter()
            .find(|b| match self.direction {
                Direction::HigherIsBetter => value >= b.bound * scale,
                Direction::LowerIsBetter => value <= b.bound * scale,
            })
            .map(|b| (b.points, b.reason))
            .or(self.fallback)
    }
}

/// A rule that fired, before sector and style weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleHit {
    pub metric: Metric,
    pub value: Option<f64>,
    pub raw_points: i32,
    pub reason: &'static str,
}

impl RuleHit {
    pub fn new(metric: Metric, value: f64, raw_points: i32, reason: &'static str) -> Self {
        Self {
            metric,
            value: Some(value),
            raw_points,
            reason,
        }
    }

    /// Evaluate a band rule against an optional value.
    pub fn from_rule(rule: &BandRule, value: Option<f64>, scale: f64) -> Option<Self> {
        let value = value?;
        let (points, reason) = rule.evaluate(value, scale)?;
        Some(Self::new(rule.metric, value, points, reason))
    }
}

// ============================================================================
// Solidity
// ============================================================================

pub const CURRENT_RATIO: BandRule = BandRule {
    metric: Metric::CurrentRatio,
    direction: HigherIsBetter,
    bands: &[
        band(2.0, 4, "strong_liquidity"),
        band(1.5, 2, "good_liquidity"),
        band(1.0, 0, "adequate_liquidity"),
        band(0.8, -2, "tight_liquidity"),
    ],
    fallback: Some((-4, "weak_liquidity")),
};

/// Bounds are fractions of the sector's high-leverage threshold.
pub const DEBT_TO_EQUITY: BandRule = BandRule {
    metric: Metric::DebtToEquity,
    direction: LowerIsBetter,
    bands: &[
        band(0.5, 5, "low_leverage"),
        band(1.0, 2, "moderate_leverage"),
        band(1.3, 0, "elevated_leverage"),
        band(1.6, -2, "high_leverage"),
    ],
    fallback: Some((-5, "excessive_leverage")),
};

pub const INTEREST_COVERAGE: BandRule = BandRule {
    metric: Metric::InterestCoverage,
    direction: HigherIsBetter,
    bands: &[
        band(10.0, 3, "interest_well_covered"),
        band(5.0, 1, "interest_covered"),
        band(3.0, 0, "interest_adequately_covered"),
        band(1.5, -2, "interest_thinly_covered"),
    ],
    fallback: Some((-3, "interest_not_covered")),
};

pub const FINANCIAL_HEALTH: BandRule = BandRule {
    metric: Metric::FinancialHealth,
    direction: HigherIsBetter,
    bands: &[
        band(8.0, 6, "financial_health_strong"),
        band(6.0, 3, "financial_health_good"),
        band(4.0, 0, "financial_health_neutral"),
    ],
    fallback: Some((-3, "financial_health_weak")),
};

// ============================================================================
// Profitability
// ============================================================================

pub const RETURN_ON_EQUITY: BandRule = BandRule {
    metric: Metric::ReturnOnEquity,
    direction: HigherIsBetter,
    bands: &[
        band(0.25, 6, "roe_exceptional"),
        band(0.15, 4, "roe_strong"),
        band(0.10, 2, "roe_adequate"),
        band(0.05, -2, "roe_low"),
        band(0.0, -4, "roe_very_low"),
    ],
    fallback: Some((-6, "roe_negative")),
};

pub const RETURN_ON_ASSETS: BandRule = BandRule {
    metric: Metric::ReturnOnAssets,
    direction: HigherIsBetter,
    bands: &[
        band(0.15, 4, "roa_exceptional"),
        band(0.08, 2, "roa_strong"),
        band(0.03, 0, "roa_adequate"),
        band(0.0, -2, "roa_low"),
    ],
    fallback: Some((-4, "roa_negative")),
};

pub const OPERATING_MARGIN: BandRule = BandRule {
    metric: Metric::OperatingMargin,
    direction: HigherIsBetter,
    bands: &[
        band(0.30, 5, "operating_margin_exceptional"),
        band(0.20, 3, "operating_margin_strong"),
        band(0.10, 1, "operating_margin_adequate"),
        band(0.05, -1, "operating_margin_thin"),
        band(0.0, -3, "operating_margin_very_thin"),
    ],
    fallback: Some((-5, "operating_loss")),
};

pub const NET_MARGIN: BandRule = BandRule {
    metric: Metric::NetMargin,
    direction: HigherIsBetter,
    bands: &[
        band(0.20, 3, "net_margin_exceptional"),
        band(0.10, 2, "net_margin_strong"),
        band(0.05, 0, "net_margin_adequate"),
        band(0.0, -2, "net_margin_thin"),
    ],
    fallback: Some((-3, "net_loss")),
};

// ============================================================================
// Valuation
// ============================================================================

/// Bounds are fractions of the sector P/E × tolerance.
pub const PRICE_TO_EARNINGS: BandRule = BandRule {
    metric: Metric::PriceToEarnings,
    direction: LowerIsBetter,
    bands: &[
        band(0.7, 5, "pe_deep_discount"),
        band(0.9, 3, "pe_discount"),
        band(1.1, 0, "pe_in_line"),
        band(1.3, -2, "pe_premium"),
    ],
    fallback: Some((-5, "pe_expensive")),
};

pub const PRICE_TO_FFO: BandRule = BandRule {
    metric: Metric::PriceToFfo,
    direction: LowerIsBetter,
    bands: &[
        band(12.0, 5, "p_ffo_cheap"),
        band(15.0, 3, "p_ffo_attractive"),
        band(18.0, 0, "p_ffo_fair"),
        band(25.0, -2, "p_ffo_premium"),
    ],
    fallback: Some((-5, "p_ffo_expensive")),
};

pub const PRICE_TO_FCF: BandRule = BandRule {
    metric: Metric::PriceToFcf,
    direction: LowerIsBetter,
    bands: &[
        band(12.0, 4, "p_fcf_cheap"),
        band(18.0, 2, "p_fcf_attractive"),
        band(25.0, 0, "p_fcf_fair"),
        band(35.0, -2, "p_fcf_premium"),
    ],
    fallback: Some((-4, "p_fcf_expensive")),
};

/// Bounds are fractions of the sector EV/EBITDA.
pub const EV_TO_EBITDA: BandRule = BandRule {
    metric: Metric::EvToEbitda,
    direction: LowerIsBetter,
    bands: &[
        band(0.7, 4, "ev_ebitda_discount"),
        band(1.0, 2, "ev_ebitda_below_sector"),
        band(1.2, 0, "ev_ebitda_in_line"),
        band(1.5, -2, "ev_ebitda_premium"),
    ],
    fallback: Some((-4, "ev_ebitda_expensive")),
};

pub const PEG: BandRule = BandRule {
    metric: Metric::Peg,
    direction: LowerIsBetter,
    bands: &[
        band(0.8, 4, "peg_cheap"),
        band(1.2, 2, "peg_fair"),
        band(1.8, 0, "peg_full"),
        band(2.5, -2, "peg_high"),
    ],
    fallback: Some((-4, "peg_expensive")),
};

pub const FCF_YIELD: BandRule = BandRule {
    metric: Metric::FcfYield,
    direction: HigherIsBetter,
    bands: &[
        band(0.08, 3, "fcf_yield_high"),
        band(0.05, 1, "fcf_yield_attractive"),
    ],
    fallback: None,
};

// ============================================================================
// Earnings quality
// ============================================================================

pub const PIOTROSKI: BandRule = BandRule {
    metric: Metric::PiotroskiF,
    direction: HigherIsBetter,
    bands: &[
        band(8.0, 7, "piotroski_excellent"),
        band(6.0, 4, "piotroski_strong"),
        band(4.0, 0, "piotroski_neutral"),
        band(2.0, -4, "piotroski_weak"),
    ],
    fallback: Some((-7, "piotroski_very_weak")),
};

pub const FCF_CONVERSION: BandRule = BandRule {
    metric: Metric::FcfConversion,
    direction: HigherIsBetter,
    bands: &[
        band(1.0, 3, "fcf_exceeds_earnings"),
        band(0.7, 1, "fcf_backs_earnings"),
        band(0.3, 0, "fcf_partially_backs_earnings"),
    ],
    fallback: Some((-2, "fcf_lags_earnings")),
};

pub const FFO_PAYOUT: BandRule = BandRule {
    metric: Metric::FfoPayout,
    direction: LowerIsBetter,
    bands: &[
        band(0.70, 3, "ffo_payout_conservative"),
        band(0.85, 2, "ffo_payout_healthy"),
        band(0.95, 0, "ffo_payout_full"),
        band(1.10, -2, "ffo_payout_stretched"),
    ],
    fallback: Some((-4, "ffo_payout_unsustainable")),
};

// ============================================================================
// Growth
// ============================================================================

pub const REVENUE_GROWTH: BandRule = BandRule {
    metric: Metric::RevenueGrowth,
    direction: HigherIsBetter,
    bands: &[
        band(0.20, 5, "revenue_growth_exceptional"),
        band(0.10, 3, "revenue_growth_strong"),
        band(0.03, 1, "revenue_growth_moderate"),
        band(0.0, -1, "revenue_flat"),
    ],
    fallback: Some((-4, "revenue_declining")),
};

pub const EPS_GROWTH: BandRule = BandRule {
    metric: Metric::EpsGrowth,
    direction: HigherIsBetter,
    bands: &[
        band(0.25, 5, "eps_growth_exceptional"),
        band(0.12, 3, "eps_growth_strong"),
        band(0.05, 1, "eps_growth_moderate"),
        band(0.0, -1, "eps_flat"),
    ],
    fallback: Some((-4, "eps_declining")),
};

pub const FCF_GROWTH: BandRule = BandRule {
    metric: Metric::FcfGrowth,
    direction: HigherIsBetter,
    bands: &[
        band(0.15, 4, "fcf_growth_strong"),
        band(0.05, 2, "fcf_growth_moderate"),
        band(-0.05, 0, "fcf_stable"),
    ],
    fallback: Some((-3, "fcf_declining")),
};

/// Altman zone contributions.
pub const ALTMAN_SAFE_POINTS: i32 = 8;
pub const ALTMAN_GREY_POINTS: i32 = 0;
pub const ALTMAN_DISTRESS_POINTS: i32 = -15;

/// Cash flow sign contributions.
pub const POSITIVE_CASH_FLOW_POINTS: i32 = 3;
pub const NEGATIVE_CASH_FLOW_POINTS: i32 = -4;

/// Revenue growth above which a company earns the growth-company bonus.
pub const GROWTH_COMPANY_THRESHOLD: f64 = 0.15;
pub const GROWTH_COMPANY_POINTS: i32 = 2;

/// Bonus for GARP companies with high growth quality.
pub const GARP_QUALITY_POINTS: i32 = 2;
