//! Ordered style rules. The first rule whose predicate holds wins.

use crate::ratios::{RatioKey, RatioSet};
use crate::sector::Sector;
use crate::snapshot::FinancialSnapshot;

use super::types::CompanyStyle;

/// Inputs the style rules look at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSignals {
    pub pe: Option<f64>,
    /// Reported sector P/E, else the sector benchmark
    pub sector_pe: f64,
    pub pb: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub net_margin: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub dividend_years: usize,
    pub growth_quality: f64,
}

impl StyleSignals {
    pub fn collect(
        snapshot: &FinancialSnapshot,
        ratios: &RatioSet,
        sector: Sector,
        growth_quality: f64,
    ) -> Self {
        Self {
            pe: ratios.get(RatioKey::PriceToEarnings),
            sector_pe: snapshot
                .market
                .sector_pe
                .filter(|pe| *pe > 0.0)
                .unwrap_or(sector.benchmarks().pe),
            pb: ratios.get(RatioKey::PriceToBook),
            revenue_growth: ratios.get(RatioKey::RevenueGrowth),
            net_margin: ratios.get(RatioKey::NetMargin),
            dividend_yield: ratios.get(RatioKey::DividendYield),
            dividend_years: snapshot.history.consecutive_dividend_years(),
            growth_quality,
        }
    }

    /// P/E at or below `absolute`, or at or below `relative` × sector P/E.
    fn pe_at_most(&self, absolute: f64, relative: f64) -> bool {
        self.pe
            .is_some_and(|pe| pe <= absolute || pe <= relative * self.sector_pe)
    }

    fn growth_at_least(&self, rate: f64) -> bool {
        self.revenue_growth.is_some_and(|g| g >= rate)
    }

    fn growth_below(&self, rate: f64) -> bool {
        self.revenue_growth.map_or(true, |g| g < rate)
    }

    /// Positive P/E and a net margin of at least [`PROVEN_MARGIN`].
    fn earnings_proven(&self) -> bool {
        self.pe.is_some() && self.net_margin.is_some_and(|m| m >= PROVEN_MARGIN)
    }
}

/// One entry of the ordered rule list.
#[derive(Debug, Clone, Copy)]
pub struct StyleRule {
    pub style: CompanyStyle,
    pub name: &'static str,
    pub predicate: fn(&StyleSignals) -> bool,
}

pub const HIGH_GROWTH: f64 = 0.15;
pub const MODERATE_GROWTH: f64 = 0.08;
/// Net margin from which high-growth earnings count as proven.
pub const PROVEN_MARGIN: f64 = 0.02;

fn deep_value(s: &StyleSignals) -> bool {
    s.pe_at_most(10.0, 0.6) && s.pb.is_some_and(|pb| pb < 1.0) && s.growth_below(0.05)
}

fn value(s: &StyleSignals) -> bool {
    s.pe_at_most(15.0, 0.85) && s.pb.map_or(true, |pb| pb <= 1.5)
}

fn garp(s: &StyleSignals) -> bool {
    s.pe_at_most(25.0, 1.25) && s.growth_quality >= 60.0 && s.growth_at_least(MODERATE_GROWTH)
}

// The two high-growth rules split on earnings, so every company growing at
// HIGH_GROWTH or faster lands in one of them.
fn growth(s: &StyleSignals) -> bool {
    s.growth_at_least(HIGH_GROWTH) && s.earnings_proven()
}

fn speculative_growth(s: &StyleSignals) -> bool {
    s.growth_at_least(HIGH_GROWTH) && !s.earnings_proven()
}

fn dividend(s: &StyleSignals) -> bool {
    s.dividend_yield.is_some_and(|y| y >= 0.03)
        && s.dividend_years >= 5
        && s.growth_below(MODERATE_GROWTH)
}

fn blend(_: &StyleSignals) -> bool {
    true
}

/// The style rules in priority order. `blend` always matches.
pub const STYLE_RULES: &[StyleRule] = &[
    StyleRule {
        style: CompanyStyle::DeepValue,
        name: "deep_value_low_pe_below_book",
        predicate: deep_value,
    },
    StyleRule {
        style: CompanyStyle::Value,
        name: "value_discount_to_sector",
        predicate: value,
    },
    StyleRule {
        style: CompanyStyle::Garp,
        name: "garp_quality_growth_reasonable_pe",
        predicate: garp,
    },
    StyleRule {
        style: CompanyStyle::Growth,
        name: "growth_profitable_expansion",
        predicate: growth,
    },
    StyleRule {
        style: CompanyStyle::SpeculativeGrowth,
        name: "speculative_growth_unproven_earnings",
        predicate: speculative_growth,
    },
    StyleRule {
        style: CompanyStyle::Dividend,
        name: "dividend_steady_payer",
        predicate: dividend,
    },
    StyleRule {
        style: CompanyStyle::Blend,
        name: "blend_default",
        predicate: blend,
    },
];

/// First matching rule.
pub fn match_rule(signals: &StyleSignals) -> &'static StyleRule {
    STYLE_RULES
        .iter()
        .find(|rule| (rule.predicate)(signals))
        .unwrap_or(&STYLE_RULES[STYLE_RULES.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn signals() -> StyleSignals {
        StyleSignals {
            sector_pe: 20.0,
            growth_quality: 50.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_deep_value() {
        let s = StyleSignals {
            pe: Some(8.0),
            pb: Some(0.8),
            revenue_growth: Some(0.01),
            ..signals()
        };
        assert_eq!(match_rule(&s).style, CompanyStyle::DeepValue);
    }

    #[test]
    fn test_value_relative_to_sector() {
        // 16 > 15 but below 0.85 × 20
        let s = StyleSignals {
            pe: Some(16.0),
            pb: Some(1.2),
            ..signals()
        };
        assert_eq!(match_rule(&s).style, CompanyStyle::Value);
    }

    #[test]
    fn test_garp_needs_quality() {
        let s = StyleSignals {
            pe: Some(22.0),
            pb: Some(4.0),
            revenue_growth: Some(0.12),
            net_margin: Some(0.15),
            growth_quality: 70.0,
            ..signals()
        };
        assert_eq!(match_rule(&s).style, CompanyStyle::Garp);

        let low_quality = StyleSignals {
            growth_quality: 40.0,
            ..s
        };
        assert_eq!(match_rule(&low_quality).style, CompanyStyle::Blend);
    }

    #[test]
    fn test_growth_and_speculative() {
        let s = StyleSignals {
            pe: Some(45.0),
            pb: Some(10.0),
            revenue_growth: Some(0.30),
            net_margin: Some(0.12),
            ..signals()
        };
        assert_eq!(match_rule(&s).style, CompanyStyle::Growth);

        let unprofitable = StyleSignals {
            pe: None,
            net_margin: Some(-0.2),
            ..s
        };
        let rule = match_rule(&unprofitable);
        assert_eq!(rule.style, CompanyStyle::SpeculativeGrowth);
        assert_eq!(rule.name, "speculative_growth_unproven_earnings");
    }

    #[test_case(Some(60.0), Some(0.03), CompanyStyle::Growth ; "thin but proven margin")]
    #[test_case(Some(60.0), Some(0.02), CompanyStyle::Growth ; "margin at threshold")]
    #[test_case(Some(60.0), Some(0.019), CompanyStyle::SpeculativeGrowth ; "margin below threshold")]
    #[test_case(Some(60.0), None, CompanyStyle::SpeculativeGrowth ; "margin unknown")]
    #[test_case(None, Some(0.10), CompanyStyle::SpeculativeGrowth ; "no positive earnings multiple")]
    fn test_high_growth_always_growth_style(pe: Option<f64>, net_margin: Option<f64>, expected: CompanyStyle) {
        let s = StyleSignals {
            pe,
            pb: Some(8.0),
            revenue_growth: Some(0.30),
            net_margin,
            growth_quality: 70.0,
            ..signals()
        };
        assert_eq!(match_rule(&s).style, expected);
    }

    #[test]
    fn test_dividend() {
        let s = StyleSignals {
            pe: Some(19.0),
            pb: Some(2.5),
            revenue_growth: Some(0.02),
            dividend_yield: Some(0.045),
            dividend_years: 10,
            ..signals()
        };
        assert_eq!(match_rule(&s).style, CompanyStyle::Dividend);
    }

    #[test]
    fn test_nothing_known_is_blend() {
        assert_eq!(match_rule(&signals()).style, CompanyStyle::Blend);
    }
}
