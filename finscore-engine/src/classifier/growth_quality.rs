//! Growth quality score.
//!
//! Each factor goes through a monotonic piecewise-linear curve into [0, 100];
//! the score is the weighted mean over the factors that could be computed.

use crate::ratios::{RatioKey, RatioSet};

use super::types::{GrowthQuality, GrowthQualityComponent, GrowthQualityFactor, GrowthQualityLevel};

/// Score when no factor is available.
pub const NEUTRAL_GROWTH_QUALITY: f64 = 50.0;

// Curves as (input, score) knots, inputs ascending.

/// EPS growth minus revenue growth. Earnings outgrowing sales is margin
/// expansion; the reverse is compression.
const CONSISTENCY_CURVE: &[(f64, f64)] = &[
    (-0.15, 0.0),
    (-0.05, 35.0),
    (0.0, 60.0),
    (0.05, 80.0),
    (0.15, 100.0),
];

const FCF_GROWTH_CURVE: &[(f64, f64)] = &[
    (-0.10, 0.0),
    (0.0, 40.0),
    (0.05, 60.0),
    (0.15, 85.0),
    (0.25, 100.0),
];

/// Best of ROE / ROIC minus WACC.
const EXCESS_RETURN_CURVE: &[(f64, f64)] = &[
    (-0.10, 0.0),
    (0.0, 40.0),
    (0.05, 65.0),
    (0.15, 90.0),
    (0.25, 100.0),
];

/// Yearly change of the operating margin.
const MARGIN_TREND_CURVE: &[(f64, f64)] = &[
    (-0.03, 0.0),
    (-0.01, 25.0),
    (0.0, 50.0),
    (0.01, 75.0),
    (0.03, 100.0),
];

/// Piecewise-linear interpolation, flat beyond the end knots.
pub fn interpolate(x: f64, knots: &[(f64, f64)]) -> f64 {
    let (Some(&(x0, y0)), Some(&(xn, yn))) = (knots.first(), knots.last()) else {
        return NEUTRAL_GROWTH_QUALITY;
    };
    if x <= x0 {
        return y0;
    }
    if x >= xn {
        return yn;
    }
    knots
        .windows(2)
        .find(|pair| x <= pair[1].0)
        .map(|pair| {
            let ((xa, ya), (xb, yb)) = (pair[0], pair[1]);
            ya + (yb - ya) * (x - xa) / (xb - xa)
        })
        .unwrap_or(yn)
}

fn factor_input(factor: GrowthQualityFactor, ratios: &RatioSet, wacc: f64) -> Option<f64> {
    match factor {
        GrowthQualityFactor::EarningsConsistency => {
            Some(ratios.get(RatioKey::EpsGrowth)? - ratios.get(RatioKey::RevenueGrowth)?)
        }
        GrowthQualityFactor::FcfGrowth => ratios.get(RatioKey::FcfGrowth),
        GrowthQualityFactor::ExcessReturn => {
            let best = match (
                ratios.get(RatioKey::ReturnOnEquity),
                ratios.get(RatioKey::ReturnOnInvestedCapital),
            ) {
                (Some(roe), Some(roic)) => roe.max(roic),
                (Some(value), None) | (None, Some(value)) => value,
                (None, None) => return None,
            };
            Some(best - wacc)
        }
        GrowthQualityFactor::MarginTrend => ratios.get(RatioKey::OperatingMarginTrend),
    }
}

fn curve(factor: GrowthQualityFactor) -> &'static [(f64, f64)] {
    match factor {
        GrowthQualityFactor::EarningsConsistency => CONSISTENCY_CURVE,
        GrowthQualityFactor::FcfGrowth => FCF_GROWTH_CURVE,
        GrowthQualityFactor::ExcessReturn => EXCESS_RETURN_CURVE,
        GrowthQualityFactor::MarginTrend => MARGIN_TREND_CURVE,
    }
}

/// Growth quality of a company given its ratios and cost of capital.
pub fn growth_quality(ratios: &RatioSet, wacc: f64) -> GrowthQuality {
    let available: Vec<(GrowthQualityFactor, f64)> = GrowthQualityFactor::ALL
        .iter()
        .filter_map(|&factor| factor_input(factor, ratios, wacc).map(|input| (factor, input)))
        .collect();

    let total_weight: f64 = available.iter().map(|(factor, _)| factor.weight()).sum();
    if available.is_empty() || total_weight <= 0.0 {
        return GrowthQuality {
            score: NEUTRAL_GROWTH_QUALITY,
            level: GrowthQualityLevel::from_score(NEUTRAL_GROWTH_QUALITY),
            components: Vec::new(),
        };
    }

    let components: Vec<GrowthQualityComponent> = available
        .into_iter()
        .map(|(factor, input)| GrowthQualityComponent {
            factor,
            input,
            score: interpolate(input, curve(factor)),
            weight: factor.weight() / total_weight,
        })
        .collect();

    let raw: f64 = components.iter().map(|c| c.score * c.weight).sum();
    let score = ((raw * 10.0).round() / 10.0).clamp(0.0, 100.0);

    GrowthQuality {
        score,
        level: GrowthQualityLevel::from_score(score),
        components,
    }
}
