//! Justified P/E.
//!
//! Gordon growth rearranged as a multiple, `(1 + g) / (r − g)`, then scaled
//! by return on equity: durable high returns earn a premium, weak returns a
//! discount. Used to tell a high P/E the growth pays for from one it does not.

use crate::ratios::{RatioKey, RatioSet};

use super::types::{JustifiedGrowthSource, JustifiedPe};

pub const JUSTIFIED_PE_FLOOR: f64 = 5.0;
pub const JUSTIFIED_PE_CEILING: f64 = 80.0;

/// Growth is kept at least this far below the required return.
const MIN_SPREAD: f64 = 0.01;
const GROWTH_FLOOR: f64 = -0.05;

/// ROE threshold → multiple factor, first match wins.
const QUALITY_PREMIUMS: &[(f64, f64)] = &[(0.30, 1.35), (0.20, 1.20)];
const LOW_QUALITY_ROE: f64 = 0.08;
const LOW_QUALITY_FACTOR: f64 = 0.85;

/// Justified P/E from EPS growth (revenue growth when EPS growth is
/// unknown) discounted at `required_return`.
pub fn justified_pe(ratios: &RatioSet, required_return: f64) -> Option<JustifiedPe> {
    if !required_return.is_finite() || required_return <= 0.0 {
        return None;
    }
    let (raw_growth, growth_source) = ratios
        .get(RatioKey::EpsGrowth)
        .map(|g| (g, JustifiedGrowthSource::EpsGrowth))
        .or_else(|| {
            ratios
                .get(RatioKey::RevenueGrowth)
                .map(|g| (g, JustifiedGrowthSource::RevenueGrowth))
        })?;

    let growth = raw_growth.min(required_return - MIN_SPREAD).max(GROWTH_FLOOR);
    let spread = required_return - growth;
    if spread <= 0.0 {
        return None;
    }

    let quality_factor = quality_factor(ratios.get(RatioKey::ReturnOnEquity));
    let multiple = ((1.0 + growth) / spread * quality_factor)
        .clamp(JUSTIFIED_PE_FLOOR, JUSTIFIED_PE_CEILING);

    Some(JustifiedPe {
        multiple,
        growth,
        growth_source,
        required_return,
        quality_factor,
    })
}

fn quality_factor(roe: Option<f64>) -> f64 {
    let Some(roe) = roe else {
        return 1.0;
    };
    QUALITY_PREMIUMS
        .iter()
        .find(|(threshold, _)| roe > *threshold)
        .map(|(_, factor)| *factor)
        .unwrap_or(if roe < LOW_QUALITY_ROE { LOW_QUALITY_FACTOR } else { 1.0 })
}
