//! Sector adjustment of rule contributions.

use crate::config::AdjustmentRules;
use crate::ratios::{RatioKey, RatioSet};
use crate::sector::Sector;

use super::rules::{RuleHit, GROWTH_COMPANY_THRESHOLD};
use super::types::Metric;

/// Weight applied to a rule contribution and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Weighting {
    pub weight: f64,
    pub notes: Vec<String>,
}

impl Weighting {
    pub fn neutral() -> Self {
        Self {
            weight: 1.0,
            notes: Vec::new(),
        }
    }

    /// Multiply in another weighting, keeping both sets of notes.
    pub fn combine(mut self, other: Weighting) -> Self {
        self.weight *= other.weight;
        self.notes.extend(other.notes);
        self
    }
}

/// Sector weight for one rule hit.
pub fn sector_weighting(
    rules: &AdjustmentRules,
    sector: Sector,
    hit: &RuleHit,
    ratios: &RatioSet,
) -> Weighting {
    if rules.ignore_metrics.contains(&hit.metric) {
        return Weighting {
            weight: 0.0,
            notes: vec![format!("{} is not meaningful for {}", hit.metric, sector)],
        };
    }

    if hit.metric == Metric::FreeCashFlow
        && hit.raw_points < 0
        && rules.tolerate_negative_fcf_when_growing
    {
        if let Some(growth) = ratios
            .get(RatioKey::RevenueGrowth)
            .filter(|g| *g > GROWTH_COMPANY_THRESHOLD)
        {
            return Weighting {
                weight: 0.0,
                notes: vec![format!(
                    "negative free cash flow tolerated while revenue grows {:.1}%",
                    growth * 100.0
                )],
            };
        }
    }

    let weight = rules.weight(hit.metric);
    let mut notes = Vec::new();
    if (weight - 1.0).abs() > f64::EPSILON {
        notes.push(format!("{} weight {:.2}", sector, weight));
    }
    Weighting { weight, notes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;

    #[test]
    fn test_ignored_metric_weighs_zero() {
        let rules = ScoringConfig::default().rules_for(Sector::Financials);
        let hit = RuleHit::new(Metric::DebtToEquity, 9.0, -5, "excessive_leverage");
        let weighting = sector_weighting(&rules, Sector::Financials, &hit, &RatioSet::new());
        assert_eq!(weighting.weight, 0.0);
        assert_eq!(weighting.notes[0], "debt_to_equity is not meaningful for financials");
    }

    #[test]
    fn test_negative_fcf_tolerated_for_growing_tech() {
        let rules = ScoringConfig::default().rules_for(Sector::Technology);
        let hit = RuleHit::new(Metric::FreeCashFlow, -50.0, -4, "negative_free_cash_flow");

        let mut ratios = RatioSet::new();
        ratios.insert(RatioKey::RevenueGrowth, Some(0.30), &[]);
        assert_eq!(
            sector_weighting(&rules, Sector::Technology, &hit, &ratios).weight,
            0.0
        );

        let mut slow = RatioSet::new();
        slow.insert(RatioKey::RevenueGrowth, Some(0.05), &[]);
        assert_eq!(
            sector_weighting(&rules, Sector::Technology, &hit, &slow).weight,
            1.0
        );
    }

    #[test]
    fn test_category_weight() {
        let rules = ScoringConfig::default().rules_for(Sector::Utilities);
        let hit = RuleHit::new(Metric::RevenueGrowth, 0.02, 1, "revenue_growth_moderate");
        let weighting = sector_weighting(&rules, Sector::Utilities, &hit, &RatioSet::new());
        assert_eq!(weighting.weight, 0.5);
        assert_eq!(weighting.notes, vec!["utilities weight 0.50".to_string()]);
    }

    #[test]
    fn test_unknown_sector_is_neutral() {
        let rules = ScoringConfig::default().rules_for(Sector::Unknown);
        let hit = RuleHit::new(Metric::PriceToEarnings, 30.0, -5, "pe_expensive");
        assert_eq!(
            sector_weighting(&rules, Sector::Unknown, &hit, &RatioSet::new()),
            Weighting::neutral()
        );
    }
}
