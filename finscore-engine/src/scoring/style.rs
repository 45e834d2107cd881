//! Style adjustment.
//!
//! Growth styles carry high multiples as a matter of course: their multiple
//! penalties are dampened by growth quality and their growth category counts
//! more. Value styles lean on valuation and discount growth.

use crate::classifier::{CompanyClassification, CompanyStyle};
use crate::config::ScoringConfig;

use super::rules::{RuleHit, GARP_QUALITY_POINTS};
use super::sector_adjust::Weighting;
use super::types::{Category, Metric};

/// Style weight for one rule hit.
pub fn style_weighting(
    classification: &CompanyClassification,
    config: &ScoringConfig,
    hit: &RuleHit,
) -> Weighting {
    let style = classification.style;
    let weights = &config.style_weights;
    let category = hit.metric.category();
    let mut weighting = Weighting::neutral();

    if style.is_growth_oriented() {
        if hit.metric.is_multiple() && hit.raw_points < 0 {
            let factor = dampening_factor(classification.growth_quality_score, config);
            weighting.weight *= factor;
            weighting.notes.push(format!(
                "{} penalty dampened to {:.0}% by growth quality {:.0}",
                style,
                factor * 100.0,
                classification.growth_quality_score
            ));
        }
        if category == Category::Growth {
            weighting.weight *= weights.growth_boost;
            weighting
                .notes
                .push(format!("{} growth weight {:.2}", style, weights.growth_boost));
        }
    } else if style.is_value_oriented() {
        let factor = match category {
            Category::Valuation => Some(weights.value_valuation_boost),
            Category::Growth => Some(weights.value_growth_discount),
            _ => None,
        };
        if let Some(factor) = factor {
            weighting.weight *= factor;
            weighting
                .notes
                .push(format!("{} {} weight {:.2}", style, category, factor));
        }
    }

    weighting
}

/// `1 − gq/100 × dampening`, in [0, 1].
pub fn dampening_factor(growth_quality: f64, config: &ScoringConfig) -> f64 {
    (1.0 - growth_quality / 100.0 * config.style_penalty_dampening).clamp(0.0, 1.0)
}

/// Bonus granted by the style itself.
pub fn style_bonus(classification: &CompanyClassification, config: &ScoringConfig) -> Option<RuleHit> {
    let gq = classification.growth_quality_score;
    (classification.style == CompanyStyle::Garp
        && gq >= config.style_weights.garp_quality_bonus_threshold)
        .then(|| RuleHit::new(Metric::StyleFit, gq, GARP_QUALITY_POINTS, "garp_quality_premium"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::GrowthQualityLevel;

    fn classification(style: CompanyStyle, gq: f64) -> CompanyClassification {
        CompanyClassification {
            style,
            growth_quality_score: gq,
            growth_quality_level: GrowthQualityLevel::from_score(gq),
            growth_quality_components: Vec::new(),
            matched_rule: style.key().to_string(),
        }
    }

    #[test]
    fn test_growth_penalty_dampened() {
        let config = ScoringConfig::default();
        let hit = RuleHit::new(Metric::PriceToEarnings, 60.0, -5, "pe_expensive");
        let weighting = style_weighting(&classification(CompanyStyle::Growth, 80.0), &config, &hit);
        // 1 - 0.8 * 0.5
        assert!((weighting.weight - 0.6).abs() < 1e-12);
        assert_eq!(weighting.notes.len(), 1);
    }

    #[test]
    fn test_growth_reward_not_dampened() {
        let config = ScoringConfig::default();
        let hit = RuleHit::new(Metric::PriceToEarnings, 10.0, 5, "pe_deep_discount");
        let weighting = style_weighting(&classification(CompanyStyle::Growth, 80.0), &config, &hit);
        assert_eq!(weighting.weight, 1.0);
    }

    #[test]
    fn test_value_weights() {
        let config = ScoringConfig::default();
        let value = classification(CompanyStyle::Value, 50.0);
        let pe = RuleHit::new(Metric::PriceToEarnings, 10.0, 5, "pe_deep_discount");
        let growth = RuleHit::new(Metric::RevenueGrowth, 0.02, 1, "revenue_growth_moderate");
        assert_eq!(style_weighting(&value, &config, &pe).weight, 1.25);
        assert_eq!(style_weighting(&value, &config, &growth).weight, 0.8);
    }

    #[test]
    fn test_blend_is_neutral() {
        let config = ScoringConfig::default();
        let hit = RuleHit::new(Metric::PriceToEarnings, 60.0, -5, "pe_expensive");
        assert_eq!(
            style_weighting(&classification(CompanyStyle::Blend, 90.0), &config, &hit),
            Weighting::neutral()
        );
    }

    #[test]
    fn test_garp_bonus() {
        let config = ScoringConfig::default();
        assert!(style_bonus(&classification(CompanyStyle::Garp, 80.0), &config).is_some());
        assert!(style_bonus(&classification(CompanyStyle::Garp, 70.0), &config).is_none());
        assert!(style_bonus(&classification(CompanyStyle::Growth, 90.0), &config).is_none());
    }

    #[test]
    fn test_zero_dampening_keeps_full_penalty() {
        let config = ScoringConfig {
            style_penalty_dampening: 0.0,
            ..Default::default()
        };
        assert_eq!(dampening_factor(100.0, &config), 1.0);
    }
}
