//! Explanation text for alerts.
//!
//! Alerts carry a `category.reason` key; the text behind it comes from an
//! [`ExplanationLookup`] so callers can swap in their own wording or locale.
//! [`StaticCatalogue`] is the built-in English table.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use super::types::{Alert, Category};

/// Source of explanation text.
pub trait ExplanationLookup: Send + Sync {
    /// Text for an alert, `None` when the key is unknown.
    fn explain(&self, alert: &Alert) -> Option<String>;
}

/// Built-in catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalogue;

static CATALOGUE: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        // Solidity
        ("solidity.altman_safe", "Altman Z-Score in the safe zone: low bankruptcy risk."),
        ("solidity.altman_grey", "Altman Z-Score in the grey zone: financial stress cannot be ruled out."),
        ("solidity.altman_distress", "Altman Z-Score in the distress zone: elevated bankruptcy risk."),
        ("solidity.altman_unavailable", "Altman Z-Score could not be computed from the reported balance sheet."),
        ("solidity.strong_liquidity", "Current assets cover short-term liabilities twice over."),
        ("solidity.good_liquidity", "Comfortable short-term liquidity."),
        ("solidity.adequate_liquidity", "Current assets cover short-term liabilities."),
        ("solidity.tight_liquidity", "Short-term liabilities exceed current assets."),
        ("solidity.weak_liquidity", "Liquidity is weak; refinancing may be needed to meet short-term obligations."),
        ("solidity.low_leverage", "Debt is low relative to equity for the sector."),
        ("solidity.moderate_leverage", "Leverage is within the sector norm."),
        ("solidity.elevated_leverage", "Leverage is somewhat above the sector norm."),
        ("solidity.high_leverage", "Leverage is high for the sector."),
        ("solidity.excessive_leverage", "Leverage is well above what the sector usually carries."),
        ("solidity.negative_equity", "Liabilities exceed assets: shareholders' equity is negative."),
        ("solidity.interest_well_covered", "Operating profit covers interest more than ten times."),
        ("solidity.interest_covered", "Operating profit comfortably covers interest."),
        ("solidity.interest_adequately_covered", "Operating profit covers interest adequately."),
        ("solidity.interest_thinly_covered", "Interest coverage is thin."),
        ("solidity.interest_not_covered", "Operating profit barely covers, or fails to cover, interest."),
        ("solidity.financial_health_strong", "Strong returns and capital position for a financial company."),
        ("solidity.financial_health_good", "Sound returns and capital position for a financial company."),
        ("solidity.financial_health_neutral", "Average returns and capital position for a financial company."),
        ("solidity.financial_health_weak", "Weak returns or thin capital for a financial company."),
        // Profitability
        ("profitability.roe_exceptional", "Return on equity above 25%."),
        ("profitability.roe_strong", "Return on equity above 15%."),
        ("profitability.roe_adequate", "Return on equity above 10%."),
        ("profitability.roe_low", "Return on equity below 10%."),
        ("profitability.roe_very_low", "Return on equity below 5%."),
        ("profitability.roe_negative", "Return on equity is negative."),
        ("profitability.roa_exceptional", "Return on assets above 15%."),
        ("profitability.roa_strong", "Return on assets above 8%."),
        ("profitability.roa_adequate", "Return on assets above 3%."),
        ("profitability.roa_low", "Return on assets below 3%."),
        ("profitability.roa_negative", "Return on assets is negative."),
        ("profitability.operating_margin_exceptional", "Operating margin above 30%."),
        ("profitability.operating_margin_strong", "Operating margin above 20%."),
        ("profitability.operating_margin_adequate", "Operating margin above 10%."),
        ("profitability.operating_margin_thin", "Operating margin below 10%."),
        ("profitability.operating_margin_very_thin", "Operating margin below 5%."),
        ("profitability.operating_loss", "The company makes an operating loss."),
        ("profitability.net_margin_exceptional", "Net margin above 20%."),
        ("profitability.net_margin_strong", "Net margin above 10%."),
        ("profitability.net_margin_adequate", "Net margin above 5%."),
        ("profitability.net_margin_thin", "Net margin below 5%."),
        ("profitability.net_loss", "The company reports a net loss."),
        // Valuation
        ("valuation.pe_deep_discount", "P/E well below the sector benchmark."),
        ("valuation.pe_discount", "P/E below the sector benchmark."),
        ("valuation.pe_in_line", "P/E in line with the sector benchmark."),
        ("valuation.pe_premium", "P/E above the sector benchmark."),
        ("valuation.pe_expensive", "P/E far above the sector benchmark."),
        ("valuation.p_ffo_cheap", "Price to FFO below 12."),
        ("valuation.p_ffo_attractive", "Price to FFO below 15."),
        ("valuation.p_ffo_fair", "Price to FFO in the usual REIT range."),
        ("valuation.p_ffo_premium", "Price to FFO above 18."),
        ("valuation.p_ffo_expensive", "Price to FFO above 25."),
        ("valuation.p_fcf_cheap", "Price to free cash flow below 12."),
        ("valuation.p_fcf_attractive", "Price to free cash flow below 18."),
        ("valuation.p_fcf_fair", "Price to free cash flow below 25."),
        ("valuation.p_fcf_premium", "Price to free cash flow above 25."),
        ("valuation.p_fcf_expensive", "Price to free cash flow above 35."),
        ("valuation.ev_ebitda_discount", "EV/EBITDA well below the sector benchmark."),
        ("valuation.ev_ebitda_below_sector", "EV/EBITDA below the sector benchmark."),
        ("valuation.ev_ebitda_in_line", "EV/EBITDA in line with the sector benchmark."),
        ("valuation.ev_ebitda_premium", "EV/EBITDA above the sector benchmark."),
        ("valuation.ev_ebitda_expensive", "EV/EBITDA far above the sector benchmark."),
        ("valuation.peg_cheap", "PEG below 0.8: growth is cheap."),
        ("valuation.peg_fair", "PEG near 1: growth is fairly priced."),
        ("valuation.peg_full", "PEG above 1.2: growth is fully priced."),
        ("valuation.peg_high", "PEG above 1.8."),
        ("valuation.peg_expensive", "PEG above 2.5: growth is expensive."),
        ("valuation.fcf_yield_high", "Free cash flow yield above 8%."),
        ("valuation.fcf_yield_attractive", "Free cash flow yield above 5%."),
        ("valuation.garp_quality_premium", "Growth at a reasonable price backed by high growth quality."),
        ("valuation.terminal_growth_clamped", "Terminal growth was lowered to keep it below the discount rate."),
        ("valuation.terminal_value_dominant", "Most of the DCF value comes from the terminal value."),
        ("valuation.dcf_unavailable", "No discounted cash flow value could be computed."),
        // Earnings quality
        ("earnings_quality.piotroski_excellent", "Piotroski F-Score of 8 or 9."),
        ("earnings_quality.piotroski_strong", "Piotroski F-Score of 6 or 7."),
        ("earnings_quality.piotroski_neutral", "Piotroski F-Score of 4 or 5."),
        ("earnings_quality.piotroski_weak", "Piotroski F-Score of 2 or 3."),
        ("earnings_quality.piotroski_very_weak", "Piotroski F-Score of 0 or 1."),
        ("earnings_quality.piotroski_unavailable", "Piotroski F-Score could not be computed."),
        ("earnings_quality.positive_operating_cash_flow", "Operations generate cash."),
        ("earnings_quality.negative_operating_cash_flow", "Operations consume cash."),
        ("earnings_quality.positive_free_cash_flow", "Free cash flow is positive after capital expenditure."),
        ("earnings_quality.negative_free_cash_flow", "Capital expenditure exceeds operating cash flow."),
        ("earnings_quality.fcf_exceeds_earnings", "Free cash flow exceeds reported earnings."),
        ("earnings_quality.fcf_backs_earnings", "Most reported earnings turn into free cash flow."),
        ("earnings_quality.fcf_partially_backs_earnings", "Only part of reported earnings turns into free cash flow."),
        ("earnings_quality.fcf_lags_earnings", "Little of reported earnings turns into free cash flow."),
        ("earnings_quality.ffo_payout_conservative", "Distributions below 70% of FFO."),
        ("earnings_quality.ffo_payout_healthy", "Distributions below 85% of FFO."),
        ("earnings_quality.ffo_payout_full", "Distributions close to FFO."),
        ("earnings_quality.ffo_payout_stretched", "Distributions exceed FFO."),
        ("earnings_quality.ffo_payout_unsustainable", "Distributions far exceed FFO."),
        // Growth
        ("growth.revenue_growth_exceptional", "Revenue grows above 20% a year."),
        ("growth.revenue_growth_strong", "Revenue grows above 10% a year."),
        ("growth.revenue_growth_moderate", "Revenue grows moderately."),
        ("growth.revenue_flat", "Revenue is flat."),
        ("growth.revenue_declining", "Revenue is shrinking."),
        ("growth.eps_growth_exceptional", "EPS grows above 25% a year."),
        ("growth.eps_growth_strong", "EPS grows above 12% a year."),
        ("growth.eps_growth_moderate", "EPS grows moderately."),
        ("growth.eps_flat", "EPS is flat."),
        ("growth.eps_declining", "EPS is shrinking."),
        ("growth.fcf_growth_strong", "Free cash flow grows above 15% a year."),
        ("growth.fcf_growth_moderate", "Free cash flow grows moderately."),
        ("growth.fcf_stable", "Free cash flow is stable."),
        ("growth.fcf_declining", "Free cash flow is shrinking."),
        ("growth.high_growth_company", "Revenue growth above 15% marks a growth company."),
        ("growth.inconsistent_periods", "The prior period does not precede the current one; period comparisons may be unreliable."),
    ])
});

/// Reasons shared by every category.
static GENERIC: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([(
        "insufficient_data",
        "Not enough data to evaluate this category; it was scored at the neutral midpoint.",
    )])
});

fn category_fallback(category: Category) -> &'static str {
    match category {
        Category::Solidity => "Balance sheet signal.",
        Category::Profitability => "Profitability signal.",
        Category::Valuation => "Valuation signal.",
        Category::EarningsQuality => "Earnings quality signal.",
        Category::Growth => "Growth signal.",
    }
}

impl ExplanationLookup for StaticCatalogue {
    fn explain(&self, alert: &Alert) -> Option<String> {
        if let Some(ratio) = alert.ratio {
            return Some(format!(
                "{} could not be computed: {} not reported.",
                ratio,
                alert.missing_inputs.join(", ")
            ));
        }
        CATALOGUE
            .get(alert.explanation_key.as_str())
            .or_else(|| GENERIC.get(alert.reason.as_str()))
            .map(|text| text.to_string())
            .or_else(|| Some(category_fallback(alert.category).to_string()))
    }
}

/// Fill in the explanation of every alert.
pub fn annotate(alerts: &mut [Alert], lookup: &dyn ExplanationLookup) {
    for alert in alerts.iter_mut() {
        alert.explanation = lookup.explain(alert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratios::RatioKey;
    use crate::scoring::types::Metric;

    #[test]
    fn test_exact_key() {
        let alert = Alert::info(Category::Valuation, None, "terminal_growth_clamped");
        let text = StaticCatalogue.explain(&alert).unwrap();
        assert!(text.contains("Terminal growth"));
    }

    #[test]
    fn test_generic_reason() {
        let alert = Alert::info(Category::Growth, None, "insufficient_data");
        assert!(StaticCatalogue
            .explain(&alert)
            .unwrap()
            .contains("neutral midpoint"));
    }

    #[test]
    fn test_unknown_reason_falls_back_to_category() {
        let alert = Alert::info(Category::Profitability, Some(Metric::NetMargin), "custom");
        assert_eq!(
            StaticCatalogue.explain(&alert).as_deref(),
            Some("Profitability signal.")
        );
    }

    #[test]
    fn test_ratio_unavailable_names_inputs() {
        let alert = Alert::ratio_unavailable(RatioKey::QuickRatio, vec!["inventory".into()]);
        assert_eq!(
            StaticCatalogue.explain(&alert).as_deref(),
            Some("quick_ratio could not be computed: inventory not reported.")
        );
    }

    struct Silent;

    impl ExplanationLookup for Silent {
        fn explain(&self, _alert: &Alert) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_annotate_with_custom_lookup() {
        let mut alerts = vec![Alert::info(Category::Solidity, None, "altman_unavailable")];
        annotate(&mut alerts, &StaticCatalogue);
        assert!(alerts[0].explanation.is_some());
        annotate(&mut alerts, &Silent);
        assert!(alerts[0].explanation.is_none());
    }
}
