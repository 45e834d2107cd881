//! Three-stage discounted cash flow.
//!
//! 1. High growth (years 1..=n1): starts at the stage-1 rate and decays
//!    linearly toward the stage-2 rate.
//! 2. Transition (years n1+1..=n1+n2): decays linearly to the terminal rate.
//! 3. Terminal: Gordon growth on the final projected cash flow.
//!
//! The terminal rate is always kept at least `min_terminal_spread` below the
//! WACC; a higher request is lowered and reported rather than rejected.

use crate::classifier::CompanyStyle;
use crate::config::{DcfConfig, ScoringConfig};
use crate::error::ModelOutcome;
use crate::ratios::{RatioKey, RatioSet};
use crate::snapshot::FinancialSnapshot;

use super::types::{DcfResult, GrowthAssumptions, GrowthSource, ProjectedCashFlow, StageProfile};

/// Terminal value share of enterprise value above which a warning is attached.
pub const TERMINAL_SHARE_WARNING: f64 = 0.75;

impl Default for StageProfile {
    fn default() -> Self {
        Self::for_style(CompanyStyle::Blend)
    }
}

impl StageProfile {
    /// Stage shape for a company style. Durable growers keep more of their
    /// growth into stage 2; speculative growth is haircut up front.
    pub fn for_style(style: CompanyStyle) -> Self {
        let (stage1_haircut, stage2_fraction) = match style {
            CompanyStyle::Growth => (1.0, 0.6),
            CompanyStyle::SpeculativeGrowth => (0.8, 0.4),
            CompanyStyle::Garp => (1.0, 0.5),
            CompanyStyle::Value => (0.9, 0.35),
            CompanyStyle::DeepValue => (0.8, 0.3),
            CompanyStyle::Dividend => (0.9, 0.3),
            CompanyStyle::Blend => (1.0, 0.5),
        };
        Self {
            stage1_haircut,
            stage2_fraction,
        }
    }
}

/// Inputs of one DCF run.
#[derive(Debug, Clone, PartialEq)]
pub struct DcfInputs {
    /// Trailing free cash flow, must be positive
    pub base_fcf: f64,
    pub shares: f64,
    pub wacc: f64,
    pub growth_source: GrowthSource,
    /// Historical growth; `None` uses the configured default
    pub historical_rate: Option<f64>,
    pub requested_terminal_rate: f64,
    pub profile: StageProfile,
}

impl DcfInputs {
    pub fn new(base_fcf: f64, shares: f64, wacc: f64, historical_rate: f64, terminal_rate: f64) -> Self {
        Self {
            base_fcf,
            shares,
            wacc,
            growth_source: GrowthSource::FcfGrowth,
            historical_rate: Some(historical_rate),
            requested_terminal_rate: terminal_rate,
            profile: StageProfile::default(),
        }
    }

    /// Same inputs with shifted WACC and growth.
    pub fn shifted(&self, wacc_delta: f64, growth_delta: f64, default_growth: f64) -> Self {
        Self {
            wacc: self.wacc + wacc_delta,
            historical_rate: Some(self.historical_rate.unwrap_or(default_growth) + growth_delta),
            ..self.clone()
        }
    }
}

/// Three-stage DCF model.
#[derive(Debug, Clone)]
pub struct DcfModel {
    config: DcfConfig,
    terminal_growth_cap: f64,
}

impl Default for DcfModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DcfModel {
    pub fn new() -> Self {
        Self::with_config(&ScoringConfig::default())
    }

    pub fn with_config(config: &ScoringConfig) -> Self {
        Self {
            config: config.dcf.clone(),
            terminal_growth_cap: config.terminal_growth_cap,
        }
    }

    pub fn default_growth(&self) -> f64 {
        self.config.default_growth
    }

    /// Gather DCF inputs from ratios. Growth comes from the first available
    /// of FCF, EPS and revenue growth.
    pub fn inputs(
        &self,
        snapshot: &FinancialSnapshot,
        ratios: &RatioSet,
        wacc: f64,
        style: CompanyStyle,
    ) -> ModelOutcome<DcfInputs> {
        let Some(base_fcf) = ratios.get(RatioKey::FreeCashFlow) else {
            return ModelOutcome::missing(&["operating_cash_flow", "capital_expenditure"]);
        };
        if base_fcf <= 0.0 {
            return ModelOutcome::degenerate(format!(
                "free cash flow {:.2} is not positive",
                base_fcf
            ));
        }

        let Some(shares) = snapshot.shares() else {
            return ModelOutcome::missing(&["shares_outstanding"]);
        };

        let (growth_source, historical_rate) = [
            (GrowthSource::FcfGrowth, RatioKey::FcfGrowth),
            (GrowthSource::EpsGrowth, RatioKey::EpsGrowth),
            (GrowthSource::RevenueGrowth, RatioKey::RevenueGrowth),
        ]
        .into_iter()
        .find_map(|(source, key)| ratios.get(key).map(|rate| (source, Some(rate))))
        .unwrap_or((GrowthSource::Default, None));

        ModelOutcome::Computed(DcfInputs {
            base_fcf,
            shares,
            wacc,
            growth_source,
            historical_rate,
            requested_terminal_rate: self.terminal_growth_cap,
            profile: StageProfile::for_style(style),
        })
    }

    /// Project, discount and sum.
    pub fn run(&self, inputs: &DcfInputs) -> ModelOutcome<DcfResult> {
        if !(inputs.base_fcf > 0.0 && inputs.base_fcf.is_finite()) {
            return ModelOutcome::degenerate("free cash flow is not positive");
        }
        if !(inputs.shares > 0.0 && inputs.shares.is_finite()) {
            return ModelOutcome::degenerate("shares outstanding is not positive");
        }
        if !(inputs.wacc > 0.0 && inputs.wacc.is_finite()) {
            return ModelOutcome::degenerate("discount rate is not positive");
        }

        let growth = self.assumptions(inputs);
        let wacc = inputs.wacc;
        let n1 = self.config.high_growth_years;
        let n2 = self.config.transition_years;

        let mut projections = Vec::with_capacity((n1 + n2) as usize);
        let mut fcf = inputs.base_fcf;
        for year in 1..=(n1 + n2) {
            let (stage, rate) = if year <= n1 {
                let progress = f64::from(year - 1) / f64::from(n1);
                (1, growth.stage1_rate + (growth.stage2_rate - growth.stage1_rate) * progress)
            } else {
                let progress = f64::from(year - n1) / f64::from(n2);
                (2, growth.stage2_rate + (growth.terminal_rate - growth.stage2_rate) * progress)
            };
            fcf *= 1.0 + rate;
            let discount_factor = (1.0 + wacc).powi(-(year as i32));
            projections.push(ProjectedCashFlow {
                year,
                stage,
                growth_rate: rate,
                fcf,
                discount_factor,
                present_value: fcf * discount_factor,
            });
        }

        let sum_pv_fcf: f64 = projections.iter().map(|p| p.present_value).sum();
        let (final_fcf, final_discount) = projections
            .last()
            .map_or((inputs.base_fcf, 1.0), |p| (p.fcf, p.discount_factor));

        let terminal_value = final_fcf * (1.0 + growth.terminal_rate) / (wacc - growth.terminal_rate);
        let pv_terminal_value = terminal_value * final_discount;
        let enterprise_value = sum_pv_fcf + pv_terminal_value;
        let fair_value_per_share = enterprise_value / inputs.shares;

        if !fair_value_per_share.is_finite() {
            return ModelOutcome::degenerate("fair value is not finite");
        }

        let terminal_value_share = pv_terminal_value / enterprise_value;
        let mut warnings = Vec::new();
        if growth.terminal_clamped {
            warnings.push(format!(
                "terminal growth lowered from {:.2}% to {:.2}% to stay below WACC {:.2}%",
                growth.requested_terminal_rate * 100.0,
                growth.terminal_rate * 100.0,
                wacc * 100.0
            ));
        }
        if terminal_value_share > TERMINAL_SHARE_WARNING {
            warnings.push(format!(
                "terminal value is {:.0}% of enterprise value",
                terminal_value_share * 100.0
            ));
        }

        ModelOutcome::Computed(DcfResult {
            wacc,
            base_fcf: inputs.base_fcf,
            shares: inputs.shares,
            growth,
            projections,
            sum_pv_fcf,
            terminal_value,
            pv_terminal_value,
            enterprise_value,
            fair_value_per_share,
            terminal_value_share,
            warnings,
        })
    }

    fn assumptions(&self, inputs: &DcfInputs) -> GrowthAssumptions {
        let band = |rate: f64| rate.clamp(self.config.growth_floor, self.config.growth_ceiling);

        let max_terminal = inputs.wacc - self.config.min_terminal_spread;
        let terminal_rate = inputs.requested_terminal_rate.min(max_terminal);

        let base = inputs.historical_rate.unwrap_or(self.config.default_growth);
        let stage1_rate = band(base * inputs.profile.stage1_haircut);
        let stage2_rate =
            band(terminal_rate + (stage1_rate - terminal_rate) * inputs.profile.stage2_fraction);

        GrowthAssumptions {
            source: inputs.growth_source,
            historical_rate: inputs.historical_rate,
            stage1_rate,
            stage2_rate,
            terminal_rate,
            requested_terminal_rate: inputs.requested_terminal_rate,
            terminal_clamped: terminal_rate < inputs.requested_terminal_rate,
            profile: inputs.profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratios::RatioCalculator;

    #[test]
    fn test_terminal_growth_clamped_below_wacc() {
        let inputs = DcfInputs::new(100.0, 10.0, 0.09, 0.12, 0.10);
        let outcome = DcfModel::new().run(&inputs);
        let result = outcome.computed().unwrap();

        assert!((result.growth.terminal_rate - 0.07).abs() < 1e-12);
        assert!(result.growth.terminal_clamped);
        assert!(result.wacc - result.growth.terminal_rate >= 0.02 - 1e-12);
        assert!(result.fair_value_per_share.is_finite());
        assert!(result.fair_value_per_share > 0.0);
        assert!(result.warnings[0].contains("terminal growth lowered"));
    }

    #[test]
    fn test_projection_shape() {
        let inputs = DcfInputs::new(100.0, 10.0, 0.10, 0.20, 0.025);
        let outcome = DcfModel::new().run(&inputs);
        let result = outcome.computed().unwrap();

        assert_eq!(result.projections.len(), 10);
        assert!(!result.growth.terminal_clamped);
        // Blend profile: stage 2 halfway between 20% and 2.5%
        assert!((result.growth.stage2_rate - 0.1125).abs() < 1e-12);
        assert!((result.projections[0].growth_rate - 0.20).abs() < 1e-12);
        assert_eq!(result.projections[4].stage, 1);
        assert_eq!(result.projections[5].stage, 2);
        assert!((result.projections[9].growth_rate - 0.025).abs() < 1e-12);
        // Rates decay monotonically
        for pair in result.projections.windows(2) {
            assert!(pair[1].growth_rate <= pair[0].growth_rate + 1e-12);
        }
        // Year 1 cash flow
        assert!((result.projections[0].fcf - 120.0).abs() < 1e-9);
        let sum = result.sum_pv_fcf + result.pv_terminal_value;
        assert!((result.enterprise_value - sum).abs() < 1e-9);
        assert!((result.fair_value_per_share - sum / 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_growth_matches_closed_form() {
        // Stage rates equal to the terminal rate reduce to a growing perpetuity
        let mut inputs = DcfInputs::new(100.0, 1.0, 0.10, 0.02, 0.02);
        inputs.profile = StageProfile {
            stage1_haircut: 1.0,
            stage2_fraction: 0.0,
        };
        let outcome = DcfModel::new().run(&inputs);
        let result = outcome.computed().unwrap();
        let perpetuity = 100.0 * 1.02 / (0.10 - 0.02);
        assert!((result.enterprise_value - perpetuity).abs() < 1e-6);
    }

    #[test]
    fn test_growth_band() {
        let inputs = DcfInputs::new(100.0, 10.0, 0.10, 0.90, 0.025);
        let outcome = DcfModel::new().run(&inputs);
        assert!((outcome.computed().unwrap().growth.stage1_rate - 0.40).abs() < 1e-12);

        let inputs = DcfInputs::new(100.0, 10.0, 0.10, -0.50, 0.025);
        let outcome = DcfModel::new().run(&inputs);
        assert!((outcome.computed().unwrap().growth.stage1_rate + 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_fcf_is_degenerate() {
        let inputs = DcfInputs::new(-5.0, 10.0, 0.10, 0.05, 0.025);
        assert!(matches!(
            DcfModel::new().run(&inputs),
            ModelOutcome::Degenerate { .. }
        ));
    }

    #[test]
    fn test_inputs_from_ratios() {
        let mut snapshot = FinancialSnapshot::new("DCF");
        snapshot.current.operating_cash_flow = Some(150.0);
        snapshot.current.capital_expenditure = Some(50.0);
        snapshot.current.shares_outstanding = Some(20.0);
        snapshot.current.net_income = Some(90.0);
        snapshot.history.revenue = vec![100.0, 110.0, 121.0];
        let ratios = RatioCalculator::new().calculate(&snapshot);

        let model = DcfModel::new();
        let outcome = model.inputs(&snapshot, &ratios, 0.09, CompanyStyle::Growth);
        let inputs = outcome.computed().unwrap();
        assert_eq!(inputs.base_fcf, 100.0);
        assert_eq!(inputs.shares, 20.0);
        assert_eq!(inputs.growth_source, GrowthSource::RevenueGrowth);
        assert!((inputs.historical_rate.unwrap() - 0.10).abs() < 1e-9);
        assert_eq!(inputs.profile, StageProfile::for_style(CompanyStyle::Growth));
    }

    #[test]
    fn test_missing_fcf() {
        let snapshot = FinancialSnapshot::new("EMPTY");
        let ratios = RatioCalculator::new().calculate(&snapshot);
        assert!(matches!(
            DcfModel::new().inputs(&snapshot, &ratios, 0.10, CompanyStyle::Blend),
            ModelOutcome::InsufficientData { .. }
        ));
    }
}
