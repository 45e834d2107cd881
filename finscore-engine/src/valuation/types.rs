//! Valuation types.

use serde::{Deserialize, Serialize};

/// How the discount rate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaccMethod {
    /// Cost of equity and cost of debt weighted by capital structure
    Capm,
    /// Negligible debt, WACC equals cost of equity
    EquityOnly,
    /// Capital structure unknown, configured flat rate
    FlatRate,
}

/// Where an input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    Reported,
    SectorDefault,
    Estimated,
}

/// Weighted average cost of capital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaccResult {
    pub wacc: f64,
    pub method: WaccMethod,
    pub cost_of_equity: f64,
    pub beta: f64,
    pub beta_source: InputSource,
    /// Pre-tax cost of debt
    pub cost_of_debt: Option<f64>,
    pub cost_of_debt_source: Option<InputSource>,
    pub tax_rate: f64,
    pub equity_weight: f64,
    pub debt_weight: f64,
    /// True when the raw estimate fell outside the configured bounds
    pub clamped: bool,
}

/// Historical series the stage-1 rate was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthSource {
    FcfGrowth,
    EpsGrowth,
    RevenueGrowth,
    Default,
}

/// Stage shape picked from the company style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageProfile {
    /// Multiplier on the historical rate for stage 1
    pub stage1_haircut: f64,
    /// Position of the stage-2 rate between terminal (0) and stage-1 (1)
    pub stage2_fraction: f64,
}

/// Growth assumptions behind a DCF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthAssumptions {
    pub source: GrowthSource,
    /// Raw historical rate before haircut and banding
    pub historical_rate: Option<f64>,
    pub stage1_rate: f64,
    pub stage2_rate: f64,
    pub terminal_rate: f64,
    pub requested_terminal_rate: f64,
    /// True when the terminal rate was lowered to keep the WACC spread
    pub terminal_clamped: bool,
    pub profile: StageProfile,
}

/// One projected year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCashFlow {
    pub year: u32,
    /// 1 or 2
    pub stage: u8,
    pub growth_rate: f64,
    pub fcf: f64,
    pub discount_factor: f64,
    pub present_value: f64,
}

/// Multi-stage DCF result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfResult {
    pub wacc: f64,
    pub base_fcf: f64,
    pub shares: f64,
    pub growth: GrowthAssumptions,
    pub projections: Vec<ProjectedCashFlow>,
    pub sum_pv_fcf: f64,
    pub terminal_value: f64,
    pub pv_terminal_value: f64,
    pub enterprise_value: f64,
    pub fair_value_per_share: f64,
    /// Share of the enterprise value coming from the terminal value
    pub terminal_value_share: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Graham Number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrahamResult {
    pub eps: f64,
    pub book_value_per_share: f64,
    pub graham_number: f64,
}

/// P/E the fundamentals support: `(1 + g) / (r − g)` with a quality factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JustifiedPe {
    pub multiple: f64,
    /// Growth used after clamping below the required return
    pub growth: f64,
    pub growth_source: JustifiedGrowthSource,
    pub required_return: f64,
    /// ROE premium or discount applied to the base multiple
    pub quality_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JustifiedGrowthSource {
    EpsGrowth,
    RevenueGrowth,
}

/// Margin of safety of each intrinsic value against the current price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarginsOfSafety {
    pub dcf: Option<f64>,
    pub graham: Option<f64>,
}

/// Fair value over WACC × stage-1 growth shifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityMatrix {
    pub wacc_deltas: Vec<f64>,
    pub growth_deltas: Vec<f64>,
    /// `values[i][j]` is the fair value at `wacc_deltas[i]`, `growth_deltas[j]`
    pub values: Vec<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<SensitivityStatistics>,
}

/// Summary of the computed cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// Share of scenarios whose fair value exceeds the price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_undervalued: Option<f64>,
}
