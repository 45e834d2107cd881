//! Ratio set types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::safe_math::{format_ratio, RatioFormat};
use crate::scoring::Category;

/// Name of a derived ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioKey {
    // Profitability
    ReturnOnEquity,
    ReturnOnAssets,
    ReturnOnInvestedCapital,
    GrossMargin,
    OperatingMargin,
    NetMargin,
    Ebitda,
    EbitdaMargin,
    // Per share and valuation
    EarningsPerShare,
    BookValuePerShare,
    FcfPerShare,
    PriceToEarnings,
    ForwardPriceToEarnings,
    PriceToBook,
    PriceToSales,
    PriceToFcf,
    MarketCap,
    EnterpriseValue,
    EvToEbitda,
    EvToRevenue,
    EvToFcf,
    Peg,
    FcfYield,
    DividendYield,
    PayoutRatio,
    EarningsYield,
    // Liquidity
    CurrentRatio,
    QuickRatio,
    CashRatio,
    WorkingCapital,
    // Solvency
    DebtToEquity,
    DebtToAssets,
    NetDebt,
    NetDebtToEbitda,
    InterestCoverage,
    EquityMultiplier,
    // Efficiency
    AssetTurnover,
    InventoryTurnover,
    DaysSalesOutstanding,
    // Cash flow
    FreeCashFlow,
    FcfConversion,
    // Growth
    RevenueGrowth,
    EpsGrowth,
    FcfGrowth,
    OperatingMarginTrend,
    // REIT
    Ffo,
    FfoPerShare,
    PriceToFfo,
    FfoPayout,
    Affo,
    PriceToAffo,
}

impl RatioKey {
    /// Display format of the ratio.
    pub fn format(self) -> RatioFormat {
        use RatioKey::*;
        match self {
            ReturnOnEquity | ReturnOnAssets | ReturnOnInvestedCapital | GrossMargin
            | OperatingMargin | NetMargin | EbitdaMargin | FcfYield | DividendYield
            | PayoutRatio | EarningsYield | DebtToAssets | RevenueGrowth | EpsGrowth
            | FcfGrowth | OperatingMarginTrend | FfoPayout => RatioFormat::Percent,
            PriceToEarnings | ForwardPriceToEarnings | PriceToBook | PriceToSales | PriceToFcf
            | EvToEbitda | EvToRevenue | EvToFcf | NetDebtToEbitda | InterestCoverage
            | PriceToFfo | PriceToAffo => RatioFormat::Multiple,
            Ebitda | EarningsPerShare | BookValuePerShare | FcfPerShare | MarketCap
            | EnterpriseValue | WorkingCapital | NetDebt | FreeCashFlow | Ffo | FfoPerShare
            | Affo => RatioFormat::Currency,
            Peg | CurrentRatio | QuickRatio | CashRatio | DebtToEquity | EquityMultiplier
            | AssetTurnover | InventoryTurnover | DaysSalesOutstanding | FcfConversion => {
                RatioFormat::Decimal
            }
        }
    }

    /// Scoring category a missing value of this ratio is reported under.
    pub fn category(self) -> Category {
        use RatioKey::*;
        match self {
            ReturnOnEquity | ReturnOnAssets | ReturnOnInvestedCapital | GrossMargin
            | OperatingMargin | NetMargin | Ebitda | EbitdaMargin => Category::Profitability,
            EarningsPerShare | BookValuePerShare | FcfPerShare | PriceToEarnings
            | ForwardPriceToEarnings | PriceToBook | PriceToSales | PriceToFcf | MarketCap
            | EnterpriseValue | EvToEbitda | EvToRevenue | EvToFcf | Peg | FcfYield
            | DividendYield | PayoutRatio | EarningsYield | Ffo | FfoPerShare | PriceToFfo
            | Affo | PriceToAffo => Category::Valuation,
            CurrentRatio | QuickRatio | CashRatio | WorkingCapital | DebtToEquity
            | DebtToAssets | NetDebt | NetDebtToEbitda | InterestCoverage | EquityMultiplier => {
                Category::Solidity
            }
            AssetTurnover | InventoryTurnover | DaysSalesOutstanding | FreeCashFlow
            | FcfConversion | FfoPayout => Category::EarningsQuality,
            RevenueGrowth | EpsGrowth | FcfGrowth | OperatingMarginTrend => Category::Growth,
        }
    }
}

impl fmt::Display for RatioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // serde name, e.g. "return_on_equity"
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(name)) => f.write_str(&name),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// One ratio and the inputs it was computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioEntry {
    pub value: Option<f64>,
    /// Input name → value used (absent inputs included)
    pub basis: BTreeMap<String, Option<f64>>,
}

impl RatioEntry {
    /// Names of the basis inputs that were absent.
    pub fn missing_inputs(&self) -> Vec<String> {
        self.basis
            .iter()
            .filter(|(_, input)| input.is_none())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// All ratios derived from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioSet {
    entries: BTreeMap<RatioKey, RatioEntry>,
}

impl RatioSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a ratio with its basis.
    pub fn insert(&mut self, key: RatioKey, value: Option<f64>, basis: &[(&str, Option<f64>)]) {
        let entry = RatioEntry {
            value: value.filter(|v| v.is_finite()),
            basis: basis
                .iter()
                .map(|(name, input)| (name.to_string(), *input))
                .collect(),
        };
        self.entries.insert(key, entry);
    }

    /// Value of a ratio; `None` when absent or never computed.
    pub fn get(&self, key: RatioKey) -> Option<f64> {
        self.entries.get(&key).and_then(|e| e.value)
    }

    pub fn entry(&self, key: RatioKey) -> Option<&RatioEntry> {
        self.entries.get(&key)
    }

    /// Formatted value, "N/A" when absent.
    pub fn display(&self, key: RatioKey) -> String {
        format_ratio(self.get(key), key.format())
    }

    /// Iterate over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&RatioKey, &RatioEntry)> {
        self.entries.iter()
    }

    /// Ratios left without a value because an input was absent, with the
    /// names of those inputs. Ratios that are absent for other reasons
    /// (negative earnings under a multiple, division by zero) are skipped.
    pub fn unavailable(&self) -> impl Iterator<Item = (RatioKey, Vec<String>)> + '_ {
        self.entries.iter().filter_map(|(key, entry)| {
            if entry.value.is_some() {
                return None;
            }
            let missing = entry.missing_inputs();
            (!missing.is_empty()).then_some((*key, missing))
        })
    }

    /// Number of ratios with a value.
    pub fn available(&self) -> usize {
        self.entries.values().filter(|e| e.value.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
