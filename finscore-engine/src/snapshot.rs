//! Input snapshot of one company.
//!
//! Every numeric field is optional: the data layer fills what it has and the
//! engine treats a missing value as *absent*, never as zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Immutable financial snapshot handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    /// Ticker symbol
    pub symbol: String,
    /// Raw sector identifier from the data provider ("Technology", "Banks—Regional", ...)
    #[serde(default)]
    pub sector: Option<String>,
    /// Most recent fiscal period
    #[serde(default)]
    pub current: PeriodFinancials,
    /// Fiscal period one year before `current`
    #[serde(default)]
    pub prior: PeriodFinancials,
    /// Market quote and benchmarks
    #[serde(default)]
    pub market: MarketData,
    /// Multi-year series used for growth rates
    #[serde(default)]
    pub history: History,
}

/// Balance sheet, income statement and cash flow items for one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodFinancials {
    /// Period end date
    pub period_end: Option<NaiveDate>,

    // Balance sheet
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub total_equity: Option<f64>,
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub inventory: Option<f64>,
    pub receivables: Option<f64>,
    pub cash: Option<f64>,
    pub total_debt: Option<f64>,
    pub long_term_debt: Option<f64>,
    pub retained_earnings: Option<f64>,
    pub shares_outstanding: Option<f64>,

    // Income statement
    pub revenue: Option<f64>,
    pub cost_of_revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    /// Operating income, used as EBIT
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
    pub interest_expense: Option<f64>,
    pub depreciation: Option<f64>,
    pub amortization: Option<f64>,
    /// Effective tax rate as a fraction
    pub tax_rate: Option<f64>,
    /// Gains on property sales (REIT FFO adjustment)
    pub gains_on_sale: Option<f64>,

    // Cash flow
    pub operating_cash_flow: Option<f64>,
    /// Capital expenditure, either sign accepted
    pub capital_expenditure: Option<f64>,
    /// Dividends paid, either sign accepted
    pub dividends_paid: Option<f64>,
}

impl PeriodFinancials {
    /// Gross profit, derived from revenue and cost of revenue when not reported.
    pub fn gross_profit(&self) -> Option<f64> {
        self.gross_profit
            .or_else(|| Some(self.revenue? - self.cost_of_revenue?))
    }

    /// Working capital = current assets − current liabilities.
    pub fn working_capital(&self) -> Option<f64> {
        Some(self.current_assets? - self.current_liabilities?)
    }

    /// Free cash flow = operating cash flow − |capex|.
    pub fn free_cash_flow(&self) -> Option<f64> {
        Some(self.operating_cash_flow? - self.capital_expenditure?.abs())
    }

    /// Debt, falling back to long-term debt alone.
    pub fn debt(&self) -> Option<f64> {
        self.total_debt.or(self.long_term_debt)
    }

    /// Total liabilities, derived from assets − equity when not reported.
    pub fn liabilities(&self) -> Option<f64> {
        self.total_liabilities
            .or_else(|| Some(self.total_assets? - self.total_equity?))
    }
}

/// Market quote and optional sector benchmarks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketData {
    pub price: Option<f64>,
    /// Market capitalisation; derived from price × shares when absent
    pub market_cap: Option<f64>,
    pub beta: Option<f64>,
    pub forward_eps: Option<f64>,
    pub dividend_per_share: Option<f64>,
    /// Sector median P/E supplied by the data layer, overrides the built-in benchmark
    pub sector_pe: Option<f64>,
    /// Sector median EV/EBITDA supplied by the data layer
    pub sector_ev_ebitda: Option<f64>,
}

/// Annual series, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct History {
    pub revenue: Vec<f64>,
    pub eps: Vec<f64>,
    pub free_cash_flow: Vec<f64>,
    /// Operating margin as a fraction
    pub operating_margin: Vec<f64>,
    pub dividends_per_share: Vec<f64>,
}

impl History {
    /// Number of trailing years with a positive dividend.
    pub fn consecutive_dividend_years(&self) -> usize {
        self.dividends_per_share
            .iter()
            .rev()
            .take_while(|d| **d > 0.0)
            .count()
    }
}

impl FinancialSnapshot {
    /// Create an empty snapshot for a symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Shares outstanding for the current period.
    pub fn shares(&self) -> Option<f64> {
        self.current.shares_outstanding
    }

    /// Market cap, reported or price × shares.
    pub fn market_cap(&self) -> Option<f64> {
        self.market
            .market_cap
            .or_else(|| Some(self.market.price? * self.shares()?))
            .filter(|v| v.is_finite())
    }

    /// Description of a period ordering problem, if any.
    pub fn period_order_issue(&self) -> Option<String> {
        match (self.prior.period_end, self.current.period_end) {
            (Some(prior), Some(current)) if prior >= current => Some(format!(
                "prior period end {} is not before current period end {}",
                prior, current
            )),
            _ => None,
        }
    }
}
