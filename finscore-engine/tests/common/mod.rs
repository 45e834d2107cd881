//! Shared snapshot fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;

use finscore_engine::{FinancialSnapshot, History, MarketData, PeriodFinancials};

/// Profitable mid-cap industrial with two complete periods and five years of history.
pub fn industrial_snapshot(symbol: &str) -> FinancialSnapshot {
    FinancialSnapshot {
        symbol: symbol.to_string(),
        sector: Some("Industrials".into()),
        current: PeriodFinancials {
            period_end: NaiveDate::from_ymd_opt(2024, 12, 31),
            total_assets: Some(1000.0),
            total_liabilities: Some(600.0),
            total_equity: Some(400.0),
            current_assets: Some(300.0),
            current_liabilities: Some(150.0),
            inventory: Some(60.0),
            receivables: Some(100.0),
            cash: Some(50.0),
            total_debt: Some(200.0),
            long_term_debt: Some(180.0),
            retained_earnings: Some(300.0),
            shares_outstanding: Some(100.0),
            revenue: Some(800.0),
            gross_profit: Some(320.0),
            operating_income: Some(120.0),
            net_income: Some(80.0),
            interest_expense: Some(12.0),
            depreciation: Some(30.0),
            tax_rate: Some(0.25),
            operating_cash_flow: Some(110.0),
            capital_expenditure: Some(-40.0),
            dividends_paid: Some(-20.0),
            ..Default::default()
        },
        prior: PeriodFinancials {
            period_end: NaiveDate::from_ymd_opt(2023, 12, 31),
            total_assets: Some(950.0),
            total_liabilities: Some(590.0),
            total_equity: Some(360.0),
            current_assets: Some(270.0),
            current_liabilities: Some(150.0),
            long_term_debt: Some(190.0),
            shares_outstanding: Some(100.0),
            revenue: Some(727.0),
            gross_profit: Some(280.0),
            operating_income: Some(100.0),
            net_income: Some(70.0),
            operating_cash_flow: Some(95.0),
            capital_expenditure: Some(-35.0),
            ..Default::default()
        },
        market: MarketData {
            price: Some(16.0),
            market_cap: Some(1600.0),
            beta: Some(1.1),
            dividend_per_share: Some(0.2),
            ..Default::default()
        },
        history: History {
            revenue: vec![600.0, 661.0, 727.0, 800.0],
            eps: vec![0.55, 0.62, 0.70, 0.80],
            free_cash_flow: vec![48.0, 53.0, 60.0, 70.0],
            operating_margin: vec![0.13, 0.135, 0.14, 0.15],
            dividends_per_share: vec![0.15, 0.17, 0.18, 0.2],
        },
    }
}

/// The same company reported under another sector label.
pub fn with_sector(mut snapshot: FinancialSnapshot, sector: &str) -> FinancialSnapshot {
    snapshot.sector = Some(sector.to_string());
    snapshot
}
