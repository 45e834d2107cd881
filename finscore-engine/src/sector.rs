//! Sector resolution and built-in sector benchmarks.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Normalised sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Technology,
    Financials,
    RealEstate,
    Utilities,
    Healthcare,
    Energy,
    Materials,
    Industrials,
    ConsumerCyclical,
    ConsumerDefensive,
    Communication,
    Unknown,
}

/// Keyword → sector, checked in order. More specific phrases come first:
/// "biotechnology" is healthcare, not technology.
const SECTOR_KEYWORDS: &[(&str, Sector)] = &[
    ("real estate", Sector::RealEstate),
    ("reit", Sector::RealEstate),
    ("bank", Sector::Financials),
    ("financ", Sector::Financials),
    ("insurance", Sector::Financials),
    ("capital markets", Sector::Financials),
    ("utilit", Sector::Utilities),
    ("biotech", Sector::Healthcare),
    ("pharma", Sector::Healthcare),
    ("health", Sector::Healthcare),
    ("medical", Sector::Healthcare),
    ("software", Sector::Technology),
    ("semiconductor", Sector::Technology),
    ("tech", Sector::Technology),
    ("oil", Sector::Energy),
    ("gas", Sector::Energy),
    ("energy", Sector::Energy),
    ("material", Sector::Materials),
    ("chemical", Sector::Materials),
    ("mining", Sector::Materials),
    ("industrial", Sector::Industrials),
    ("aerospace", Sector::Industrials),
    ("consumer cyclical", Sector::ConsumerCyclical),
    ("consumer discretionary", Sector::ConsumerCyclical),
    ("retail", Sector::ConsumerCyclical),
    ("consumer defensive", Sector::ConsumerDefensive),
    ("consumer staples", Sector::ConsumerDefensive),
    ("communication", Sector::Communication),
    ("telecom", Sector::Communication),
    ("media", Sector::Communication),
];

impl Sector {
    /// Every sector, `Unknown` last.
    pub const ALL: [Sector; 12] = [
        Sector::Technology,
        Sector::Financials,
        Sector::RealEstate,
        Sector::Utilities,
        Sector::Healthcare,
        Sector::Energy,
        Sector::Materials,
        Sector::Industrials,
        Sector::ConsumerCyclical,
        Sector::ConsumerDefensive,
        Sector::Communication,
        Sector::Unknown,
    ];

    /// Resolve a provider sector string by keyword.
    pub fn from_identifier(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase().replace(['_', '-'], " ");
        SECTOR_KEYWORDS
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map_or(Sector::Unknown, |(_, sector)| *sector)
    }

    /// Resolve an optional identifier; absent maps to `Unknown`.
    pub fn resolve(raw: Option<&str>) -> Self {
        raw.map_or(Sector::Unknown, Self::from_identifier)
    }

    /// Configuration key used in `sector_adjustments`.
    pub fn key(self) -> &'static str {
        match self {
            Sector::Technology => "technology",
            Sector::Financials => "financials",
            Sector::RealEstate => "real_estate",
            Sector::Utilities => "utilities",
            Sector::Healthcare => "healthcare",
            Sector::Energy => "energy",
            Sector::Materials => "materials",
            Sector::Industrials => "industrials",
            Sector::ConsumerCyclical => "consumer_cyclical",
            Sector::ConsumerDefensive => "consumer_defensive",
            Sector::Communication => "communication",
            Sector::Unknown => "unknown",
        }
    }

    /// Built-in benchmarks for this sector.
    pub fn benchmarks(self) -> &'static SectorBenchmarks {
        SECTOR_BENCHMARKS
            .get(&self)
            .unwrap_or(&DEFAULT_BENCHMARKS)
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Typical sector levels used when the snapshot carries no benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectorBenchmarks {
    /// Median trailing P/E
    pub pe: f64,
    /// Median EV/EBITDA
    pub ev_ebitda: f64,
    /// Default equity beta
    pub beta: f64,
    /// D/E considered high for the sector
    pub debt_equity_high: f64,
}

const DEFAULT_BENCHMARKS: SectorBenchmarks = SectorBenchmarks {
    pe: 20.0,
    ev_ebitda: 12.0,
    beta: 1.0,
    debt_equity_high: 1.0,
};

static SECTOR_BENCHMARKS: Lazy<BTreeMap<Sector, SectorBenchmarks>> = Lazy::new(|| {
    let table = [
        (Sector::Technology, 28.0, 18.0, 1.20, 0.5),
        (Sector::Financials, 13.0, 10.0, 1.10, 10.0),
        (Sector::RealEstate, 35.0, 18.0, 0.85, 2.0),
        (Sector::Utilities, 18.0, 11.0, 0.55, 1.5),
        (Sector::Healthcare, 24.0, 15.0, 0.90, 0.8),
        (Sector::Energy, 12.0, 6.0, 1.25, 0.8),
        (Sector::Materials, 15.0, 9.0, 1.10, 0.8),
        (Sector::Industrials, 20.0, 12.0, 1.05, 1.0),
        (Sector::ConsumerCyclical, 20.0, 12.0, 1.15, 1.2),
        (Sector::ConsumerDefensive, 21.0, 14.0, 0.65, 1.2),
        (Sector::Communication, 18.0, 9.0, 1.00, 1.2),
    ];
    table
        .into_iter()
        .map(|(sector, pe, ev_ebitda, beta, debt_equity_high)| {
            (
                sector,
                SectorBenchmarks {
                    pe,
                    ev_ebitda,
                    beta,
                    debt_equity_high,
                },
            )
        })
        .collect()
});
