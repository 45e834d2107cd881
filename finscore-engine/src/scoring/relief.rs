//! Growth relief for P/E penalties.
//!
//! A P/E above the sector benchmark is not always expensive: when earnings
//! growth pays for the multiple (low PEG) or the fundamentals justify it, the
//! penalty is cut. Relief only ever shrinks a negative P/E contribution and
//! is logged as a note on the adjustment like any other weighting.

use crate::ratios::{RatioKey, RatioSet};

use super::rules::RuleHit;
use super::sector_adjust::Weighting;
use super::types::Metric;

/// PEG ceiling → remaining share of the P/E penalty, first match wins.
pub const PEG_RELIEF: &[(f64, f64)] = &[(1.0, 0.0), (1.5, 0.3)];

/// P/E up to this multiple of the justified P/E counts as supported.
pub const JUSTIFIED_PE_TOLERANCE: f64 = 1.3;
pub const JUSTIFIED_PE_RELIEF: f64 = 0.4;

/// Relief weight for one rule hit; neutral unless it is a P/E penalty.
pub fn pe_relief(hit: &RuleHit, ratios: &RatioSet, justified_pe: Option<f64>) -> Weighting {
    if hit.metric != Metric::PriceToEarnings || hit.raw_points >= 0 {
        return Weighting::neutral();
    }

    if let Some(peg) = ratios.get(RatioKey::Peg).filter(|p| *p > 0.0) {
        if let Some((ceiling, weight)) = PEG_RELIEF.iter().find(|(ceiling, _)| peg < *ceiling) {
            return Weighting {
                weight: *weight,
                notes: vec![format!(
                    "P/E penalty cut to {:.0}%: PEG {:.2} below {:.1}",
                    weight * 100.0,
                    peg,
                    ceiling
                )],
            };
        }
    }

    let pe = hit.value;
    if let Some((pe, justified)) = pe.zip(justified_pe) {
        if pe <= justified * JUSTIFIED_PE_TOLERANCE {
            return Weighting {
                weight: JUSTIFIED_PE_RELIEF,
                notes: vec![format!(
                    "P/E penalty cut to {:.0}%: P/E {:.1} within {:.0}% of justified P/E {:.1}",
                    JUSTIFIED_PE_RELIEF * 100.0,
                    pe,
                    (JUSTIFIED_PE_TOLERANCE - 1.0) * 100.0,
                    justified
                )],
            };
        }
    }

    Weighting::neutral()
}
