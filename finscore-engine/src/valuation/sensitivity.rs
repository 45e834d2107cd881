//! DCF sensitivity over WACC and stage-1 growth shifts.

use statrs::statistics::{Data, Median, Statistics};

use super::dcf::{DcfInputs, DcfModel};
use super::types::{SensitivityMatrix, SensitivityStatistics};

/// WACC shifts, rows of the matrix.
pub const WACC_DELTAS: [f64; 5] = [-0.02, -0.01, 0.0, 0.01, 0.02];

/// Historical growth shifts, columns of the matrix.
pub const GROWTH_DELTAS: [f64; 5] = [-0.05, -0.025, 0.0, 0.025, 0.05];

/// Re-run the DCF on a grid of shifted inputs.
///
/// Every cell passes through the same terminal-growth clamp as the base
/// case; a cell is absent only when its DCF cannot be computed.
pub fn sensitivity_matrix(
    model: &DcfModel,
    base: &DcfInputs,
    price: Option<f64>,
) -> SensitivityMatrix {
    let values: Vec<Vec<Option<f64>>> = WACC_DELTAS
        .iter()
        .map(|&dw| {
            GROWTH_DELTAS
                .iter()
                .map(|&dg| {
                    let shifted = base.shifted(dw, dg, model.default_growth());
                    model
                        .run(&shifted)
                        .computed()
                        .map(|result| result.fair_value_per_share)
                })
                .collect()
        })
        .collect();

    let statistics = summarize(&values, price);

    SensitivityMatrix {
        wacc_deltas: WACC_DELTAS.to_vec(),
        growth_deltas: GROWTH_DELTAS.to_vec(),
        values,
        statistics,
    }
}

fn summarize(values: &[Vec<Option<f64>>], price: Option<f64>) -> Option<SensitivityStatistics> {
    let cells: Vec<f64> = values.iter().flatten().flatten().copied().collect();
    if cells.is_empty() {
        return None;
    }

    let share_undervalued = price.filter(|p| *p > 0.0).map(|p| {
        let above = cells.iter().filter(|v| **v > p).count();
        above as f64 / cells.len() as f64
    });

    let std_dev = if cells.len() > 1 {
        Statistics::std_dev(cells.iter())
    } else {
        0.0
    };

    Some(SensitivityStatistics {
        min: Statistics::min(cells.iter()),
        max: Statistics::max(cells.iter()),
        mean: Statistics::mean(cells.iter()),
        median: Data::new(cells.clone()).median(),
        std_dev,
        share_undervalued,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_shape_and_center() {
        let model = DcfModel::new();
        let base = DcfInputs::new(100.0, 10.0, 0.10, 0.08, 0.025);
        let matrix = sensitivity_matrix(&model, &base, Some(100.0));

        assert_eq!(matrix.values.len(), WACC_DELTAS.len());
        assert!(matrix.values.iter().all(|row| row.len() == GROWTH_DELTAS.len()));

        let center = matrix.values[2][2].unwrap();
        let direct = model.run(&base).computed().unwrap().fair_value_per_share;
        assert!((center - direct).abs() < 1e-9);
    }

    #[test]
    fn test_value_falls_as_wacc_rises() {
        let model = DcfModel::new();
        let base = DcfInputs::new(100.0, 10.0, 0.10, 0.08, 0.025);
        let matrix = sensitivity_matrix(&model, &base, None);

        for col in 0..GROWTH_DELTAS.len() {
            for row in 1..WACC_DELTAS.len() {
                let lower_wacc = matrix.values[row - 1][col].unwrap();
                let higher_wacc = matrix.values[row][col].unwrap();
                assert!(higher_wacc < lower_wacc);
            }
        }
        let stats = matrix.statistics.unwrap();
        assert!(stats.min <= stats.median && stats.median <= stats.max);
        assert!(stats.share_undervalued.is_none());
    }

    #[test]
    fn test_low_wacc_cells_still_respect_spread() {
        // WACC 3% shifted down to 1%: terminal growth is clamped below zero
        let model = DcfModel::new();
        let base = DcfInputs::new(100.0, 10.0, 0.03, 0.05, 0.025);
        let matrix = sensitivity_matrix(&model, &base, Some(1.0));

        for cell in matrix.values.iter().flatten().flatten() {
            assert!(cell.is_finite() && *cell > 0.0);
        }
        assert_eq!(matrix.statistics.unwrap().share_undervalued, Some(1.0));
    }
}
