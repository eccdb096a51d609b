use crate::analysis::cleaner::first_sustained_crossing;
use crate::constants::{STATIC_LOWER_THRESHOLD_N, STATIC_UPPER_THRESHOLD_N};
use crate::data::model::{Cycle, CycleStaticResult, SpecimenGeometry};
use crate::error::{AnalysisError, Result};

/// Static modulus of one cycle: the load step between the two standard
/// thresholds over the displacement step between their first sustained
/// crossings, normalised by the loaded area.
///
/// `cycle_no` is 1-based and only used for error reporting.
pub fn static_modulus_for_cycle(
    force: &[f64],
    displacement: &[f64],
    cycle: &Cycle,
    cycle_no: usize,
    geometry: &SpecimenGeometry,
    sustain: usize,
) -> Result<f64> {
    let range = cycle.range_within(force.len().min(displacement.len()));
    let f = &force[range.clone()];
    let d = &displacement[range];

    let crossing = |threshold_n: f64| {
        first_sustained_crossing(f, threshold_n, sustain)
            .ok_or(AnalysisError::ThresholdNotFound {
                cycle: cycle_no,
                threshold_n,
            })
    };
    let lower = crossing(STATIC_LOWER_THRESHOLD_N)?;
    let upper = crossing(STATIC_UPPER_THRESHOLD_N)?;

    let modulus = (STATIC_UPPER_THRESHOLD_N - STATIC_LOWER_THRESHOLD_N)
        / ((d[upper] - d[lower]) * geometry.area());
    if !modulus.is_finite() {
        return Err(AnalysisError::Data(format!(
            "cycle {cycle_no}: displacement did not change between load thresholds"
        )));
    }
    Ok(modulus)
}

/// Static modulus of every cycle, in cycle order. A cycle whose thresholds
/// are never crossed is reported as missing and the rest still run.
pub fn static_moduli(
    force: &[f64],
    displacement: &[f64],
    cycles: &[Cycle],
    geometry: &SpecimenGeometry,
    sustain: usize,
) -> Vec<CycleStaticResult> {
    cycles
        .iter()
        .enumerate()
        .map(|(i, cycle)| {
            let cycle_no = i + 1;
            let result =
                static_modulus_for_cycle(force, displacement, cycle, cycle_no, geometry, sustain);
            let modulus = match result {
                Ok(value) => {
                    log::info!("cycle {cycle_no}: static modulus {value:.4} N/mm³");
                    Some(value)
                }
                Err(err) => {
                    log::warn!("{err}");
                    None
                }
            };
            CycleStaticResult {
                cycle: cycle_no,
                modulus,
            }
        })
        .collect()
}

/// Mean over the cycles that produced a value; missing cycles are excluded.
pub fn mean_static_modulus(results: &[CycleStaticResult]) -> Option<f64> {
    let values: Vec<f64> = results.iter().filter_map(|r| r.modulus).collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn specimen() -> SpecimenGeometry {
        SpecimenGeometry::Rectangular {
            width: 100.0,
            length: 100.0,
            height: 28.0,
        }
    }

    /// Two triangular cycles in 100 N steps; displacement = force / 5000.
    fn two_cycles(peak_a: f64, peak_b: f64) -> (Vec<f64>, Vec<f64>, Vec<Cycle>) {
        let mut force = Vec::new();
        let mut cycles = Vec::new();
        for peak in [peak_a, peak_b] {
            let start = force.len();
            let steps = (peak / 100.0) as usize;
            force.extend((0..=steps).map(|k| k as f64 * 100.0));
            let top = force.len() - 1;
            force.extend((0..steps).rev().map(|k| k as f64 * 100.0));
            cycles.push(Cycle {
                start,
                end: force.len(),
                peak: top,
            });
        }
        let disp = force.iter().map(|f| f / 5000.0).collect();
        (force, disp, cycles)
    }

    #[test]
    fn secant_between_standard_thresholds() {
        let (force, disp, cycles) = two_cycles(10_000.0, 10_000.0);
        let value = static_modulus_for_cycle(&force, &disp, &cycles[0], 1, &specimen(), 5).unwrap();
        // Crossings at 700 N and 8800 N → Δd = 8100 / 5000 mm.
        assert_relative_eq!(value, 8125.0 / (1.62 * 10_000.0), max_relative = 1e-9);
    }

    #[test]
    fn cycle_below_upper_threshold_is_missing() {
        let (force, disp, cycles) = two_cycles(10_000.0, 8000.0);
        let results = static_moduli(&force, &disp, &cycles, &specimen(), 5);

        assert_eq!(results.len(), 2);
        assert!(results[0].modulus.is_some());
        assert_eq!(results[1], CycleStaticResult {
            cycle: 2,
            modulus: None,
        });

        let err =
            static_modulus_for_cycle(&force, &disp, &cycles[1], 2, &specimen(), 5).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::ThresholdNotFound {
                cycle: 2,
                threshold_n: STATIC_UPPER_THRESHOLD_N,
            }
        );
    }

    #[test]
    fn cycle_past_series_end_reports_missing_threshold() {
        let force = [0.0, 700.0, 800.0, 900.0, 1000.0];
        let disp = [0.0; 5];
        let cycle = Cycle {
            start: 7,
            end: 9,
            peak: 8,
        };
        let err = static_modulus_for_cycle(&force, &disp, &cycle, 4, &specimen(), 5).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::ThresholdNotFound {
                cycle: 4,
                threshold_n: STATIC_LOWER_THRESHOLD_N,
            }
        );
    }

    #[test]
    fn mean_skips_missing_cycles() {
        let results = [
            CycleStaticResult {
                cycle: 1,
                modulus: Some(2.0),
            },
            CycleStaticResult {
                cycle: 2,
                modulus: None,
            },
            CycleStaticResult {
                cycle: 3,
                modulus: Some(4.0),
            },
        ];
        assert_eq!(mean_static_modulus(&results), Some(3.0));
        assert_eq!(mean_static_modulus(&results[1..2]), None);
    }
}
