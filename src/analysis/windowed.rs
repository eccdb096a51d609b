//! Windowed secant modulus over one representative loading cycle.
//!
//! The chosen cycle is cut into fixed-width, non-overlapping windows. Each
//! window contributes a two-point secant between its first and last sample:
//! mean stress, secant modulus and mean strain. The sequence of operations
//! applied afterwards (re-zero, drop warm-up, keep second half, re-zero,
//! scale) is part of the test method and must not be reordered.

use crate::constants::{
    FALLBACK_CYCLE_INDEX, FALLBACK_SAMPLE_RATE, MIN_LOADING_PEAKS, PREFERRED_CYCLE_INDEX,
    WARMUP_WINDOWS, WINDOW_SECONDS,
};
use crate::data::model::{SpecimenGeometry, WindowedModulus};
use crate::error::{AnalysisError, Result};

/// Internal MPa / fractional-strain values → reporting units.
const MODULUS_SCALE: f64 = 1e6;
const STRESS_SCALE: f64 = 1e6;
const STRAIN_TO_PERCENT: f64 = 100.0;

/// Inclusive sample range `[start, end]` of the reference cycle.
///
/// Peak 3 is used when at least four peaks exist, peak 2 when exactly three
/// do. The cycle runs from just after the previous peak up to the chosen one.
pub fn select_reference_cycle(upper_peaks: &[usize]) -> Result<(usize, usize)> {
    let idx = match upper_peaks.len() {
        n if n > PREFERRED_CYCLE_INDEX => PREFERRED_CYCLE_INDEX,
        n if n >= MIN_LOADING_PEAKS => FALLBACK_CYCLE_INDEX,
        n => {
            return Err(AnalysisError::InsufficientCycles {
                found: n,
                required: MIN_LOADING_PEAKS,
            })
        }
    };

    let end = upper_peaks[idx];
    let cycle_length = end.saturating_sub(upper_peaks[idx - 1]);
    let start = end + 1 - cycle_length;
    Ok((start, end))
}

/// Window width in samples: `ceil(2 s · sample rate)`.
pub fn window_width(sample_count: usize, elapsed: f64) -> usize {
    let sample_rate = if elapsed > 0.0 {
        sample_count as f64 / elapsed
    } else {
        FALLBACK_SAMPLE_RATE
    };
    ((sample_rate * WINDOW_SECONDS).ceil() as usize).max(1)
}

/// Raw per-window values in internal units (MPa-scaled by 1e-6, fractional strain).
fn secant_windows(
    force: &[f64],
    displacement: &[f64],
    window: usize,
    geometry: &SpecimenGeometry,
) -> WindowedModulus {
    let area = geometry.area();
    let height = geometry.height();
    let len = force.len().min(displacement.len());
    let n = len / window;

    let mut out = WindowedModulus {
        stress: vec![0.0; n],
        modulus: vec![0.0; n],
        strain_pct: vec![0.0; n],
    };

    for i in 0..n {
        let idx1 = i * window;
        let idx2 = ((i + 1) * window - 1).min(len - 1);

        out.stress[i] = (force[idx1] + force[idx2]) / 2.0 / area * 1e-6;

        let delta_f = force[idx2] - force[idx1];
        let delta_s = displacement[idx2] - displacement[idx1];
        if delta_s != 0.0 {
            out.modulus[i] = (delta_f / area * 1e-6) / (delta_s / height);
        }

        out.strain_pct[i] = (displacement[idx1] + displacement[idx2]) / 2.0 / height;
    }
    out
}

/// Baseline, warm-up drop, half-select, re-zero and unit scaling.
fn finalize(raw: WindowedModulus) -> WindowedModulus {
    let WindowedModulus {
        mut stress,
        modulus,
        strain_pct,
    } = raw;

    if let Some(&first) = stress.first() {
        for p in &mut stress {
            *p -= first;
        }
    }

    let skip = WARMUP_WINDOWS.min(stress.len());
    let remaining = stress.len() - skip;
    let keep_from = skip + remaining / 2;

    let mut stress = stress[keep_from..].to_vec();
    let mut modulus = modulus[keep_from..].to_vec();
    let mut strain = strain_pct[keep_from..].to_vec();

    if let Some(&first) = strain.first() {
        for e in &mut strain {
            *e -= first;
        }
    }
    let min_stress = stress.iter().copied().fold(f64::INFINITY, f64::min);
    if min_stress.is_finite() {
        for p in &mut stress {
            *p -= min_stress;
        }
    }

    for e in &mut modulus {
        *e *= MODULUS_SCALE;
    }
    for e in &mut strain {
        *e *= STRAIN_TO_PERCENT;
    }
    for p in &mut stress {
        *p *= STRESS_SCALE;
    }

    WindowedModulus {
        stress,
        modulus,
        strain_pct: strain,
    }
}

/// Stress–modulus–strain curve of the reference cycle.
///
/// `force`/`displacement` are the cleaned channels, `upper_peaks` the loading
/// maxima and `window` the width from [`window_width`].
pub fn windowed_secant_modulus(
    force: &[f64],
    displacement: &[f64],
    upper_peaks: &[usize],
    window: usize,
    geometry: &SpecimenGeometry,
) -> Result<WindowedModulus> {
    geometry.validate()?;
    let (start, end) = select_reference_cycle(upper_peaks)?;

    let len = force.len().min(displacement.len());
    if end >= len {
        return Err(AnalysisError::Data(format!(
            "reference peak {end} lies outside the {len}-sample series"
        )));
    }

    let window = window.max(1);
    let raw = secant_windows(&force[start..=end], &displacement[start..=end], window, geometry);
    log::debug!(
        "reference cycle {start}..={end}: {} windows of {window} samples",
        raw.len()
    );

    let result = finalize(raw);
    if result.is_empty() {
        return Err(AnalysisError::Data(format!(
            "reference cycle of {} samples is too short for {window}-sample windows",
            end + 1 - start
        )));
    }
    Ok(result)
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

    /// Sawtooth with period 100: a clean linear ramp between peaks.
    fn sawtooth(len: usize) -> (Vec<f64>, Vec<f64>) {
        let disp: Vec<f64> = (0..len).map(|i| (i % 100) as f64 * 0.01).collect();
        let force = disp.iter().map(|d| d * 5000.0).collect();
        (force, disp)
    }

    #[test]
    fn cycle_selection_follows_peak_count() {
        assert_eq!(select_reference_cycle(&[99, 199, 299, 399]).unwrap(), (300, 399));
        assert_eq!(select_reference_cycle(&[10, 50, 80]).unwrap(), (51, 80));
        assert_eq!(
            select_reference_cycle(&[10, 50]),
            Err(AnalysisError::InsufficientCycles {
                found: 2,
                required: 3,
            })
        );
    }

    #[test]
    fn window_width_from_sample_rate() {
        assert_eq!(window_width(100, 20.0), 10);
        assert_eq!(window_width(100, 0.0), 20);
        assert_eq!(window_width(101, 20.0), 11);
    }

    #[test]
    fn linear_ramp_gives_constant_modulus() {
        let (force, disp) = sawtooth(450);
        let result =
            windowed_secant_modulus(&force, &disp, &[99, 199, 299, 399], 10, &specimen()).unwrap();

        // 10 windows, 3 dropped, second half of the remaining 7 → 4 kept.
        assert_eq!(result.len(), 4);
        for e in &result.modulus {
            assert_relative_eq!(*e, 14.0, max_relative = 1e-9);
        }
        assert!(result.stress.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(result.stress[0], 0.0);
        assert_eq!(result.strain_pct[0], 0.0);
        assert_relative_eq!(result.stress[3], 0.15, max_relative = 1e-9);
        assert_relative_eq!(result.strain_pct[3], 0.3 / 28.0 * 100.0, max_relative = 1e-9);
    }

    #[test]
    fn zero_displacement_step_gives_zero_modulus() {
        let raw = secant_windows(&[0.0, 10.0, 20.0, 30.0], &[1.0, 1.0, 1.0, 1.0], 2, &specimen());
        assert_eq!(raw.modulus, vec![0.0, 0.0]);
    }

    #[test]
    fn trailing_partial_window_is_discarded() {
        let raw = secant_windows(&[0.0; 25], &[0.0; 25], 10, &specimen());
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn too_few_windows_is_a_data_error() {
        let (force, disp) = sawtooth(450);
        let err = windowed_secant_modulus(&force, &disp, &[99, 199, 299, 399], 40, &specimen());
        assert!(matches!(err, Err(AnalysisError::Data(_))));
    }

    #[test]
    fn two_peaks_is_insufficient() {
        let (force, disp) = sawtooth(250);
        let err = windowed_secant_modulus(&force, &disp, &[99, 199], 10, &specimen()).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientCycles { found: 2, .. }));
    }
}
