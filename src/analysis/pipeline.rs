use crate::analysis::cleaner::{remove_spikes, truncate_before_load};
use crate::analysis::continuous::{continuous_modulus, strain_percent_curve};
use crate::analysis::cycles::{build_cycles, detect_peaks, find_loading_cycle_starts};
use crate::analysis::hysteresis::cycle_loop_areas;
use crate::analysis::static_modulus::{mean_static_modulus, static_moduli};
use crate::analysis::stress_strain::compute_stress_strain;
use crate::analysis::windowed::{window_width, windowed_secant_modulus};
use crate::config::AnalysisConfig;
use crate::constants::{MIN_LOADING_PEAKS, STRAIN_REPORT_LEVELS};
use crate::data::model::{
    CleanedSeries, Cycle, CyclePeaks, CycleStaticResult, ModulusCurve, Recording,
    SpecimenGeometry, StressStrainSeries, WindowPoint, WindowedModulus,
};
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Results that need at least [`MIN_LOADING_PEAKS`] detected cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleStages {
    /// Stress–modulus–strain curve of the reference cycle.
    pub windowed: Result<WindowedModulus>,
    /// One static modulus per detected cycle.
    pub static_moduli: Vec<CycleStaticResult>,
}

/// Everything computed for one recording.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub geometry: SpecimenGeometry,
    pub series: CleanedSeries,
    pub stress_strain: StressStrainSeries,
    /// Smoothed pointwise modulus (MPa), aligned with `stress_strain`.
    pub modulus: ModulusCurve,
    /// Smoothed strain in percent, aligned with `stress_strain`.
    pub strain_pct: Vec<f64>,
    pub peaks: CyclePeaks,
    pub cycles: Vec<Cycle>,
    /// First force maxima, capped at the configured limit.
    pub loading_peaks: Vec<usize>,
    /// Hysteresis loop area (N·mm) per cycle.
    pub loop_areas: Vec<f64>,
    /// Deflection rate (mm/s) up to the first peak.
    pub loading_rate: Option<f64>,
    /// `Err(InsufficientCycles)` when too few cycles were detected.
    pub cycle_stages: Result<CycleStages>,
}

impl AnalysisReport {
    /// Mean static modulus over the cycles that produced one.
    pub fn mean_static_modulus(&self) -> Option<f64> {
        self.cycle_stages
            .as_ref()
            .ok()
            .and_then(|stages| mean_static_modulus(&stages.static_moduli))
    }

    /// Windowed modulus at the standard reporting strain levels.
    pub fn strain_level_points(&self) -> Vec<(f64, WindowPoint)> {
        let Ok(Ok(windowed)) = self.cycle_stages.as_ref().map(|s| s.windowed.as_ref()) else {
            return Vec::new();
        };
        STRAIN_REPORT_LEVELS
            .iter()
            .filter_map(|&level| windowed.nearest_to_strain(level).map(|p| (level, p)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Run the full analysis of one recording.
///
/// Configuration, data and geometry errors abort the run. Too few cycles
/// only disables the per-cycle stages, which is recorded in
/// [`AnalysisReport::cycle_stages`].
pub fn analyze(
    recording: &Recording,
    geometry: &SpecimenGeometry,
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    config.validate()?;
    geometry.validate()?;
    if recording.is_empty() {
        return Err(AnalysisError::Data("recording is empty".into()));
    }

    let force = remove_spikes(&recording.force)?;
    let displacement = remove_spikes(&recording.displacement)?;
    let time = remove_spikes(&recording.time)?;

    let series = truncate_before_load(
        &force,
        &displacement,
        &time,
        config.baseline_threshold_n,
        config.sustain_samples,
    )?;
    log::info!(
        "{} samples over {:.2} s after baseline truncation",
        series.len(),
        series.elapsed()
    );

    let raw = compute_stress_strain(&series.force, &series.displacement, geometry)?;
    let stress_strain = StressStrainSeries {
        stress: remove_spikes(&raw.stress)?,
        strain: remove_spikes(&raw.strain)?,
    };

    let modulus = continuous_modulus(
        &stress_strain.stress,
        &stress_strain.strain,
        config.median_window,
        config.gaussian_sigma,
    )?;
    let strain_pct = strain_percent_curve(
        &stress_strain.strain,
        config.strain_median_window,
        config.strain_gaussian_sigma,
    );

    let peaks = detect_peaks(&stress_strain.strain, config.prominence_factor);
    let cycles = build_cycles(&peaks, series.len());
    let loading_peaks = find_loading_cycle_starts(
        &series.force,
        config.prominence_factor,
        config.loading_peak_limit,
    );
    let loop_areas = cycle_loop_areas(&series.displacement, &series.force, &cycles);
    log::info!(
        "{} cycles, {} upper peaks, {} loading peaks",
        cycles.len(),
        peaks.upper.len(),
        loading_peaks.len()
    );

    let loading_rate = peaks.upper.first().and_then(|&p| {
        let t = series.time[p];
        (t > 0.0).then(|| series.displacement[p] / t)
    });

    let cycle_stages = if peaks.upper.len() < MIN_LOADING_PEAKS {
        let err = AnalysisError::InsufficientCycles {
            found: peaks.upper.len(),
            required: MIN_LOADING_PEAKS,
        };
        log::warn!("{err}");
        Err(err)
    } else {
        let window = window_width(series.len(), series.elapsed());
        let windowed = windowed_secant_modulus(
            &series.force,
            &series.displacement,
            &peaks.upper,
            window,
            geometry,
        );
        if let Err(err) = &windowed {
            log::warn!("windowed modulus unavailable: {err}");
        }
        let static_moduli = static_moduli(
            &series.force,
            &series.displacement,
            &cycles,
            geometry,
            config.sustain_samples,
        );
        Ok(CycleStages {
            windowed,
            static_moduli,
        })
    };

    Ok(AnalysisReport {
        geometry: *geometry,
        series,
        stress_strain,
        modulus,
        strain_pct,
        peaks,
        cycles,
        loading_peaks,
        loop_areas,
        loading_rate,
        cycle_stages,
    })
}
