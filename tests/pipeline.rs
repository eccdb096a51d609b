use approx::assert_relative_eq;
use rusty_press::analysis::cycles::find_loading_cycle_starts;
use rusty_press::{AnalysisConfig, AnalysisError, Recording, SpecimenGeometry, analyze};

const SAMPLE_PERIOD_S: f64 = 0.1;
const LEAD_IN: usize = 20;
const CYCLE_SAMPLES: usize = 200;

fn specimen() -> SpecimenGeometry {
    SpecimenGeometry::Rectangular {
        width: 100.0,
        length: 100.0,
        height: 28.0,
    }
}

/// Triangular load cycles with the given peak loads (N), 100 N per sample,
/// displacement proportional to load (5000 N/mm), then a final partial ramp.
fn recording(peaks_n: &[f64]) -> Recording {
    let mut force = vec![0.0; LEAD_IN];
    for &peak in peaks_n {
        force.extend((0..CYCLE_SAMPLES).map(|i| {
            let phase = i as f64;
            peak * (1.0 - (phase - 100.0).abs() / 100.0)
        }));
    }
    force.extend((0..100).map(|i| i as f64 * 100.0));

    let n = force.len();
    Recording {
        displacement: force.iter().map(|f| f / 5000.0).collect(),
        aux: vec![0.0; n],
        time: (0..n).map(|i| i as f64 * SAMPLE_PERIOD_S).collect(),
        force,
    }
}

#[test]
fn full_run_on_linear_specimen() {
    let rec = recording(&[10_000.0; 5]);
    let report = analyze(&rec, &specimen(), &AnalysisConfig::default()).unwrap();

    assert_eq!(report.series.force[0], 0.0);
    assert_eq!(report.series.displacement[0], 0.0);
    assert_eq!(report.series.time[0], 0.0);

    assert_eq!(report.peaks.upper.len(), 5);
    assert_eq!(report.peaks.lower[0], 0);
    assert_eq!(report.cycles.len(), 5);
    assert_eq!(report.loading_peaks.len(), 5);

    // σ = F / 10 000 mm², ε = F / 5000 / 28 → E = 14 MPa everywhere.
    assert!(report.modulus.values.iter().all(|v| v.is_finite()));
    for v in &report.modulus.values {
        assert_relative_eq!(*v, 14.0, max_relative = 1e-6);
    }

    let stages = report.cycle_stages.as_ref().unwrap();
    let windowed = stages.windowed.as_ref().unwrap();
    assert!(!windowed.is_empty());
    for e in &windowed.modulus {
        assert_relative_eq!(*e, 14.0, max_relative = 1e-6);
    }
    assert!(windowed.stress.windows(2).all(|w| w[1] >= w[0]));

    // Crossings at 700 N and 8800 N of the re-zeroed load.
    let expected = 8125.0 / (8100.0 / 5000.0 * 10_000.0);
    assert_eq!(stages.static_moduli.len(), 5);
    for result in &stages.static_moduli {
        assert_relative_eq!(result.modulus.unwrap(), expected, max_relative = 1e-9);
    }
    assert_relative_eq!(report.mean_static_modulus().unwrap(), expected, max_relative = 1e-9);

    // A purely elastic loop encloses (almost) no area.
    for area in &report.loop_areas {
        assert!(area.abs() < 1e-6, "loop area {area}");
    }
}

#[test]
fn cycle_below_upper_threshold_is_missing_but_others_survive() {
    let rec = recording(&[10_000.0, 10_000.0, 8000.0, 10_000.0, 10_000.0]);
    let report = analyze(&rec, &specimen(), &AnalysisConfig::default()).unwrap();

    let stages = report.cycle_stages.as_ref().unwrap();
    assert_eq!(stages.static_moduli.len(), 5);
    assert_eq!(stages.static_moduli[2].cycle, 3);
    assert!(stages.static_moduli[2].modulus.is_none());
    for (i, result) in stages.static_moduli.iter().enumerate() {
        if i != 2 {
            assert!(result.modulus.is_some(), "cycle {} missing", result.cycle);
        }
    }
}

#[test]
fn three_cycles_use_the_third_as_reference() {
    let rec = recording(&[10_000.0; 3]);
    let report = analyze(&rec, &specimen(), &AnalysisConfig::default()).unwrap();
    assert_eq!(report.peaks.upper.len(), 3);

    let stages = report.cycle_stages.as_ref().unwrap();
    let windowed = stages.windowed.as_ref().unwrap();
    assert!(!windowed.is_empty());
    for e in &windowed.modulus {
        assert_relative_eq!(*e, 14.0, max_relative = 1e-6);
    }

    let expected = 8125.0 / (8100.0 / 5000.0 * 10_000.0);
    assert_eq!(stages.static_moduli.len(), 3);
    for (i, result) in stages.static_moduli.iter().enumerate() {
        assert_eq!(result.cycle, i + 1);
        assert_relative_eq!(result.modulus.unwrap(), expected, max_relative = 1e-9);
    }
}

#[test]
fn two_cycles_are_insufficient() {
    let rec = recording(&[10_000.0; 2]);
    let report = analyze(&rec, &specimen(), &AnalysisConfig::default()).unwrap();
    assert_eq!(
        report.cycle_stages.unwrap_err(),
        AnalysisError::InsufficientCycles {
            found: 2,
            required: 3,
        }
    );
}

#[test]
fn identical_input_gives_identical_output() {
    let rec = recording(&[10_000.0, 9500.0, 10_000.0, 9800.0]);
    let config = AnalysisConfig::default();
    let a = analyze(&rec, &specimen(), &config).unwrap();
    let b = analyze(&rec, &specimen(), &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn nan_gaps_are_interpolated_before_analysis() {
    let mut rec = recording(&[10_000.0; 4]);
    rec.displacement[300] = f64::NAN;
    rec.force[301] = f64::INFINITY;
    let report = analyze(&rec, &specimen(), &AnalysisConfig::default()).unwrap();
    assert!(report.stress_strain.stress.iter().all(|v| v.is_finite()));
    assert!(report.stress_strain.strain.iter().all(|v| v.is_finite()));
    assert!(report.modulus.values.iter().all(|v| v.is_finite()));
}

#[test]
fn loading_peaks_are_capped_at_five() {
    let rec = recording(&[10_000.0; 7]);
    let peaks = find_loading_cycle_starts(&rec.force, 0.5, 5);
    assert_eq!(peaks.len(), 5);
    assert_eq!(peaks[0], LEAD_IN + 100);
}
