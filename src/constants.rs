// Business rules of the static-modulus test standard. Changing any of these
// changes which samples the downstream thresholds match.

/// Load (N) the force must exceed before the test is considered started.
pub const BASELINE_THRESHOLD_N: f64 = 20.0;

/// Consecutive samples that must stay above a threshold for a crossing to count.
pub const SUSTAIN_SAMPLES: usize = 5;

/// Lower load threshold (N) of the static-modulus secant.
pub const STATIC_LOWER_THRESHOLD_N: f64 = 625.0;

/// Upper load threshold (N) of the static-modulus secant.
pub const STATIC_UPPER_THRESHOLD_N: f64 = 8750.0;

/// Minimum number of upper peaks for any per-cycle estimate.
pub const MIN_LOADING_PEAKS: usize = 3;

/// Peak index used for the windowed estimate when at least four peaks exist.
pub const PREFERRED_CYCLE_INDEX: usize = 3;

/// Peak index used for the windowed estimate when exactly three peaks exist.
pub const FALLBACK_CYCLE_INDEX: usize = 2;

/// Leading windows discarded as instrument warm-up.
pub const WARMUP_WINDOWS: usize = 3;

/// Seconds of signal covered by one secant window.
pub const WINDOW_SECONDS: f64 = 2.0;

/// Sample rate (Hz) assumed when the recording has zero elapsed time.
pub const FALLBACK_SAMPLE_RATE: f64 = 10.0;

/// Prominence threshold as a fraction of the signal's standard deviation.
pub const PROMINENCE_FACTOR: f64 = 0.5;

/// Number of loading cycles summarised from the force signal.
pub const LOADING_PEAK_LIMIT: usize = 5;

/// Strain levels (%) at which the windowed modulus is reported.
pub const STRAIN_REPORT_LEVELS: [f64; 3] = [5.0, 10.0, 20.0];

/// Pa → MPa.
pub const PA_TO_MPA: f64 = 1e-6;

/// mm² → m².
pub const MM2_TO_M2: f64 = 1e-6;
