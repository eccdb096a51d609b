use thiserror::Error;

/// Everything that can go wrong inside the analysis core.
///
/// `Data` and `Geometry` abort a whole run. `InsufficientCycles` only
/// disables the per-cycle stages, and `ThresholdNotFound` is scoped to a
/// single cycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("data error: {0}")]
    Data(String),

    #[error("invalid specimen geometry: {0}")]
    Geometry(String),

    #[error("insufficient cycles: found {found} loading peaks, at least {required} are needed")]
    InsufficientCycles { found: usize, required: usize },

    #[error("cycle {cycle}: load never held above {threshold_n} N")]
    ThresholdNotFound { cycle: usize, threshold_n: f64 },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
