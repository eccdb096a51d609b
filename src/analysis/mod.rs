/// Analysis layer: from a loaded recording to modulus estimates.
///
/// Architecture:
/// ```text
///   Recording
///        │
///        ▼
///   ┌──────────┐
///   │ cleaner  │  non-finite interpolation, baseline truncation
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ stress_strain │  force/displacement → MPa / strain
///   └───────────────┘
///        │
///        ├──────────────► continuous     dσ/dε, median + Gaussian smoothing
///        ▼
///   ┌──────────┐
///   │  cycles  │  prominence peaks, rise-snapped troughs → Vec<Cycle>
///   └──────────┘
///        │
///        ├──────────────► windowed       secant windows of the reference cycle
///        ├──────────────► static_modulus threshold-to-threshold secant per cycle
///        └──────────────► hysteresis     loop area per cycle
/// ```
///
/// `pipeline::analyze` threads the stages together for one recording.

pub mod cleaner;
pub mod continuous;
pub mod cycles;
pub mod derivative;
pub mod hysteresis;
pub mod pipeline;
pub mod smoothing;
pub mod static_modulus;
pub mod stress_strain;
pub mod windowed;
