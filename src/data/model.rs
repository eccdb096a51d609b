use std::f64::consts::PI;
use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// RawSample / Recording – the acquisition table as it comes off the rig
// ---------------------------------------------------------------------------

/// One row of the acquisition table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub force_n: f64,
    /// Second channel of the rig; carried along but never analysed.
    pub aux: f64,
    pub displacement_mm: f64,
    pub time_s: f64,
}

/// Column-oriented copy of a whole recording, ordered by acquisition time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    pub force: Vec<f64>,
    pub aux: Vec<f64>,
    pub displacement: Vec<f64>,
    pub time: Vec<f64>,
}

impl Recording {
    pub fn from_rows(rows: &[RawSample]) -> Self {
        let mut rec = Recording {
            force: Vec::with_capacity(rows.len()),
            aux: Vec::with_capacity(rows.len()),
            displacement: Vec::with_capacity(rows.len()),
            time: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            rec.force.push(row.force_n);
            rec.aux.push(row.aux);
            rec.displacement.push(row.displacement_mm);
            rec.time.push(row.time_s);
        }
        rec
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.force.len()
    }

    /// Whether the recording holds no samples.
    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SpecimenGeometry
// ---------------------------------------------------------------------------

/// Specimen dimensions in millimetres. Immutable for a test run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum SpecimenGeometry {
    Rectangular {
        width: f64,
        length: f64,
        height: f64,
    },
    Circular { diameter: f64, height: f64 },
}

impl SpecimenGeometry {
    /// Loaded cross-section in mm².
    pub fn area(&self) -> f64 {
        match *self {
            SpecimenGeometry::Rectangular { width, length, .. } => width * length,
            SpecimenGeometry::Circular { diameter, .. } => PI * diameter * diameter / 4.0,
        }
    }

    /// Initial specimen height in mm.
    pub fn height(&self) -> f64 {
        match *self {
            SpecimenGeometry::Rectangular { height, .. }
            | SpecimenGeometry::Circular { height, .. } => height,
        }
    }

    /// Width (or diameter) over height, the `q` printed on test reports.
    pub fn form_factor(&self) -> f64 {
        match *self {
            SpecimenGeometry::Rectangular { width, height, .. } => width / height,
            SpecimenGeometry::Circular { diameter, height } => diameter / height,
        }
    }

    /// Loaded area over the free lateral surface.
    pub fn shape_coefficient(&self) -> f64 {
        match *self {
            SpecimenGeometry::Rectangular {
                width,
                length,
                height,
            } => (width * length) / (2.0 * height * (width + length)),
            SpecimenGeometry::Circular { diameter, height } => diameter / (4.0 * height),
        }
    }

    /// Fail fast on dimensions no computation can use.
    pub fn validate(&self) -> Result<()> {
        let dims: Vec<(&str, f64)> = match *self {
            SpecimenGeometry::Rectangular {
                width,
                length,
                height,
            } => vec![("width", width), ("length", length), ("height", height)],
            SpecimenGeometry::Circular { diameter, height } => {
                vec![("diameter", diameter), ("height", height)]
            }
        };
        for (name, value) in dims {
            if !(value.is_finite() && value > 0.0) {
                return Err(AnalysisError::Geometry(format!(
                    "{name} must be a positive length, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for SpecimenGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecimenGeometry::Rectangular {
                width,
                length,
                height,
            } => write!(f, "{width} x {length} x {height} mm"),
            SpecimenGeometry::Circular { diameter, height } => {
                write!(f, "Ø{diameter} x {height} mm")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Derived series
// ---------------------------------------------------------------------------

/// Force, displacement and time after baseline truncation, each starting at 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedSeries {
    pub force: Vec<f64>,
    pub displacement: Vec<f64>,
    pub time: Vec<f64>,
}

impl CleanedSeries {
    pub fn len(&self) -> usize {
        self.force.len()
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }

    /// Total elapsed time in seconds (time of the last sample).
    pub fn elapsed(&self) -> f64 {
        self.time.last().copied().unwrap_or(0.0)
    }
}

/// Stress (MPa) and dimensionless strain, index-aligned with [`CleanedSeries`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressStrainSeries {
    pub stress: Vec<f64>,
    pub strain: Vec<f64>,
}

/// One loading/unloading repetition: samples `start..end`, maximum at `peak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cycle {
    pub start: usize,
    pub end: usize,
    pub peak: usize,
}

impl Cycle {
    /// Sample range of the cycle, clamped to a series of `len` samples.
    /// Never panics when used to slice that series.
    pub fn range_within(&self, len: usize) -> Range<usize> {
        let end = self.end.min(len);
        self.start.min(end)..end
    }
}

/// Raw peak bookkeeping as produced by the detector. `lower[0]` is always 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CyclePeaks {
    pub upper: Vec<usize>,
    pub lower: Vec<usize>,
}

/// Pointwise (or per-window) modulus values in MPa.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModulusCurve {
    pub values: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Windowed secant result
// ---------------------------------------------------------------------------

/// Per-window stress (MPa), modulus (MPa) and strain (%) of the reference cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WindowedModulus {
    pub stress: Vec<f64>,
    pub modulus: Vec<f64>,
    pub strain_pct: Vec<f64>,
}

/// A single window of a [`WindowedModulus`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowPoint {
    pub stress: f64,
    pub modulus: f64,
    pub strain_pct: f64,
}

impl WindowedModulus {
    pub fn len(&self) -> usize {
        self.modulus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modulus.is_empty()
    }

    /// Window whose strain is closest to `strain_pct`. First match wins on ties.
    pub fn nearest_to_strain(&self, strain_pct: f64) -> Option<WindowPoint> {
        let mut best: Option<(usize, f64)> = None;
        for (i, eps) in self.strain_pct.iter().enumerate() {
            let dist = (eps - strain_pct).abs();
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }
        best.map(|(i, _)| WindowPoint {
            stress: self.stress[i],
            modulus: self.modulus[i],
            strain_pct: self.strain_pct[i],
        })
    }
}

/// Static modulus of one cycle; `None` when a threshold was never reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleStaticResult {
    pub cycle: usize,
    pub modulus: Option<f64>,
}
