use crate::constants::{MM2_TO_M2, PA_TO_MPA};
use crate::data::model::{SpecimenGeometry, StressStrainSeries};
use crate::error::Result;

/// Stress (MPa) and strain (dimensionless) from force (N) and displacement (mm).
///
/// Geometry is validated first. Non-finite inputs are passed through as
/// NaN/inf for the cleaner to resolve; they never raise here.
pub fn compute_stress_strain(
    force: &[f64],
    displacement: &[f64],
    geometry: &SpecimenGeometry,
) -> Result<StressStrainSeries> {
    geometry.validate()?;

    let area_m2 = geometry.area() * MM2_TO_M2;
    let height = geometry.height();

    Ok(StressStrainSeries {
        stress: force.iter().map(|f| f / area_m2 * PA_TO_MPA).collect(),
        strain: displacement.iter().map(|d| d / height).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use approx::assert_relative_eq;

    fn specimen() -> SpecimenGeometry {
        SpecimenGeometry::Rectangular {
            width: 100.0,
            length: 100.0,
            height: 28.0,
        }
    }

    #[test]
    fn converts_to_mpa_and_strain() {
        let series = compute_stress_strain(&[0.0, 10_000.0], &[0.0, 2.8], &specimen()).unwrap();
        assert_eq!(series.stress[0], 0.0);
        assert_relative_eq!(series.stress[1], 1.0, max_relative = 1e-12);
        assert_relative_eq!(series.strain[1], 0.1, max_relative = 1e-12);
    }

    #[test]
    fn nan_passes_through() {
        let series = compute_stress_strain(&[f64::NAN], &[1.0], &specimen()).unwrap();
        assert!(series.stress[0].is_nan());
    }

    #[test]
    fn degenerate_geometry_fails_fast() {
        let g = SpecimenGeometry::Rectangular {
            width: 100.0,
            length: 100.0,
            height: 0.0,
        };
        let err = compute_stress_strain(&[1.0], &[1.0], &g).unwrap_err();
        assert!(matches!(err, AnalysisError::Geometry(_)));
    }
}
