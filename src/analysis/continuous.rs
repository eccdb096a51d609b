use crate::analysis::cleaner::remove_spikes;
use crate::analysis::derivative::gradient_wrt;
use crate::analysis::smoothing::smooth;
use crate::data::model::ModulusCurve;
use crate::error::Result;

/// Pointwise dσ/dε over the whole test, smoothed.
///
/// Turning points and repeated strain values make the raw derivative
/// non-finite; those samples are interpolated before the median and
/// Gaussian passes. The output is deterministic for identical inputs.
pub fn continuous_modulus(
    stress: &[f64],
    strain: &[f64],
    median_window: usize,
    gaussian_sigma: f64,
) -> Result<ModulusCurve> {
    let raw = gradient_wrt(stress, strain);
    let filled = remove_spikes(&raw)?;
    Ok(ModulusCurve {
        values: smooth(&filled, median_window, gaussian_sigma),
    })
}

/// Strain in percent with the displacement-channel smoothing applied.
pub fn strain_percent_curve(strain: &[f64], median_window: usize, gaussian_sigma: f64) -> Vec<f64> {
    let percent: Vec<f64> = strain.iter().map(|e| e * 100.0).collect();
    smooth(&percent, median_window, gaussian_sigma)
}
