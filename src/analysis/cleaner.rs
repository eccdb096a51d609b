use crate::data::model::CleanedSeries;
use crate::error::{AnalysisError, Result};

/// Replace NaN entries by linear interpolation between the surrounding valid
/// samples. Gaps before the first or after the last valid sample are
/// extrapolated along the nearest segment. Valid samples are left untouched.
pub fn interpolate_nans(series: &[f64]) -> Result<Vec<f64>> {
    let valid: Vec<usize> = (0..series.len()).filter(|&i| !series[i].is_nan()).collect();
    if valid.len() < 2 {
        return Err(AnalysisError::Data(format!(
            "interpolation needs at least 2 valid samples, found {}",
            valid.len()
        )));
    }
    if valid.len() == series.len() {
        return Ok(series.to_vec());
    }

    let mut out = series.to_vec();
    for (i, value) in out.iter_mut().enumerate() {
        if !value.is_nan() {
            continue;
        }
        // Pick the segment [a, b] of valid indices used for this sample.
        let pos = valid.partition_point(|&v| v < i);
        let (a, b) = if pos == 0 {
            (valid[0], valid[1])
        } else if pos == valid.len() {
            (valid[pos - 2], valid[pos - 1])
        } else {
            (valid[pos - 1], valid[pos])
        };
        let (ya, yb) = (series[a], series[b]);
        *value = ya + (yb - ya) * (i as f64 - a as f64) / (b as f64 - a as f64);
    }
    Ok(out)
}

/// Treat `±inf` as missing and interpolate over it together with NaNs.
/// Finite outliers are kept as they are.
pub fn remove_spikes(series: &[f64]) -> Result<Vec<f64>> {
    let masked: Vec<f64> = series
        .iter()
        .map(|&v| if v.is_infinite() { f64::NAN } else { v })
        .collect();
    interpolate_nans(&masked)
}

/// First index `i` with `values[i..i + sustain]` all above `threshold`.
///
/// A crossing needs the full `sustain` samples to be present, so a single
/// spike (or a series that ends early) never counts. The scan includes
/// index 0, so a series already above the threshold crosses at its first sample.
pub fn first_sustained_crossing(
    values: &[f64],
    threshold: f64,
    sustain: usize,
) -> Option<usize> {
    let sustain = sustain.max(1);
    if values.len() < sustain {
        return None;
    }
    (0..=values.len() - sustain)
        .find(|&i| values[i..i + sustain].iter().all(|&v| v > threshold))
}

/// Drop the pre-load noise at the start of a recording.
///
/// The series are cut at the first sustained crossing of `threshold` and each
/// channel is re-zeroed on its first kept sample. Without a crossing nothing
/// is cut, but the channels are still re-zeroed.
pub fn truncate_before_load(
    force: &[f64],
    displacement: &[f64],
    time: &[f64],
    threshold: f64,
    sustain: usize,
) -> Result<CleanedSeries> {
    if force.len() != displacement.len() || force.len() != time.len() {
        return Err(AnalysisError::Data(format!(
            "channel lengths differ: force {}, displacement {}, time {}",
            force.len(),
            displacement.len(),
            time.len()
        )));
    }
    if force.is_empty() {
        return Err(AnalysisError::Data("recording is empty".into()));
    }
    if time.windows(2).any(|w| w[1] < w[0]) {
        return Err(AnalysisError::Data("time channel is not monotonic".into()));
    }

    let start = match first_sustained_crossing(force, threshold, sustain) {
        Some(i) => i,
        None => {
            log::warn!("load never held above {threshold} N, keeping the whole recording");
            0
        }
    };
    log::debug!("truncated {start} pre-load samples");

    let rezero = |channel: &[f64]| -> Vec<f64> {
        let base = channel[start];
        channel[start..].iter().map(|v| v - base).collect()
    };

    Ok(CleanedSeries {
        force: rezero(force),
        displacement: rezero(displacement),
        time: rezero(time),
    })
}
