use crate::analysis::derivative::gradient;
use crate::data::model::{Cycle, CyclePeaks};

/// Population standard deviation over the finite samples.
pub fn finite_std(signal: &[f64]) -> f64 {
    let finite: Vec<f64> = signal.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return 0.0;
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    (finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

/// Local maxima, excluding the two end samples. A flat top is reported at
/// its first sample.
fn local_maxima(x: &[f64]) -> Vec<usize> {
    let n = x.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }

    let mut i = 1;
    while i < n - 1 {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < n - 1 && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                peaks.push(i);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }
    peaks
}

/// Height of `x[peak]` above the higher of the two lowest points reachable
/// on either side before the signal rises above the peak.
pub fn prominence(x: &[f64], peak: usize) -> f64 {
    let top = x[peak];

    let mut left_min = top;
    let mut i = peak;
    loop {
        if x[i] > top {
            break;
        }
        left_min = left_min.min(x[i]);
        if i == 0 {
            break;
        }
        i -= 1;
    }

    let mut right_min = top;
    for &v in &x[peak..] {
        if v > top {
            break;
        }
        right_min = right_min.min(v);
    }

    top - left_min.max(right_min)
}

/// Indices of local maxima whose prominence is at least
/// `prominence_factor` standard deviations of the signal.
pub fn find_peaks(signal: &[f64], prominence_factor: f64) -> Vec<usize> {
    let min_prominence = prominence_factor * finite_std(signal);
    local_maxima(signal)
        .into_iter()
        .filter(|&p| prominence(signal, p) >= min_prominence)
        .collect()
}

/// Move every trough forward to the first sample where the signal starts
/// rising again, and prepend sample 0 as the implicit first cycle start.
///
/// Troughs that never see a rising sample afterwards are dropped. The
/// result is strictly increasing.
pub fn snap_troughs_to_rise(signal: &[f64], troughs: &[usize]) -> Vec<usize> {
    let grad = gradient(signal);
    let mut starts = vec![0];
    for &t in troughs {
        if t >= grad.len() {
            continue;
        }
        if let Some(offset) = grad[t..].iter().position(|&g| g > 0.0) {
            let rise = t + offset;
            if starts.last().map_or(true, |&last| rise > last) {
                starts.push(rise);
            }
        }
    }
    starts
}

/// The first `limit` force maxima. Bounds how many cycles are summarised.
pub fn find_loading_cycle_starts(
    force: &[f64],
    prominence_factor: f64,
    limit: usize,
) -> Vec<usize> {
    let mut peaks = find_peaks(force, prominence_factor);
    peaks.truncate(limit);
    peaks
}

/// Upper peaks and rise-snapped troughs of the loading signal.
pub fn detect_peaks(signal: &[f64], prominence_factor: f64) -> CyclePeaks {
    let upper = find_peaks(signal, prominence_factor);

    // Negation keeps the std, so troughs share the threshold of the peaks.
    let negated: Vec<f64> = signal.iter().map(|v| -v).collect();
    let troughs = find_peaks(&negated, prominence_factor);
    let lower = snap_troughs_to_rise(signal, &troughs);

    log::debug!("detected {} upper and {} lower peaks", upper.len(), lower.len());
    CyclePeaks { upper, lower }
}

/// Pair each upper peak with its cycle boundaries.
///
/// Cycle `k` spans `lower[k]..lower[k + 1]`; the last cycle runs to the end
/// of the series. Peaks without a matching start, or spans that come out
/// empty, are skipped instead of indexing past the end.
pub fn build_cycles(peaks: &CyclePeaks, len: usize) -> Vec<Cycle> {
    let mut cycles = Vec::with_capacity(peaks.upper.len());
    for (k, &peak) in peaks.upper.iter().enumerate() {
        let Some(&start) = peaks.lower.get(k) else {
            break;
        };
        let next = if k + 1 == peaks.upper.len() {
            len
        } else {
            peaks.lower.get(k + 1).copied().unwrap_or(len)
        };
        let end = next.min(len);

        if start >= end || peak >= len {
            log::debug!("skipping malformed cycle {k}: {start}..{end}, peak {peak}");
            continue;
        }
        cycles.push(Cycle { start, end, peak });
    }
    cycles
}
