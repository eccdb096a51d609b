//! Median and Gaussian smoothing with half-sample symmetric boundaries
//! (`d c b a | a b c d | d c b a`).

/// Gaussian kernel extends this many sigmas either side of the centre.
const GAUSSIAN_TRUNCATE: f64 = 4.0;

/// Map a possibly out-of-range index back into `0..n` by mirroring.
fn reflect_index(i: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = i.rem_euclid(period) as usize;
    if m < n {
        m
    } else {
        2 * n - 1 - m
    }
}

/// Sliding median of width `window`.
///
/// The window for output `i` covers inputs `i - window/2 .. i - window/2 + window`,
/// and for even widths the upper of the two middle values is taken.
pub fn median_filter(data: &[f64], window: usize) -> Vec<f64> {
    let n = data.len();
    if n == 0 || window <= 1 {
        return data.to_vec();
    }

    let half = (window / 2) as isize;
    let mut buf = Vec::with_capacity(window);
    let mut out = Vec::with_capacity(n);

    for i in 0..n as isize {
        buf.clear();
        buf.extend((0..window as isize).map(|j| data[reflect_index(i + j - half, n)]));
        buf.sort_by(|a, b| a.total_cmp(b));
        out.push(buf[window / 2]);
    }
    out
}

/// Normalised Gaussian kernel of radius `round(4·sigma)`.
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as isize;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x * x) as f64 / (sigma * sigma)).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// One-dimensional Gaussian smoothing. A non-positive sigma returns the input.
pub fn gaussian_filter(data: &[f64], sigma: f64) -> Vec<f64> {
    let n = data.len();
    if n == 0 || !(sigma > 0.0) {
        return data.to_vec();
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;

    (0..n as isize)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(j, w)| w * data[reflect_index(i + j as isize - radius, n)])
                .sum::<f64>()
        })
        .collect()
}

/// Median pass followed by a Gaussian pass.
///
/// The median window is clamped to a quarter of the series so a short
/// series is not flattened into a constant.
pub fn smooth(data: &[f64], median_window: usize, sigma: f64) -> Vec<f64> {
    let window = median_window.min((data.len() / 4).max(1));
    gaussian_filter(&median_filter(data, window), sigma)
}
