// Discrete derivatives. Interior points use central differences and the
// two boundary points use one-sided differences.

/// Derivative of a uniformly sampled series (unit spacing).
pub fn gradient(data: &[f64]) -> Vec<f64> {
    let n = data.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let mut out = Vec::with_capacity(n);
    out.push(data[1] - data[0]);
    for i in 1..n - 1 {
        out.push((data[i + 1] - data[i - 1]) * 0.5);
    }
    out.push(data[n - 1] - data[n - 2]);
    out
}

/// Derivative of `y` with respect to the (possibly irregular) coordinates `x`.
///
/// Interior points use the second-order non-uniform stencil. Repeated or
/// reversing coordinates produce NaN or ±inf, which callers are expected to
/// interpolate over.
pub fn gradient_wrt(y: &[f64], x: &[f64]) -> Vec<f64> {
    let n = y.len().min(x.len());
    if n < 2 {
        return vec![f64::NAN; n];
    }

    let mut out = Vec::with_capacity(n);
    out.push((y[1] - y[0]) / (x[1] - x[0]));
    for i in 1..n - 1 {
        let hs = x[i] - x[i - 1];
        let hd = x[i + 1] - x[i];
        let num = hs * hs * y[i + 1] + (hd * hd - hs * hs) * y[i] - hd * hd * y[i - 1];
        out.push(num / (hs * hd * (hd + hs)));
    }
    out.push((y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]));
    out
}
