use crate::data::model::Cycle;

/// Area (N·mm) enclosed by one displacement–force loop.
///
/// The loop is closed back onto its first sample and integrated with the
/// trapezoid rule; the sign of the traversal is dropped.
pub fn loop_area(displacement: &[f64], force: &[f64]) -> f64 {
    let n = displacement.len().min(force.len());
    if n < 2 {
        return 0.0;
    }

    let point = |i: usize| (displacement[i % n], force[i % n]);
    let area: f64 = (0..n)
        .map(|i| {
            let (x0, y0) = point(i);
            let (x1, y1) = point(i + 1);
            (x1 - x0) * (y1 + y0) / 2.0
        })
        .sum();
    area.abs()
}

/// Loop area of every cycle, in cycle order.
pub fn cycle_loop_areas(displacement: &[f64], force: &[f64], cycles: &[Cycle]) -> Vec<f64> {
    let len = displacement.len().min(force.len());
    cycles
        .iter()
        .map(|c| {
            let range = c.range_within(len);
            loop_area(&displacement[range.clone()], &force[range])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unit_square_loop() {
        let x = [0.0, 1.0, 1.0, 0.0];
        let y = [0.0, 0.0, 1.0, 1.0];
        assert_relative_eq!(loop_area(&x, &y), 1.0);
    }

    #[test]
    fn elastic_line_encloses_nothing() {
        let x = [0.0, 1.0, 2.0, 1.0, 0.0];
        let y = [0.0, 5.0, 10.0, 5.0, 0.0];
        assert_eq!(loop_area(&x, &y), 0.0);
    }

    #[test]
    fn degenerate_cycles_have_zero_area() {
        let cycles = [Cycle {
            start: 3,
            end: 4,
            peak: 3,
        }];
        assert_eq!(cycle_loop_areas(&[0.0; 5], &[0.0; 5], &cycles), vec![0.0]);
    }
}
