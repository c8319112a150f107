//! Kernel density estimation for violin outlines

/// Number of evaluation points per density curve
pub const GRID_POINTS: usize = 80;

/// Bandwidth as a fraction of the domain span
pub const BANDWIDTH_DIVISOR: f64 = 40.0;

/// Epanechnikov kernel scaled by `bandwidth`
pub fn epanechnikov(bandwidth: f64) -> impl Fn(f64) -> f64 {
    move |v| {
        let u = v / bandwidth;
        if u.abs() <= 1.0 {
            0.75 * (1.0 - u * u) / bandwidth
        } else {
            0.0
        }
    }
}

/// Mean kernel contribution of `sample` at each evaluation point.
///
/// Non-finite sample values are ignored; an empty sample or an unusable
/// bandwidth yields zero density everywhere.
pub fn density(sample: &[f64], points: &[f64], bandwidth: f64) -> Vec<(f64, f64)> {
    let values: Vec<f64> = sample.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() || !(bandwidth > 0.0 && bandwidth.is_finite()) {
        return points.iter().map(|&x| (x, 0.0)).collect();
    }

    let kernel = epanechnikov(bandwidth);
    let n = values.len() as f64;
    points
        .iter()
        .map(|&x| (x, values.iter().map(|&v| kernel(x - v)).sum::<f64>() / n))
        .collect()
}

/// Evaluation points and bandwidth derived from a value domain
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    points: Vec<f64>,
    bandwidth: f64,
}

impl DensityGrid {
    pub fn for_domain(lo: f64, hi: f64) -> Self {
        Self::with_resolution(lo, hi, GRID_POINTS, BANDWIDTH_DIVISOR)
    }

    /// `count` points starting at `lo` with step `span / count`; `hi` itself
    /// is not sampled
    pub fn with_resolution(lo: f64, hi: f64, count: usize, bandwidth_divisor: f64) -> Self {
        let span = hi - lo;
        let count = count.max(1);
        let step = span / count as f64;
        Self {
            points: (0..count).map(|i| lo + step * i as f64).collect(),
            bandwidth: span / bandwidth_divisor,
        }
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn estimate(&self, sample: &[f64]) -> DensityCurve {
        DensityCurve {
            samples: density(sample, &self.points, self.bandwidth),
            sample_size: sample.iter().filter(|v| v.is_finite()).count(),
        }
    }
}

/// Density sampled on a grid, ordered by value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DensityCurve {
    samples: Vec<(f64, f64)>,
    sample_size: usize,
}

impl DensityCurve {
    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }

    /// Number of values the curve was estimated from
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn max_density(&self) -> f64 {
        self.samples.iter().map(|&(_, d)| d).fold(0.0, f64::max)
    }

    /// Density at the grid point closest to `value`
    pub fn nearest(&self, value: f64) -> f64 {
        if self.samples.is_empty() || !value.is_finite() {
            return 0.0;
        }
        let ix = self.samples.partition_point(|&(x, _)| x < value);
        let candidates = [ix.checked_sub(1), Some(ix)];
        candidates
            .iter()
            .flatten()
            .filter_map(|&i| self.samples.get(i))
            .min_by(|a, b| (a.0 - value).abs().total_cmp(&(b.0 - value).abs()))
            .map(|&(_, d)| d)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_support() {
        let kernel = epanechnikov(2.0);
        assert_eq!(kernel(0.0), 0.375);
        assert_eq!(kernel(2.0), 0.0);
        assert_eq!(kernel(3.0), 0.0);
    }

    #[test]
    fn test_single_value_peaks_at_value() {
        let grid = DensityGrid::for_domain(0.0, 80.0);
        assert_eq!(grid.points().len(), 80);
        assert_eq!(grid.bandwidth(), 2.0);

        let curve = grid.estimate(&[40.0]);
        let samples = curve.samples();
        let peak = samples.iter().position(|&(x, _)| x == 40.0).unwrap();
        assert_eq!(curve.max_density(), samples[peak].1);
        // strictly decreasing away from the value inside the bandwidth
        assert!(samples[peak + 1].1 < samples[peak].1);
        assert!(samples[peak - 1].1 < samples[peak].1);
        assert_eq!(samples[peak + 2].1, 0.0);
    }

    #[test]
    fn test_empty_sample_is_zero() {
        let curve = DensityGrid::for_domain(0.0, 10.0).estimate(&[]);
        assert_eq!(curve.sample_size(), 0);
        assert!(curve.samples().iter().all(|&(_, d)| d == 0.0));
        assert_eq!(curve.max_density(), 0.0);
    }

    #[test]
    fn test_non_finite_values_ignored() {
        let grid = DensityGrid::for_domain(0.0, 80.0);
        let clean = grid.estimate(&[10.0, 20.0]);
        let noisy = grid.estimate(&[10.0, f64::NAN, 20.0]);
        assert_eq!(clean, noisy);
        assert!(noisy.samples().iter().all(|&(_, d)| d.is_finite()));
    }

    #[test]
    fn test_nearest_lookup() {
        let curve = DensityGrid::for_domain(0.0, 80.0).estimate(&[40.0]);
        assert_eq!(curve.nearest(40.4), curve.nearest(40.0));
        assert_eq!(curve.nearest(-100.0), curve.samples()[0].1);
        assert_eq!(curve.nearest(f64::NAN), 0.0);
    }
}
