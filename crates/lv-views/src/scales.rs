//! Mappings between data values and plot pixels

/// Category values rendered as bands
pub const CATEGORIES: [u8; 5] = [1, 2, 3, 4, 5];

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Linear map from a numeric domain to a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    /// A domain with equal bounds is widened by half a unit on each side.
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        let domain = if domain.0 == domain.1 {
            (domain.0 - 0.5, domain.1 + 0.5)
        } else {
            domain
        };
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    /// Pixel position of `value`; non-finite input stays non-finite
    pub fn map(&self, value: f64) -> f32 {
        let (d0, d1) = self.domain;
        let t = (value - d0) / (d1 - d0);
        let (r0, r1) = self.range;
        (r0 as f64 + t * (r1 - r0) as f64) as f32
    }

    /// Data value at pixel `px`
    pub fn invert(&self, px: f32) -> f64 {
        let (r0, r1) = self.range;
        let t = (px - r0) as f64 / (r1 - r0) as f64;
        let (d0, d1) = self.domain;
        d0 + t * (d1 - d0)
    }

    /// Extend the domain outward to round tick boundaries
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut previous = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count as f64);
            if previous == Some(step) {
                self.domain = if reversed { (stop, start) } else { (start, stop) };
                return self;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous = Some(step);
        }
        self
    }

    /// Round values spanning the domain, roughly `count` of them
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let (start, stop) = (d0.min(d1), d0.max(d1));
        if count == 0 || !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }

        let step = tick_increment(start, stop, count as f64);
        if step == 0.0 || !step.is_finite() {
            return Vec::new();
        }

        if step > 0.0 {
            let first = (start / step).ceil() as i64;
            let last = (stop / step).floor() as i64;
            (first..=last).map(|i| i as f64 * step).collect()
        } else {
            let inverse = -step;
            let first = (start * inverse).ceil() as i64;
            let last = (stop * inverse).floor() as i64;
            (first..=last).map(|i| i as f64 / inverse).collect()
        }
    }
}

/// Power-of-ten step for `count` ticks over `[start, stop]`. Negative results
/// encode the reciprocal of a fractional step.
fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Evenly spaced bands for discrete categories
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    categories: Vec<u8>,
    start: f32,
    step: f32,
    bandwidth: f32,
}

impl BandScale {
    /// Bands over `range` with equal inner and outer `padding`, centered
    pub fn new(categories: &[u8], range: (f32, f32), padding: f32) -> Self {
        let n = categories.len() as f32;
        let (r0, r1) = range;
        let step = (r1 - r0) / (n - padding + padding * 2.0).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;
        Self {
            categories: categories.to_vec(),
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Left edge of the band for `category`
    pub fn position(&self, category: u8) -> Option<f32> {
        self.categories
            .iter()
            .position(|&c| c == category)
            .map(|i| self.start + self.step * i as f32)
    }

    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn categories(&self) -> &[u8] {
        &self.categories
    }
}

/// Horizontal center of variable `index` of `count` inside a band
pub fn variable_center(band_start: f32, bandwidth: f32, index: usize, count: usize) -> f32 {
    band_start + bandwidth * (index + 1) as f32 / (count + 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_map_and_invert() {
        let scale = LinearScale::new((100.0, 250.0), (340.0, 0.0));
        assert_eq!(scale.map(100.0), 340.0);
        assert_eq!(scale.map(250.0), 0.0);
        assert!((scale.invert(170.0) - 175.0).abs() < 1e-6);
        assert!(scale.map(f64::NAN).is_nan());
    }

    #[test]
    fn test_degenerate_domain_widened() {
        let scale = LinearScale::new((5.0, 5.0), (100.0, 0.0));
        assert_eq!(scale.domain(), (4.5, 5.5));
        assert_eq!(scale.map(5.0), 50.0);
    }

    #[test]
    fn test_nice_rounds_outward() {
        let scale = LinearScale::new((100.0, 250.0), (340.0, 0.0)).nice(10);
        assert_eq!(scale.domain(), (100.0, 260.0));

        let scale = LinearScale::new((0.13, 0.97), (0.0, 1.0)).nice(10);
        let (lo, hi) = scale.domain();
        assert!((lo - 0.1).abs() < 1e-9 && (hi - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ticks() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        assert_eq!(scale.ticks(5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        let scale = LinearScale::new((0.0, 1.0), (0.0, 100.0));
        assert_eq!(scale.ticks(5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn test_band_scale() {
        let bands = BandScale::new(&CATEGORIES, (0.0, 500.0), 0.0);
        assert_eq!(bands.bandwidth(), 100.0);
        assert_eq!(bands.position(1), Some(0.0));
        assert_eq!(bands.position(5), Some(400.0));
        assert_eq!(bands.position(9), None);

        let padded = BandScale::new(&CATEGORIES, (0.0, 500.0), 0.06);
        assert!(padded.bandwidth() < padded.step());
        let first = padded.position(1).unwrap();
        let last = padded.position(5).unwrap() + padded.bandwidth();
        assert!((first - (500.0 - last)).abs() < 1e-3);
    }

    #[test]
    fn test_variable_centers_split_band() {
        let centers: Vec<f32> = (0..3).map(|i| variable_center(0.0, 100.0, i, 3)).collect();
        assert_eq!(centers, vec![25.0, 50.0, 75.0]);
    }
}
