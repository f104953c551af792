//! Numeric kernels behind the summary operations.
//!
//! Thin wrappers over `u_numflow::stats` and `u_analytics`. All functions
//! take already-cleaned slices (missing cells removed) and return `NaN`
//! where a statistic is undefined rather than failing.

use u_analytics::correlation;
use u_analytics::distribution::{histogram_bins, BinMethod, HistogramBins};
use u_numflow::stats;

/// Arithmetic mean, `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    stats::mean(values).unwrap_or(f64::NAN)
}

/// Sample standard deviation (n − 1 denominator), `NaN` below two values.
pub fn std_dev(values: &[f64]) -> f64 {
    stats::std_dev(values).unwrap_or(f64::NAN)
}

pub fn min(values: &[f64]) -> f64 {
    stats::min(values).unwrap_or(f64::NAN)
}

pub fn max(values: &[f64]) -> f64 {
    stats::max(values).unwrap_or(f64::NAN)
}

/// Quantile by linear interpolation between the two closest ranks.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    stats::quantile(values, q.clamp(0.0, 1.0)).unwrap_or(f64::NAN)
}

/// Pearson correlation over the rows where both inputs are present.
///
/// Returns `NaN` with fewer than two shared observations or when either side
/// has zero variance over those rows.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip();

    match xs.len() {
        0 | 1 => f64::NAN,
        // u_analytics wants three observations; two points are perfectly
        // (anti-)correlated unless one side is flat
        2 => {
            let d = (xs[1] - xs[0]) * (ys[1] - ys[0]);
            if d == 0.0 || !d.is_finite() {
                f64::NAN
            } else {
                d.signum()
            }
        }
        _ => correlation::pearson(&xs, &ys).map_or(f64::NAN, |c| c.r),
    }
}

/// Correlation matrix of complete, equally long columns, row-major.
///
/// `None` when u_analytics cannot compute it in one pass (constant or
/// non-finite columns, fewer than three rows); callers then go pairwise.
pub fn complete_correlation(columns: &[&[f64]]) -> Option<Vec<f64>> {
    let n = columns.len();
    let matrix = correlation::correlation_matrix(columns)?;
    Some(
        (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .map(|(i, j)| matrix.get(i, j))
            .collect(),
    )
}

/// Equal-width histogram of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges, ascending.
    pub edges: Vec<f64>,
    /// Number of values per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    /// Centre of each bin, for plotting bars.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    /// Every value in the middle bin of `[center - 0.5, center + 0.5]`.
    fn spread(center: f64, count: usize, bins: usize) -> Self {
        let lo = center - 0.5;
        let width = 1.0 / bins as f64;
        let mut counts = vec![0usize; bins];
        counts[(bins / 2).min(bins - 1)] = count;
        Histogram {
            edges: (0..=bins).map(|i| lo + width * i as f64).collect(),
            counts,
        }
    }
}

impl From<HistogramBins> for Histogram {
    fn from(bins: HistogramBins) -> Self {
        Histogram {
            edges: bins.edges,
            counts: bins.counts,
        }
    }
}

/// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
///
/// The last bin is closed on the right so the maximum is counted. A constant
/// sample is spread over `[v - 0.5, v + 0.5]`; an empty sample yields empty
/// bins over `[0, 1]`. Non-finite values are ignored.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

    let (lo, hi) = match (stats::min(&finite), stats::max(&finite)) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => return Histogram::spread(0.5, 0, bins),
    };
    if lo == hi {
        return Histogram::spread(lo, finite.len(), bins);
    }

    if (hi - lo).is_finite() {
        if let Some(h) = histogram_bins(&finite, BinMethod::Fixed(bins)) {
            return h.into();
        }
    }

    // The span overflows f64: bin at half scale (exact for powers of two)
    // and scale the edges back.
    let halved: Vec<f64> = finite.iter().map(|v| v * 0.5).collect();
    let mut h: Histogram = match histogram_bins(&halved, BinMethod::Fixed(bins)) {
        Some(h) => h.into(),
        None => return Histogram::spread(lo, finite.len(), bins),
    };
    for edge in &mut h.edges {
        *edge *= 2.0;
    }
    if let Some(first) = h.edges.first_mut() {
        *first = lo;
    }
    if let Some(last) = h.edges.last_mut() {
        *last = hi;
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&v) - 5.0).abs() < 1e-12);
        // sample std: sqrt(32 / 7)
        assert!((std_dev(&v) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(min(&v), 2.0);
        assert_eq!(max(&v), 9.0);
    }

    #[test]
    fn undefined_stats_are_nan() {
        assert!(mean(&[]).is_nan());
        assert!(std_dev(&[1.0]).is_nan());
        assert!(quantile(&[], 0.5).is_nan());
        assert!(min(&[]).is_nan());
    }

    #[test]
    fn quantiles_interpolate() {
        let v = [4.0, 1.0, 3.0, 2.0];
        assert!((quantile(&v, 0.25) - 1.75).abs() < 1e-12);
        assert!((quantile(&v, 0.5) - 2.5).abs() < 1e-12);
        assert!((quantile(&v, 0.75) - 3.25).abs() < 1e-12);
        assert_eq!(quantile(&v, 0.0), 1.0);
        assert_eq!(quantile(&v, 1.0), 4.0);
        assert_eq!(quantile(&[7.0], 0.25), 7.0);
    }

    #[test]
    fn pearson_perfect_and_inverse() {
        let x: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0].map(Some).to_vec();
        let y: Vec<Option<f64>> = [2.0, 4.0, 6.0, 8.0].map(Some).to_vec();
        let z: Vec<Option<f64>> = [4.0, 3.0, 2.0, 1.0].map(Some).to_vec();
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &z) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_skips_incomplete_pairs() {
        let x = vec![Some(1.0), None, Some(2.0), Some(3.0)];
        let y = vec![Some(1.0), Some(100.0), Some(2.0), Some(3.0)];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_constant_is_nan() {
        let x = vec![Some(1.0), Some(1.0), Some(1.0)];
        let y = vec![Some(1.0), Some(2.0), Some(3.0)];
        assert!(pearson(&x, &y).is_nan());
    }

    #[test]
    fn pearson_two_shared_rows() {
        let x = vec![Some(1.0), Some(2.0), None];
        let up = vec![Some(5.0), Some(9.0), Some(0.0)];
        let down = vec![Some(5.0), Some(1.0), Some(0.0)];
        let flat = vec![Some(5.0), Some(5.0), Some(0.0)];
        assert_eq!(pearson(&x, &up), 1.0);
        assert_eq!(pearson(&x, &down), -1.0);
        assert!(pearson(&x, &flat).is_nan());
        assert!(pearson(&[Some(1.0)], &[Some(2.0)]).is_nan());
    }

    #[test]
    fn complete_correlation_is_row_major() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let z = [4.0, 3.0, 2.0, 1.0];
        let m = complete_correlation(&[&x, &y, &z]).unwrap();
        assert_eq!(m.len(), 9);
        assert!((m[1] - 1.0).abs() < 1e-12);
        assert!((m[2] + 1.0).abs() < 1e-12);
        assert_eq!(m[5], m[7]);

        let flat = [1.0, 1.0, 1.0, 1.0];
        assert!(complete_correlation(&[&x, &flat]).is_none());
    }

    #[test]
    fn histogram_counts_every_value() {
        let v: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let h = histogram(&v, 10);
        assert_eq!(h.counts.len(), 10);
        assert_eq!(h.edges.len(), 11);
        assert_eq!(h.counts.iter().sum::<usize>(), 100);
        assert_eq!(h.counts, vec![10; 10]);
        assert!((h.bin_width() - 9.9).abs() < 1e-12);
    }

    #[test]
    fn histogram_constant_sample() {
        let h = histogram(&[3.0, 3.0, 3.0], 4);
        assert_eq!(h.edges.first().copied(), Some(2.5));
        assert_eq!(h.edges.last().copied(), Some(3.5));
        assert_eq!(h.counts, vec![0, 0, 3, 0]);
    }

    #[test]
    fn histogram_empty_and_zero_bins() {
        let h = histogram(&[], 0);
        assert_eq!(h.counts, vec![0]);
        assert_eq!(h.edges, vec![0.0, 1.0]);
    }

    #[test]
    fn histogram_survives_span_overflow() {
        let v = [-f64::MAX, 0.1 * f64::MAX, 0.7 * f64::MAX, f64::MAX];
        let h = histogram(&v, 10);
        assert!(h.edges.iter().all(|e| e.is_finite()));
        assert_eq!(h.edges.first().copied(), Some(-f64::MAX));
        assert_eq!(h.edges.last().copied(), Some(f64::MAX));
        assert_eq!(h.counts.iter().sum::<usize>(), 4);
        assert_eq!(h.counts[0], 1);
        assert_eq!(h.counts[5], 1);
        assert_eq!(h.counts[8], 1);
        assert_eq!(h.counts[9], 1);
    }
}
