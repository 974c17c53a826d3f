//! Stateless numeric primitives shared by the statistics engine and the chart builder.
//!
//! All functions take plain slices with missing values already removed.

use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::HashMap;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    if is_constant(values) {
        return Some(0.0);
    }
    let mean = mean(values)?;
    let sum_squared_diff: f64 = values.iter().map(|&value| (value - mean).powi(2)).sum();
    Some((sum_squared_diff / (values.len() - 1) as f64).sqrt())
}

/// True when every value equals the first. Exact comparison on the raw
/// values, since deviations from a rounded mean are never exactly zero.
pub fn is_constant(values: &[f64]) -> bool {
    values.split_first().map_or(true, |(first, rest)| rest.iter().all(|v| v == first))
}

/// Quantile of ascending `sorted` values, interpolating linearly between the
/// two closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

pub fn sort_values(values: &mut [f64]) {
    values.sort_by(f64::total_cmp);
}

/// Most frequent value; ties go to the smallest value.
pub fn numeric_mode(values: &[f64]) -> Option<f64> {
    let mut counts: HashMap<OrderedFloat<f64>, usize> = HashMap::new();
    for &value in values {
        *counts.entry(OrderedFloat(value)).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|(a_value, a_count), (b_value, b_count)| {
            a_count.cmp(b_count).then_with(|| b_value.cmp(a_value))
        })
        .map(|(value, _)| value.into_inner())
}

/// Pearson correlation of paired samples.
///
/// `None` with fewer than two pairs or when either side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    if is_constant(xs) || is_constant(ys) {
        return None;
    }
    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    let r = covariance / (var_x.sqrt() * var_y.sqrt());
    Some(r.clamp(-1.0, 1.0))
}

/// Minimum, quartiles and maximum of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// Computes the summary from ascending values.
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        Some(FiveNumberSummary {
            min: *sorted.first()?,
            q1: quantile_sorted(sorted, 0.25)?,
            median: quantile_sorted(sorted, 0.5)?,
            q3: quantile_sorted(sorted, 0.75)?,
            max: *sorted.last()?,
        })
    }

    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        sort_values(&mut values);
        Self::from_sorted(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn sample_std_dev_uses_n_minus_one() {
        let result = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((result - 2.138089935299395).abs() < 1e-12);
        assert_eq!(sample_std_dev(&[1.0]), None);
    }

    #[test]
    fn quantile_interpolates_between_ranks() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn numeric_mode_breaks_ties_with_smallest_value() {
        assert_eq!(numeric_mode(&[3.0, 1.0, 3.0, 1.0, 2.0]), Some(1.0));
        assert_eq!(numeric_mode(&[5.0, 4.0, 5.0]), Some(5.0));
        assert_eq!(numeric_mode(&[]), None);
    }

    #[test]
    fn pearson_detects_linear_relationships() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert!((pearson(&xs, &[2.0, 4.0, 6.0, 8.0]).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &[8.0, 6.0, 4.0, 2.0]).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_with_constant_side_is_undefined() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
    }

    #[test]
    fn repeated_decimal_values_have_no_variance() {
        let ramp: Vec<f64> = (0..24).map(f64::from).collect();
        for value in [0.1, 0.3, 1.3, 2.3, 15.6] {
            for n in [3, 10, 24, 1000] {
                let constant = vec![value; n];
                assert_eq!(sample_std_dev(&constant), Some(0.0), "{value} x {n}");
                assert_eq!(pearson(&constant, &constant), None, "{value} x {n}");
                assert_eq!(pearson(&ramp[..n.min(24)], &constant[..n.min(24)]), None);
            }
        }
        assert!(is_constant(&[]));
        assert!(!is_constant(&[0.1, 0.1, 0.2]));
    }

    #[test]
    fn five_number_summary_is_ordered() {
        let summary = FiveNumberSummary::from_values(vec![7.0, 1.0, 3.0, 5.0, 9.0]).unwrap();
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q1, 3.0);
        assert_eq!(summary.median, 5.0);
        assert_eq!(summary.q3, 7.0);
        assert_eq!(summary.max, 9.0);
        assert_eq!(FiveNumberSummary::from_values(Vec::new()), None);
    }
}
