//! Small statistics helpers shared by the reports
//!
//! Semantics follow the usual dataframe conventions: sample standard
//! deviation, linear-interpolated quantiles and trailing rolling means that
//! start producing values from the first observation.

use crate::models::PerformanceLevel;

/// Sum of amounts, saturating at `u64::MAX` instead of overflowing
pub fn total<I: IntoIterator<Item = u64>>(amounts: I) -> u64 {
    amounts.into_iter().fold(0, u64::saturating_add)
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1), 0 with fewer than two values
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Quantile with linear interpolation between closest ranks
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Trailing mean over `window` values; early positions use what is available
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean(&values[start..=i])
        })
        .collect()
}

/// Percentage change from `previous` to `current`; 0 when `previous` is 0
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// `part` as a percentage of `whole`; 0 when `whole` is 0
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Rate a value against a benchmark
pub fn performance_level(value: f64, benchmark: f64) -> PerformanceLevel {
    if value > benchmark * 1.2 {
        PerformanceLevel::VeryGood
    } else if value > benchmark {
        PerformanceLevel::Good
    } else if value > benchmark * 0.8 {
        PerformanceLevel::Fair
    } else {
        PerformanceLevel::NeedsImprovement
    }
}

/// First item with the largest key (ties keep the earliest)
pub(crate) fn first_max_by<T, F>(items: &[T], key: F) -> Option<&T>
where
    F: Fn(&T) -> f64,
{
    items.iter().fold(None, |best: Option<&T>, item| match best {
        Some(b) if key(item) <= key(b) => Some(b),
        _ => Some(item),
    })
}

/// First item with the smallest key (ties keep the earliest)
pub(crate) fn first_min_by<T, F>(items: &[T], key: F) -> Option<&T>
where
    F: Fn(&T) -> f64,
{
    items.iter().fold(None, |best: Option<&T>, item| match best {
        Some(b) if key(item) >= key(b) => Some(b),
        _ => Some(item),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_mean_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx(mean(&v), 5.0));
        // Sample std: sqrt(32 / 7)
        assert!(approx(std_dev(&v), (32.0f64 / 7.0).sqrt()));
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[3.0]), 0.0);
    }

    #[test]
    fn test_quantile_linear() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(quantile(&v, 0.25), 1.75));
        assert!(approx(quantile(&v, 0.5), 2.5));
        assert!(approx(quantile(&v, 0.75), 3.25));
        assert!(approx(quantile(&[4.0, 1.0, 3.0, 2.0], 0.5), 2.5));
        assert!(approx(quantile(&[7.0], 0.75), 7.0));
        assert_eq!(quantile(&[], 0.5), 0.0);
    }

    #[test]
    fn test_rolling_mean_min_periods_one() {
        let v = [10.0, 20.0, 30.0, 40.0];
        let ma = rolling_mean(&v, 3);
        assert_eq!(ma.len(), 4);
        assert!(approx(ma[0], 10.0));
        assert!(approx(ma[1], 15.0));
        assert!(approx(ma[2], 20.0));
        assert!(approx(ma[3], 30.0));
    }

    #[test]
    fn test_growth_rate() {
        assert!(approx(growth_rate(120.0, 100.0), 20.0));
        assert!(approx(growth_rate(50.0, 100.0), -50.0));
        assert_eq!(growth_rate(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_performance_level_thresholds() {
        assert_eq!(performance_level(130.0, 100.0), PerformanceLevel::VeryGood);
        assert_eq!(performance_level(120.0, 100.0), PerformanceLevel::Good);
        assert_eq!(performance_level(100.5, 100.0), PerformanceLevel::Good);
        assert_eq!(performance_level(100.0, 100.0), PerformanceLevel::Fair);
        assert_eq!(performance_level(81.0, 100.0), PerformanceLevel::Fair);
        assert_eq!(
            performance_level(80.0, 100.0),
            PerformanceLevel::NeedsImprovement
        );
    }

    #[test]
    fn test_first_extremes_keep_earliest() {
        let items = [("a", 1.0), ("b", 3.0), ("c", 3.0), ("d", 1.0)];
        assert_eq!(first_max_by(&items, |i| i.1).unwrap().0, "b");
        assert_eq!(first_min_by(&items, |i| i.1).unwrap().0, "a");
        let empty: [(&str, f64); 0] = [];
        assert!(first_max_by(&empty, |i| i.1).is_none());
    }

    #[test]
    fn test_total_saturates() {
        assert_eq!(total([1, 2, 3]), 6);
        assert_eq!(total(Vec::<u64>::new()), 0);
        assert_eq!(total([u64::MAX, 1, 1]), u64::MAX);
    }
}
