//! Descriptive statistics over the present values of a column.

use std::collections::HashMap;

/// Sample standard deviation (n - 1 denominator).
///
/// `None` for fewer than two values.
pub(crate) fn calculate_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

    Some(variance.sqrt())
}

/// Quantile `q` (0.0 - 1.0) of sorted values with linear interpolation
/// between the closest ranks.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Most frequent value and its count. Ties go to the value seen first.
pub(crate) fn most_frequent<'a, I>(values: I) -> Option<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then_with(|| first_b.cmp(first_a))
        })
        .map(|(value, (count, _))| (value.to_string(), count))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== calculate_std tests ====================

    #[test]
    fn test_calculate_std_basic() {
        // Mean = 3, Variance = 10 / 4 = 2.5
        let std = calculate_std(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((std - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_std_single_value() {
        assert_eq!(calculate_std(&[5.0]), None);
        assert_eq!(calculate_std(&[]), None);
    }

    #[test]
    fn test_calculate_std_identical_values() {
        assert_eq!(calculate_std(&[5.0, 5.0, 5.0, 5.0]), Some(0.0));
    }

    // ==================== quantile tests ====================

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile(&sorted, 0.75), Some(3.25));
        assert_eq!(quantile(&sorted, 1.0), Some(4.0));
    }

    #[test]
    fn test_quantile_single_and_empty() {
        assert_eq!(quantile(&[7.0], 0.75), Some(7.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    // ==================== most_frequent tests ====================

    #[test]
    fn test_most_frequent() {
        let values = ["Patna", "Pune", "Pune", "Patna", "Goa", "Pune"];
        assert_eq!(most_frequent(values), Some(("Pune".to_string(), 3)));
    }

    #[test]
    fn test_most_frequent_tie_goes_to_first_seen() {
        let values = ["b", "a", "a", "b"];
        assert_eq!(most_frequent(values), Some(("b".to_string(), 2)));
        assert_eq!(most_frequent(Vec::<&str>::new()), None);
    }
}
