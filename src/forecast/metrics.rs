/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of squared differences between `actual` and `predicted`.
///
/// Pairs beyond the shorter slice are ignored; `None` when there are none.
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    let squared: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .collect();
    mean(&squared)
}

/// Mean of absolute differences between `actual` and `predicted`.
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    let absolute: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .collect();
    mean(&absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_errors() {
        let actual = [1.0, 2.0, 3.0, 4.0];
        let predicted = [1.0, 3.0, 1.0, 4.0];

        assert_eq!(mean_squared_error(&actual, &predicted), Some(1.25));
        assert_eq!(mean_absolute_error(&actual, &predicted), Some(0.75));
    }

    #[test]
    fn test_errors_without_pairs() {
        assert_eq!(mean_squared_error(&[], &[]), None);
        assert_eq!(mean_absolute_error(&[1.0], &[]), None);
    }
}
