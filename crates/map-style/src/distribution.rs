//! Cumulative distributions shared by the raster and contour classifiers.

/// Running share of the total weight: `cum[i] = cum[i-1] + w[i] / total`.
///
/// Returns `None` when the weights sum to zero (or are not finite), since
/// there is no distribution to speak of.
pub fn cumulative_proportions(weights: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return None;
    }

    let mut running = 0.0;
    Some(
        weights
            .iter()
            .map(|w| {
                running += w / total;
                running
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumulative_proportions() {
        let cum = cumulative_proportions(&[10.0, 30.0]).unwrap();
        assert_eq!(cum, vec![0.25, 1.0]);

        let cum = cumulative_proportions(&[1.0, 0.0, 3.0]).unwrap();
        assert_eq!(cum, vec![0.25, 0.25, 1.0]);
    }

    #[test]
    fn test_zero_total_has_no_distribution() {
        assert!(cumulative_proportions(&[]).is_none());
        assert!(cumulative_proportions(&[0.0, 0.0]).is_none());
    }
}
