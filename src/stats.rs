//! Correlation statistics for the heatmap view.

/// Pearson correlation coefficient of two equal-length series.
///
/// Returns 0.0 for degenerate input (mismatched/empty series or a series with
/// zero variance) so the heatmap never has to annotate a NaN cell.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.is_empty() {
        return 0.0;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 { 0.0 } else { cov / denom }
}

/// Pairwise correlation matrix of the given columns.
pub fn correlation_matrix(columns: &[&[f64]]) -> Vec<Vec<f64>> {
    columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_correlated() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perfectly_anticorrelated() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [6.0, 4.0, 2.0];
        assert!((pearson(&xs, &ys) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_yields_zero() {
        let xs = [5.0, 5.0, 5.0];
        let ys = [1.0, 2.0, 3.0];
        assert_eq!(pearson(&xs, &ys), 0.0);
    }

    #[test]
    fn mismatched_lengths_yield_zero() {
        assert_eq!(pearson(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(pearson(&[], &[]), 0.0);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let pop: Vec<f64> = crate::data::REGIONS.iter().map(|r| r.population as f64).collect();
        let area: Vec<f64> = crate::data::REGIONS.iter().map(|r| r.area_km2).collect();
        let density: Vec<f64> = crate::data::REGIONS.iter().map(|r| r.density as f64).collect();
        let m = correlation_matrix(&[&pop, &area, &density]);

        assert_eq!(m.len(), 3);
        for i in 0..3 {
            assert!((m[i][i] - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert!((m[i][j] - m[j][i]).abs() < 1e-12);
                assert!(m[i][j] >= -1.0 - 1e-12 && m[i][j] <= 1.0 + 1e-12);
            }
        }
        // 인구수와 인구밀도는 강한 양의 상관관계를 가진다.
        assert!(m[0][2] > 0.9);
    }
}
