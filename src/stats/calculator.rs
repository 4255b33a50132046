//! Statistics Calculator Module
//! Correlation and least-squares fit between the two measures.

use crate::data::DataPoint;
use statrs::statistics::Statistics;

/// Pearson correlation and regression line for a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub count: usize,
    pub mean_x: f64,
    pub mean_y: f64,
    /// Pearson coefficient
    pub r: f64,
    pub slope: f64,
    pub intercept: f64,
}

impl Correlation {
    /// Fitted y for a given x.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    pub fn r_squared(&self) -> f64 {
        self.r * self.r
    }
}

/// Handles statistical calculations over chart data.
pub struct StatsCalculator;

impl StatsCalculator {
    /// `None` when there are fewer than two points or either measure is constant.
    pub fn summarize(points: &[DataPoint]) -> Option<Correlation> {
        if points.len() < 2 {
            return None;
        }

        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();

        let mean_x = xs.iter().mean();
        let mean_y = ys.iter().mean();
        let var_x = xs.iter().variance();
        let std_x = xs.iter().std_dev();
        let std_y = ys.iter().std_dev();
        let covariance = xs.iter().covariance(ys.iter());

        if !(var_x > 0.0 && std_y > 0.0) {
            return None;
        }

        let slope = covariance / var_x;
        Some(Correlation {
            count: points.len(),
            mean_x,
            mean_y,
            r: covariance / (std_x * std_y),
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(pairs: &[(f64, f64)]) -> Vec<DataPoint> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| DataPoint::new(format!("P{i}"), format!("Point {i}"), x, y))
            .collect()
    }

    #[test]
    fn perfect_line_has_unit_correlation() {
        let fit = StatsCalculator::summarize(&points(&[(1.0, 3.0), (2.0, 5.0), (3.0, 7.0)])).unwrap();
        assert!((fit.r - 1.0).abs() < 1e-12);
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-9);
        assert_eq!(fit.count, 3);
    }

    #[test]
    fn negative_relationship() {
        let fit = StatsCalculator::summarize(&points(&[(1.0, 4.0), (2.0, 2.0), (3.0, 0.5)])).unwrap();
        assert!(fit.r < -0.9);
        assert!(fit.slope < 0.0);
    }

    #[test]
    fn degenerate_inputs_have_no_fit() {
        assert!(StatsCalculator::summarize(&points(&[(1.0, 2.0)])).is_none());
        assert!(StatsCalculator::summarize(&points(&[(1.0, 2.0), (1.0, 5.0)])).is_none());
        assert!(StatsCalculator::summarize(&points(&[(1.0, 2.0), (3.0, 2.0)])).is_none());
    }
}
