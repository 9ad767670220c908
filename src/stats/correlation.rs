//! Correlation Module
//! Pearson correlation of summary columns against the macro indicators,
//! with a two-tailed significance test.

use polars::prelude::*;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::data::schema::{indicators, summary};
use crate::stats::StatsError;

/// Significance threshold for the correlation test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Pearson correlation of one summary column against one indicator.
#[derive(Debug, Clone)]
pub struct Correlation {
    pub column: String,
    pub indicator: String,
    pub r: f64,
    pub p_value: f64,
    pub is_significant: bool,
    /// Number of paired observations the coefficient is based on.
    pub n: usize,
}

/// Pearson r and its two-tailed p-value. Needs at least 3 paired points;
/// zero variance on either side yields NaN r and an insignificant result.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<(f64, f64), StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.len() < 3 {
        return Err(StatsError::InsufficientData {
            needed: 3,
            got: x.len(),
        });
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let covariance: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let var_x: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    let var_y: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return Ok((f64::NAN, f64::NAN));
    }
    let r = covariance / denom;

    // Two-tailed p-value via the t distribution with n - 2 degrees of
    // freedom; |r| = 1 pins p to 0.
    let df = n - 2.0;
    let p_value = if (1.0 - r * r) <= 0.0 {
        0.0
    } else {
        let t = r * (df / (1.0 - r * r)).sqrt();
        if let Ok(dist) = StudentsT::new(0.0, 1.0, df) {
            2.0 * (1.0 - dist.cdf(t.abs()))
        } else {
            f64::NAN
        }
    };

    Ok((r, p_value))
}

/// Correlate one summary column against gdp and cpi over the years where
/// the indicator is present.
pub fn indicator_correlations(
    summary_indicators: &DataFrame,
    column: &str,
) -> Result<Vec<Correlation>, StatsError> {
    let value_cast = summary_indicators.column(column)?.cast(&DataType::Float64)?;
    let values = value_cast.f64()?;

    let mut results = Vec::with_capacity(2);
    for indicator in [indicators::GDP, indicators::CPI] {
        let indicator_cast = summary_indicators
            .column(indicator)?
            .cast(&DataType::Float64)?;
        let indicator_values = indicator_cast.f64()?;

        let mut x: Vec<f64> = Vec::new();
        let mut y: Vec<f64> = Vec::new();
        for i in 0..summary_indicators.height() {
            if let (Some(v), Some(ind)) = (values.get(i), indicator_values.get(i)) {
                x.push(v);
                y.push(ind);
            }
        }

        let (r, p_value) = pearson(&x, &y)?;
        results.push(Correlation {
            column: column.to_string(),
            indicator: indicator.to_string(),
            r,
            p_value,
            is_significant: p_value <= SIGNIFICANCE_THRESHOLD,
            n: x.len(),
        });
    }

    Ok(results)
}
