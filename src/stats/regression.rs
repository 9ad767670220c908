//! Regression Module
//! Ordinary least squares on one feature, used to extrapolate a summary
//! column one year ahead.

use polars::prelude::*;

use crate::data::schema::summary;
use crate::stats::StatsError;

/// A fit-and-predict model over one feature.
pub trait Regressor {
    fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<(), StatsError>;
    fn predict(&self, x: f64) -> Result<f64, StatsError>;
}

/// Closed-form ordinary least squares line. Recovers perfectly linear data
/// exactly; extrapolation distance is unbounded by design.
#[derive(Debug, Default, Clone)]
pub struct LinearRegression {
    coefficients: Option<(f64, f64)>, // (slope, intercept)
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted (slope, intercept), if any.
    pub fn coefficients(&self) -> Option<(f64, f64)> {
        self.coefficients
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, x: &[f64], y: &[f64]) -> Result<(), StatsError> {
        if x.len() != y.len() {
            return Err(StatsError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }

        let mut distinct = x.to_vec();
        distinct.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        distinct.dedup();
        if distinct.len() < 2 {
            return Err(StatsError::DegenerateFit {
                distinct: distinct.len(),
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
        let variance: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();

        let slope = covariance / variance;
        let intercept = mean_y - slope * mean_x;
        self.coefficients = Some((slope, intercept));

        Ok(())
    }

    fn predict(&self, x: f64) -> Result<f64, StatsError> {
        let (slope, intercept) = self.coefficients.ok_or(StatsError::NotFitted)?;
        Ok(slope * x + intercept)
    }
}

/// Result of fitting a summary column and extrapolating one year.
#[derive(Debug, Clone)]
pub struct Forecast {
    /// Point prediction for the requested year.
    pub prediction: f64,
    /// Fitted line over all observed years plus the requested year,
    /// ascending.
    pub line: Vec<(i64, f64)>,
}

/// Fit `model` on (year, column) pairs of the summary frame and predict
/// `next_year`. Rows where the column is null are skipped; fewer than 2
/// remaining distinct years fails with a degenerate-fit error.
pub fn train_predict(
    model: &mut dyn Regressor,
    summary_df: &DataFrame,
    column: &str,
    next_year: i64,
) -> Result<Forecast, StatsError> {
    let year_cast = summary_df.column(summary::YEAR)?.cast(&DataType::Int64)?;
    let years = year_cast.i64()?;
    let value_cast = summary_df.column(column)?.cast(&DataType::Float64)?;
    let values = value_cast.f64()?;

    let mut pairs: Vec<(i64, f64)> = Vec::with_capacity(summary_df.height());
    for i in 0..summary_df.height() {
        if let (Some(year), Some(value)) = (years.get(i), values.get(i)) {
            pairs.push((year, value));
        }
    }
    pairs.sort_by_key(|(year, _)| *year);

    let x: Vec<f64> = pairs.iter().map(|(year, _)| *year as f64).collect();
    let y: Vec<f64> = pairs.iter().map(|(_, value)| *value).collect();
    model.fit(&x, &y)?;

    let prediction = model.predict(next_year as f64)?;

    let mut line_years: Vec<i64> = pairs.iter().map(|(year, _)| *year).collect();
    line_years.push(next_year);
    line_years.sort_unstable();
    line_years.dedup();

    let line = line_years
        .into_iter()
        .map(|year| model.predict(year as f64).map(|value| (year, value)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Forecast { prediction, line })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_frame(rows: &[(i64, f64)]) -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                summary::YEAR.into(),
                rows.iter().map(|r| r.0).collect::<Vec<_>>(),
            ),
            Column::new(
                summary::BEER_TOTAL.into(),
                rows.iter().map(|r| r.1).collect::<Vec<_>>(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn recovers_perfect_line_exactly() {
        let df = summary_frame(&[(2018, 4036.0), (2019, 4038.0)]);
        let mut model = LinearRegression::new();

        let forecast = train_predict(&mut model, &df, summary::BEER_TOTAL, 2020).unwrap();

        assert_eq!(forecast.prediction, 4040.0);
        assert_eq!(
            forecast.line,
            vec![(2018, 4036.0), (2019, 4038.0), (2020, 4040.0)]
        );
        assert_eq!(model.coefficients(), Some((2.0, 0.0)));
    }

    #[test]
    fn line_is_ascending_with_unsorted_input() {
        let df = summary_frame(&[(2021, 30.0), (2019, 10.0), (2020, 20.0)]);
        let mut model = LinearRegression::new();

        let forecast = train_predict(&mut model, &df, summary::BEER_TOTAL, 2022).unwrap();

        let years: Vec<i64> = forecast.line.iter().map(|(year, _)| *year).collect();
        assert_eq!(years, vec![2019, 2020, 2021, 2022]);
        assert!((forecast.prediction - 40.0).abs() < 1e-9);
    }

    #[test]
    fn single_year_is_degenerate() {
        let df = summary_frame(&[(2020, 100.0)]);
        let mut model = LinearRegression::new();

        let err = train_predict(&mut model, &df, summary::BEER_TOTAL, 2021).unwrap_err();
        assert!(matches!(err, StatsError::DegenerateFit { distinct: 1 }));
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = LinearRegression::new();
        assert!(model.coefficients().is_none());
        assert!(matches!(model.predict(2020.0), Err(StatsError::NotFitted)));
    }

    #[test]
    fn far_extrapolation_is_unbounded() {
        let df = summary_frame(&[(2018, 0.0), (2019, 1.0)]);
        let mut model = LinearRegression::new();

        let forecast = train_predict(&mut model, &df, summary::BEER_TOTAL, 3000).unwrap();
        assert!((forecast.prediction - 982.0).abs() < 1e-6);
    }
}
