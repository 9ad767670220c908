//! Stats module - regression and indicator correlation

use polars::prelude::PolarsError;
use thiserror::Error;

mod correlation;
mod regression;

pub use correlation::{indicator_correlations, pearson, Correlation, SIGNIFICANCE_THRESHOLD};
pub use regression::{train_predict, Forecast, LinearRegression, Regressor};

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Degenerate fit: {distinct} distinct x value(s), need at least 2")]
    DegenerateFit { distinct: usize },
    #[error("Input length mismatch: {x} x values vs {y} y values")]
    LengthMismatch { x: usize, y: usize },
    #[error("Model used before fitting")]
    NotFitted,
    #[error("Too few paired observations: {got}, need at least {needed}")]
    InsufficientData { needed: usize, got: usize },
}
