//! Dataset Loader Module
//! Loads the bookkeeping workbooks, validates schemas and builds the derived
//! frames. Loading is pure: the returned dataset is recomputed from the
//! files on every call, nothing is written.

use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

use crate::data::aggregate::{AggregateError, Aggregator};
use crate::data::schema::{drinks, indicators, sheet, top_beer, top_schnapps, workbook};
use crate::data::workbook::{Workbook, WorkbookError};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error(transparent)]
    Workbook(#[from] WorkbookError),
    #[error("Missing column '{column}' in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// All frames of one dataset load: the three raw sheets, the category
/// split, and the year-indexed summaries.
#[derive(Debug)]
pub struct HutDataset {
    /// Drinks sheet, one row per (year, category), rounded.
    pub drinks: DataFrame,
    /// Top-10 beer drinkers leaderboard, rounded.
    pub top_beer: DataFrame,
    /// Top-10 schnapps drinkers leaderboard, rounded.
    pub top_schnapps: DataFrame,
    /// Drinks rows with the non-alcoholic category label.
    pub non_alcoholic: DataFrame,
    /// Drinks rows with any other category label.
    pub alcoholic: DataFrame,
    /// Per-year converted sums, one row per distinct year, ascending.
    pub summary: DataFrame,
    /// Summary left-joined with the gdp/cpi indicators.
    pub summary_indicators: DataFrame,
}

impl HutDataset {
    /// Load a dataset directory. `encoded` selects the anonymized workbook
    /// over the raw one.
    pub fn load(dataset_dir: &Path, encoded: bool) -> Result<Self, DatasetError> {
        let book_name = if encoded {
            workbook::ENCODED
        } else {
            workbook::RAW
        };
        let book = Workbook::open(dataset_dir.join(book_name))?;

        let drinks_df = Self::load_sheet(&book, sheet::DRINKS, &drinks::REQUIRED)?;
        let top_beer_df = Self::load_sheet(&book, sheet::TOP_BEER, &top_beer::REQUIRED)?;
        let top_schnapps_df =
            Self::load_sheet(&book, sheet::TOP_SCHNAPPS, &top_schnapps::REQUIRED)?;

        let indices = Workbook::open(dataset_dir.join(workbook::INDICES))?;
        let mut indicators_df =
            Self::load_sheet(&indices, sheet::INDICATORS, &indicators::REQUIRED)?;
        indicators_df.rename(indicators::GDP_SOURCE, indicators::GDP.into())?;
        indicators_df.rename(indicators::CPI_SOURCE, indicators::CPI.into())?;

        let (non_alcoholic, alcoholic) = Aggregator::split_by_category(&drinks_df)?;
        let summary = Aggregator::yearly_summary(
            &alcoholic,
            &non_alcoholic,
            &top_beer_df,
            &top_schnapps_df,
        )?;
        let summary_indicators = Aggregator::join_indicators(&summary, &indicators_df)?;

        Ok(Self {
            drinks: drinks_df,
            top_beer: top_beer_df,
            top_schnapps: top_schnapps_df,
            non_alcoholic,
            alcoholic,
            summary,
            summary_indicators,
        })
    }

    /// (rows, columns) of every frame, in load order.
    pub fn shapes(&self) -> [(usize, usize); 7] {
        [
            self.drinks.shape(),
            self.top_beer.shape(),
            self.top_schnapps.shape(),
            self.non_alcoholic.shape(),
            self.alcoholic.shape(),
            self.summary.shape(),
            self.summary_indicators.shape(),
        ]
    }

    fn load_sheet(
        book: &Workbook,
        sheet_name: &str,
        required: &[&str],
    ) -> Result<DataFrame, DatasetError> {
        let df = book.read_sheet(sheet_name)?;
        Self::validate_columns(&df, sheet_name, required)?;
        Self::round_floats(&df)
    }

    /// A missing column is a load-time error, not a late runtime surprise.
    fn validate_columns(
        df: &DataFrame,
        sheet_name: &str,
        required: &[&str],
    ) -> Result<(), DatasetError> {
        let present = df.get_column_names();
        for column in required {
            if !present.iter().any(|c| c.as_str() == *column) {
                return Err(DatasetError::MissingColumn {
                    sheet: sheet_name.to_string(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Round every float column to 2 decimal digits.
    fn round_floats(df: &DataFrame) -> Result<DataFrame, DatasetError> {
        let mut rounded = df.clone();

        let float_columns: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|c| matches!(c.dtype(), DataType::Float32 | DataType::Float64))
            .map(|c| c.name().to_string())
            .collect();

        for name in float_columns {
            let cast = rounded.column(&name)?.cast(&DataType::Float64)?;
            let ca = cast.f64()?;
            let values: Vec<Option<f64>> = ca
                .into_iter()
                .map(|v| v.map(|x| (x * 100.0).round() / 100.0))
                .collect();
            rounded.with_column(Column::new(name.as_str().into(), values))?;
        }

        Ok(rounded)
    }
}
