//! Aggregation Module
//! Handles the category split and the year-indexed summary table.

use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

use crate::data::schema::{drinks, indicators, summary, units};

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Builds the derived frames of the dataset.
pub struct Aggregator;

impl Aggregator {
    /// Split the drinks frame into (non-alcoholic, alcoholic) subsets by
    /// exact category-label match. The subsets partition the input rows.
    pub fn split_by_category(
        drinks_df: &DataFrame,
    ) -> Result<(DataFrame, DataFrame), AggregateError> {
        let non_alcoholic = drinks_df
            .clone()
            .lazy()
            .filter(col(drinks::CATEGORY).eq(lit(drinks::NON_ALCOHOLIC_LABEL)))
            .collect()?;

        // A null category is not the non-alcoholic label, so the row stays
        // in the beer subset; a bare neq would drop it from both.
        let alcoholic = drinks_df
            .clone()
            .lazy()
            .filter(
                col(drinks::CATEGORY)
                    .neq(lit(drinks::NON_ALCOHOLIC_LABEL))
                    .or(col(drinks::CATEGORY).is_null()),
            )
            .collect()?;

        Ok((non_alcoholic, alcoholic))
    }

    /// Sum `value_col` per year and scale by `liters_per_unit`.
    /// Null years and null values are skipped.
    fn yearly_liters(
        df: &DataFrame,
        year_col: &str,
        value_col: &str,
        liters_per_unit: f64,
    ) -> Result<BTreeMap<i64, f64>, AggregateError> {
        let year_cast = df.column(year_col)?.cast(&DataType::Int64)?;
        let years = year_cast.i64()?;
        let value_cast = df.column(value_col)?.cast(&DataType::Float64)?;
        let values = value_cast.f64()?;

        let mut sums: BTreeMap<i64, f64> = BTreeMap::new();
        for i in 0..df.height() {
            if let (Some(year), Some(value)) = (years.get(i), values.get(i)) {
                *sums.entry(year).or_insert(0.0) += value;
            }
        }

        for total in sums.values_mut() {
            *total *= liters_per_unit;
        }

        Ok(sums)
    }

    /// Build the year-indexed summary frame from the two drink subsets and
    /// the two top-10 leaderboards. One row per distinct year across all
    /// four inputs, ascending; a metric with no rows for a year stays null.
    pub fn yearly_summary(
        alcoholic: &DataFrame,
        non_alcoholic: &DataFrame,
        top_beer_df: &DataFrame,
        top_schnapps_df: &DataFrame,
    ) -> Result<DataFrame, AggregateError> {
        use crate::data::schema::{top_beer, top_schnapps};

        let beer_total =
            Self::yearly_liters(alcoholic, drinks::YEAR, drinks::BOXES, units::LITERS_PER_BOX)?;
        let non_alcoholic_total = Self::yearly_liters(
            non_alcoholic,
            drinks::YEAR,
            drinks::BOXES,
            units::LITERS_PER_BOX,
        )?;
        let beer_top10 = Self::yearly_liters(
            top_beer_df,
            top_beer::YEAR,
            top_beer::BEER,
            units::LITERS_PER_GLASS,
        )?;
        let non_alcoholic_top10 = Self::yearly_liters(
            top_beer_df,
            top_beer::YEAR,
            top_beer::NON_ALCOHOLIC,
            units::LITERS_PER_GLASS,
        )?;
        let schnapps_top10 = Self::yearly_liters(
            top_schnapps_df,
            top_schnapps::YEAR,
            top_schnapps::SCHNAPPS,
            units::LITERS_PER_SHOT,
        )?;

        let mut years: BTreeSet<i64> = BTreeSet::new();
        for sums in [
            &beer_total,
            &non_alcoholic_total,
            &beer_top10,
            &non_alcoholic_top10,
            &schnapps_top10,
        ] {
            years.extend(sums.keys().copied());
        }
        let years: Vec<i64> = years.into_iter().collect();

        let metric = |sums: &BTreeMap<i64, f64>| -> Vec<Option<f64>> {
            years.iter().map(|y| sums.get(y).copied()).collect()
        };

        let df = DataFrame::new(vec![
            Column::new(summary::YEAR.into(), years.clone()),
            Column::new(summary::BEER_TOTAL.into(), metric(&beer_total)),
            Column::new(
                summary::NON_ALCOHOLIC_TOTAL.into(),
                metric(&non_alcoholic_total),
            ),
            Column::new(summary::BEER_TOP10.into(), metric(&beer_top10)),
            Column::new(
                summary::NON_ALCOHOLIC_TOP10.into(),
                metric(&non_alcoholic_top10),
            ),
            Column::new(summary::SCHNAPPS_TOP10.into(), metric(&schnapps_top10)),
        ])?;

        Ok(df)
    }

    /// Left-join the summary against the indicator frame on year. Years with
    /// no indicator row keep null gdp/cpi.
    pub fn join_indicators(
        summary_df: &DataFrame,
        indicators_df: &DataFrame,
    ) -> Result<DataFrame, AggregateError> {
        let ind_year_cast = indicators_df.column(indicators::YEAR)?.cast(&DataType::Int64)?;
        let ind_years = ind_year_cast.i64()?;
        let gdp_cast = indicators_df.column(indicators::GDP)?.cast(&DataType::Float64)?;
        let gdp = gdp_cast.f64()?;
        let cpi_cast = indicators_df.column(indicators::CPI)?.cast(&DataType::Float64)?;
        let cpi = cpi_cast.f64()?;

        let mut by_year: HashMap<i64, (Option<f64>, Option<f64>)> = HashMap::new();
        for i in 0..indicators_df.height() {
            if let Some(year) = ind_years.get(i) {
                by_year.insert(year, (gdp.get(i), cpi.get(i)));
            }
        }

        let year_cast = summary_df.column(summary::YEAR)?.cast(&DataType::Int64)?;
        let years = year_cast.i64()?;

        let mut gdp_col: Vec<Option<f64>> = Vec::with_capacity(summary_df.height());
        let mut cpi_col: Vec<Option<f64>> = Vec::with_capacity(summary_df.height());
        for i in 0..summary_df.height() {
            let row = years.get(i).and_then(|y| by_year.get(&y).copied());
            gdp_col.push(row.and_then(|(g, _)| g));
            cpi_col.push(row.and_then(|(_, c)| c));
        }

        let mut joined = summary_df.clone();
        joined.with_column(Column::new(indicators::GDP.into(), gdp_col))?;
        joined.with_column(Column::new(indicators::CPI.into(), cpi_col))?;

        Ok(joined)
    }
}
