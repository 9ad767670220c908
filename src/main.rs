//! hut-stats - Hut beverage bookkeeping analysis
//!
//! Batch run over a dataset directory: report frame shapes, indicator
//! correlations and a one-year extrapolation of every summary volume.
//! `hut-stats <dir> encode` anonymizes the raw workbook instead.

use anyhow::{Context, Result};
use log::info;
use polars::prelude::*;
use std::path::PathBuf;

use hut_stats::data::schema::summary;
use hut_stats::data::{encode_dataset, HutDataset};
use hut_stats::stats::{indicator_correlations, train_predict, LinearRegression};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let dataset_dir = PathBuf::from(args.next().unwrap_or_else(|| String::from("./dataset")));

    if args.next().as_deref() == Some("encode") {
        let codes = encode_dataset(&dataset_dir)
            .with_context(|| format!("encoding dataset at {}", dataset_dir.display()))?;
        info!("encoded {} names", codes.len());
        return Ok(());
    }

    let ds = HutDataset::load(&dataset_dir, true)
        .with_context(|| format!("loading dataset at {}", dataset_dir.display()))?;

    for (name, (rows, cols)) in [
        "drinks",
        "top_beer",
        "top_schnapps",
        "non_alcoholic",
        "alcoholic",
        "summary",
        "summary_indicators",
    ]
    .iter()
    .zip(ds.shapes())
    {
        println!("{name}: {rows} rows x {cols} columns");
    }

    let year_cast = ds
        .summary
        .column(summary::YEAR)?
        .cast(&DataType::Int64)?;
    let next_year = year_cast
        .i64()?
        .max()
        .context("summary table has no years")?
        + 1;

    for column in summary::VOLUME_COLUMNS {
        for c in indicator_correlations(&ds.summary_indicators, column)
            .with_context(|| format!("correlating {column}"))?
        {
            println!(
                "{column} vs {}: r = {:.3}, p = {:.4}{}",
                c.indicator,
                c.r,
                c.p_value,
                if c.is_significant { " *" } else { "" }
            );
        }

        let mut model = LinearRegression::new();
        let forecast = train_predict(&mut model, &ds.summary, column, next_year)
            .with_context(|| format!("extrapolating {column}"))?;
        if let Some((slope, intercept)) = model.coefficients() {
            info!("{column}: slope {slope:.3}, intercept {intercept:.3}");
        }
        println!("{column} {next_year}: {:.2} l", forecast.prediction);
    }

    Ok(())
}
