//! Name Anonymizer Module
//! Replaces participant names in the top-10 sheets with dense integer codes
//! and persists both the mapping and the re-encoded workbook.

use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::data::loader::{DatasetError, HutDataset};
use crate::data::schema::{name_codes, sheet, top_beer, top_schnapps, workbook};
use crate::data::workbook::{Workbook, WorkbookError};

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Workbook(#[from] WorkbookError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Name not in mapping: {0}")]
    NameNotInMapping(String),
}

/// Bijection between names and dense integer codes, assigned in
/// first-appearance order across the top-10 sheets. Deterministic for a
/// fixed input row order.
pub struct NameCodes {
    names: Vec<String>,
    codes: HashMap<String, i64>,
}

impl NameCodes {
    /// Collect ordered-unique names from the beer leaderboard, then append
    /// ordered-unique schnapps names not already present.
    pub fn from_frames(
        top_beer_df: &DataFrame,
        top_schnapps_df: &DataFrame,
    ) -> Result<Self, EncodeError> {
        let mut names: Vec<String> = Vec::new();
        let mut codes: HashMap<String, i64> = HashMap::new();

        for (df, column) in [
            (top_beer_df, top_beer::NAME),
            (top_schnapps_df, top_schnapps::NAME),
        ] {
            let series = df.column(column)?.as_materialized_series();
            let ca = series.str()?;
            for name in ca.into_iter().flatten() {
                if !codes.contains_key(name) {
                    codes.insert(name.to_string(), names.len() as i64);
                    names.push(name.to_string());
                }
            }
        }

        Ok(Self { names, codes })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Code assigned to a name.
    pub fn code(&self, name: &str) -> Option<i64> {
        self.codes.get(name).copied()
    }

    /// Name behind a code.
    pub fn name(&self, code: i64) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
    }

    /// Mapping as a frame: index column = code, value column = name.
    pub fn to_frame(&self) -> Result<DataFrame, EncodeError> {
        let codes: Vec<i64> = (0..self.names.len() as i64).collect();
        let df = DataFrame::new(vec![
            Column::new(name_codes::CODE.into(), codes),
            Column::new(name_codes::NAME.into(), self.names.clone()),
        ])?;
        Ok(df)
    }

    /// Rewrite the name column of a leaderboard frame to integer codes.
    pub fn encode_names(&self, df: &DataFrame, column: &str) -> Result<DataFrame, EncodeError> {
        let series = df.column(column)?.as_materialized_series();
        let ca = series.str()?;

        let encoded: Vec<i64> = ca
            .into_iter()
            .map(|v| match v {
                Some(name) => self
                    .code(name)
                    .ok_or_else(|| EncodeError::NameNotInMapping(name.to_string())),
                None => Err(EncodeError::NameNotInMapping(String::from("<null>"))),
            })
            .collect::<Result<_, _>>()?;

        let mut out = df.clone();
        out.with_column(Column::new(column.into(), encoded))?;
        Ok(out)
    }
}

/// Anonymize a dataset directory: build the name mapping from the raw
/// workbook, persist it, and write the re-encoded workbook. The raw source
/// workbook is never touched; prior output is overwritten.
pub fn encode_dataset(dataset_dir: &Path) -> Result<NameCodes, EncodeError> {
    let ds = HutDataset::load(dataset_dir, false)?;
    let codes = NameCodes::from_frames(&ds.top_beer, &ds.top_schnapps)?;

    let mapping_book = Workbook::create(dataset_dir.join(workbook::NAME_CODES))?;
    mapping_book.write_sheet(sheet::NAMES, &mut codes.to_frame()?)?;

    let mut encoded_beer = codes.encode_names(&ds.top_beer, top_beer::NAME)?;
    let mut encoded_schnapps = codes.encode_names(&ds.top_schnapps, top_schnapps::NAME)?;
    let mut drinks_df = ds.drinks.clone();

    let encoded_book = Workbook::create(dataset_dir.join(workbook::ENCODED))?;
    encoded_book.write_sheet(sheet::DRINKS, &mut drinks_df)?;
    encoded_book.write_sheet(sheet::TOP_BEER, &mut encoded_beer)?;
    encoded_book.write_sheet(sheet::TOP_SCHNAPPS, &mut encoded_schnapps)?;

    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beer_frame(names: &[&str]) -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                top_beer::YEAR.into(),
                vec![2020i64; names.len()],
            ),
            Column::new(
                top_beer::NAME.into(),
                names.iter().map(|n| n.to_string()).collect::<Vec<_>>(),
            ),
            Column::new(top_beer::BEER.into(), vec![1.0f64; names.len()]),
            Column::new(top_beer::NON_ALCOHOLIC.into(), vec![0.0f64; names.len()]),
        ])
        .unwrap()
    }

    fn schnapps_frame(names: &[&str]) -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                top_schnapps::YEAR.into(),
                vec![2020i64; names.len()],
            ),
            Column::new(
                top_schnapps::NAME.into(),
                names.iter().map(|n| n.to_string()).collect::<Vec<_>>(),
            ),
            Column::new(top_schnapps::SCHNAPPS.into(), vec![1.0f64; names.len()]),
        ])
        .unwrap()
    }

    #[test]
    fn codes_follow_first_appearance_order() {
        let beer = beer_frame(&["Anna", "Bob"]);
        let schnapps = schnapps_frame(&["Bob", "Carl"]);

        let codes = NameCodes::from_frames(&beer, &schnapps).unwrap();

        assert_eq!(codes.len(), 3);
        assert_eq!(codes.code("Anna"), Some(0));
        assert_eq!(codes.code("Bob"), Some(1));
        assert_eq!(codes.code("Carl"), Some(2));
    }

    #[test]
    fn round_trip_is_lossless() {
        let beer = beer_frame(&["Anna", "Bob", "Anna"]);
        let schnapps = schnapps_frame(&["Bob", "Carl"]);
        let codes = NameCodes::from_frames(&beer, &schnapps).unwrap();

        for name in ["Anna", "Bob", "Carl"] {
            let code = codes.code(name).unwrap();
            assert_eq!(codes.name(code), Some(name));
        }
        assert_eq!(codes.name(99), None);
    }

    #[test]
    fn encode_rewrites_name_column() {
        let beer = beer_frame(&["Anna", "Bob"]);
        let schnapps = schnapps_frame(&["Bob", "Carl"]);
        let codes = NameCodes::from_frames(&beer, &schnapps).unwrap();

        let encoded_beer = codes.encode_names(&beer, top_beer::NAME).unwrap();
        let encoded_schnapps = codes.encode_names(&schnapps, top_schnapps::NAME).unwrap();

        let beer_codes: Vec<i64> = encoded_beer
            .column(top_beer::NAME)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(beer_codes, vec![0, 1]);

        let schnapps_codes: Vec<i64> = encoded_schnapps
            .column(top_schnapps::NAME)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(schnapps_codes, vec![1, 2]);

        // Shape and the remaining columns are untouched.
        assert_eq!(encoded_beer.shape(), beer.shape());
        assert!(encoded_beer
            .column(top_beer::BEER)
            .unwrap()
            .as_materialized_series()
            .equals(beer.column(top_beer::BEER).unwrap().as_materialized_series()));
    }

    #[test]
    fn unknown_name_is_an_error() {
        let beer = beer_frame(&["Anna"]);
        let schnapps = schnapps_frame(&[]);
        let codes = NameCodes::from_frames(&beer, &schnapps).unwrap();

        let stranger = beer_frame(&["Zoe"]);
        let err = codes.encode_names(&stranger, top_beer::NAME).unwrap_err();
        assert!(matches!(err, EncodeError::NameNotInMapping(name) if name == "Zoe"));
    }
}
