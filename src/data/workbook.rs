//! Workbook Module
//! A workbook is a directory of named CSV sheets. Handles sheet loading and
//! persistence using Polars.

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Workbook not found: {0}")]
    NotFound(PathBuf),
    #[error("Missing sheet '{sheet}' in workbook {workbook}")]
    MissingSheet { workbook: PathBuf, sheet: String },
    #[error("Failed to read sheet '{sheet}': {source}")]
    SheetRead {
        sheet: String,
        source: PolarsError,
    },
    #[error("Failed to write sheet '{sheet}': {source}")]
    SheetWrite {
        sheet: String,
        source: PolarsError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A directory of CSV sheets, read and written through Polars.
#[derive(Debug)]
pub struct Workbook {
    dir: PathBuf,
}

impl Workbook {
    /// Open an existing workbook directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, WorkbookError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(WorkbookError::NotFound(dir));
        }
        Ok(Self { dir })
    }

    /// Create a workbook directory (and parents) if it does not exist yet.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, WorkbookError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn sheet_path(&self, sheet: &str) -> PathBuf {
        self.dir.join(format!("{sheet}.csv"))
    }

    /// Check whether a sheet exists without reading it.
    pub fn has_sheet(&self, sheet: &str) -> bool {
        self.sheet_path(sheet).is_file()
    }

    /// Load one sheet into a DataFrame.
    pub fn read_sheet(&self, sheet: &str) -> Result<DataFrame, WorkbookError> {
        let path = self.sheet_path(sheet);
        if !path.is_file() {
            return Err(WorkbookError::MissingSheet {
                workbook: self.dir.clone(),
                sheet: sheet.to_string(),
            });
        }

        // Lazy scan, then collect; schema inference over the whole sheet
        // (these tables are small).
        LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .finish()
            .and_then(|lf| lf.collect())
            .map_err(|source| WorkbookError::SheetRead {
                sheet: sheet.to_string(),
                source,
            })
    }

    /// Write one sheet, replacing any previous content.
    pub fn write_sheet(&self, sheet: &str, df: &mut DataFrame) -> Result<(), WorkbookError> {
        let file = File::create(self.sheet_path(sheet))?;
        CsvWriter::new(file)
            .include_header(true)
            .finish(df)
            .map_err(|source| WorkbookError::SheetWrite {
                sheet: sheet.to_string(),
                source,
            })
    }
}
