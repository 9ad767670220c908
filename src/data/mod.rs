//! Data module - workbook I/O, aggregation and anonymization

pub mod aggregate;
pub mod anonymize;
pub mod loader;
pub mod schema;
pub mod workbook;

pub use aggregate::Aggregator;
pub use anonymize::{encode_dataset, EncodeError, NameCodes};
pub use loader::{DatasetError, HutDataset};
pub use workbook::{Workbook, WorkbookError};
