//! hut-stats - Hut beverage bookkeeping analysis
//!
//! Loads the bookkeeping workbooks, builds the yearly consumption summary
//! joined with macro indicators, anonymizes participant names, and
//! extrapolates one future year with a linear model.

pub mod data;
pub mod stats;
