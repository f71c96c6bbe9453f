//! Data layer for CX Insights.
//!
//! Reads CSV exports, cleans them into typed tables, and writes the cleaned
//! CSVs, Pareto outputs and XLSX workbooks.

pub mod cleaner;
pub mod export;
pub mod pipeline;
pub mod reader;
pub mod records;
pub mod writer;
