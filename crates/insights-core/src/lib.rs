//! Domain layer for CX Insights.
//!
//! Holds the ticket / call / feedback models, value coercion helpers, the
//! shared KPI, rollup and Pareto computations used by both the batch
//! pipeline and the dashboard, plus settings and the error type.

pub mod data_processors;
pub mod error;
pub mod filters;
pub mod formatting;
pub mod metrics;
pub mod models;
pub mod pareto;
pub mod settings;
