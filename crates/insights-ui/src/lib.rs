//! Terminal dashboard for CX Insights.
//!
//! Provides themes, the header, KPI cards and percentage bars, the table
//! panels, the month-filtered dashboard view, and the event loop built on
//! [`ratatui`].

pub mod app;
pub mod components;
pub mod dashboard;
pub mod table_view;
pub mod themes;

pub use insights_core as core;
