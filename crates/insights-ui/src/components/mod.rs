pub mod header;
pub mod kpi_cards;
pub mod progress_bar;
