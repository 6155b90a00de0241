//! View components for the FinChart application.

pub mod chart;
pub mod dashboard;
pub mod header;
pub mod theme;
