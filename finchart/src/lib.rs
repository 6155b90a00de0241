//! FinChart - Dual-axis financial line charts.
//!
//! This library exposes the core components for testing.

pub mod app;
pub mod config;
pub mod custom;
pub mod demo;
pub mod message;
pub mod view;

// Re-export commonly used types
pub use app::{FinChart, Page};
pub use message::Message;
