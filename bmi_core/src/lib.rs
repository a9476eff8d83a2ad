#![forbid(unsafe_code)]

//! Core domain model and business logic for the BMI calculator.
//!
//! This crate provides:
//! - Domain types (measurements, metrics, diet plans, history entries)
//! - Metric formulas (BMI, BMR, ideal weight range) and classification
//! - Diet plan templates
//! - History persistence, statistics, trend series and CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod input;
pub mod metrics;
pub mod classification;
pub mod diet;
pub mod engine;
pub mod history;
pub mod trend;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use input::RawMeasurement;
pub use metrics::{calculate_bmi, calculate_bmr, calculate_ideal_weight_range, compute_metrics};
pub use classification::{classify_bmi, Classification};
pub use diet::generate_diet_plan;
pub use engine::{assess, Assessment};
pub use history::HistoryStore;
pub use trend::{bmi_trend, BmiTrend};
pub use export::export_csv;
