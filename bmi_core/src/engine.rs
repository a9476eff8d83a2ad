//! Assessment engine.
//!
//! Runs one validated measurement through every calculation:
//! - BMI and its classification
//! - BMR and ideal weight range
//! - Diet plan for the resulting category

use crate::classification::classify_bmi;
use crate::diet::generate_diet_plan;
use crate::metrics::compute_metrics;
use crate::{ComputedMetrics, DietPlan, HistoryEntry, Measurement, Result};
use chrono::{NaiveDateTime, Timelike};

/// Full result of evaluating a measurement
#[derive(Clone, Debug, PartialEq)]
pub struct Assessment {
    pub measurement: Measurement,
    pub metrics: ComputedMetrics,
    pub advice: &'static str,
    pub diet_plan: DietPlan,
}

/// Evaluate a measurement
pub fn assess(measurement: &Measurement) -> Result<Assessment> {
    let metrics = compute_metrics(measurement)?;
    let classification = classify_bmi(metrics.bmi);
    let diet_plan = generate_diet_plan(
        classification.category,
        metrics.bmr,
        measurement.age_years(),
    );

    tracing::info!(
        "Assessed {}: BMI {} ({})",
        measurement.name(),
        metrics.bmi,
        metrics.category
    );

    Ok(Assessment {
        measurement: measurement.clone(),
        metrics,
        advice: classification.advice,
        diet_plan,
    })
}

impl Assessment {
    /// The record to persist for this assessment
    ///
    /// The timestamp is truncated to the minute, the resolution history
    /// is stored at.
    pub fn history_entry(&self, recorded_at: NaiveDateTime) -> HistoryEntry {
        let date = recorded_at
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(recorded_at);

        HistoryEntry {
            name: self.measurement.name().to_string(),
            date,
            weight_kg: self.measurement.weight_kg(),
            height_cm: self.measurement.height_cm(),
            bmi: self.metrics.bmi,
            category: self.metrics.category,
        }
    }
}
