//! Health metric formulas.
//!
//! - BMI: weight (kg) / height (m)²
//! - BMR: Mifflin-St Jeor equation
//! - Ideal weight range: the weights that give BMI 18.5 and 24.9

use crate::classification::classify_bmi;
use crate::types::is_positive;
use crate::{ComputedMetrics, Error, Gender, Measurement, Result};

const IDEAL_BMI_LOW: f64 = 18.5;
const IDEAL_BMI_HIGH: f64 = 24.9;

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn height_m_squared(height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    height_m * height_m
}

/// Body mass index rounded to 2 decimals
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Result<f64> {
    if !is_positive(weight_kg) || !is_positive(height_cm) {
        return Err(Error::invalid_input(
            "Weight and height must be positive values.",
        ));
    }

    let bmi = round_to(weight_kg / height_m_squared(height_cm), 2);
    if !bmi.is_finite() {
        return Err(Error::invalid_input(
            "Weight and height are out of range for a BMI calculation.",
        ));
    }

    Ok(bmi)
}

/// Basal metabolic rate in kcal/day (Mifflin-St Jeor)
///
/// `10·W + 6.25·H − 5·A`, then +5 for men, −161 for women and no
/// adjustment otherwise. Halves round to the even integer.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> i32 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years);

    let bmr = match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
        Gender::Other => base,
    };

    bmr.round_ties_even() as i32
}

/// Healthy weight range in kg, each end rounded to 1 decimal
pub fn calculate_ideal_weight_range(height_cm: f64) -> (f64, f64) {
    let h2 = height_m_squared(height_cm);
    (
        round_to(IDEAL_BMI_LOW * h2, 1),
        round_to(IDEAL_BMI_HIGH * h2, 1),
    )
}

/// Compute every derived metric for a measurement
pub fn compute_metrics(measurement: &Measurement) -> Result<ComputedMetrics> {
    let bmi = calculate_bmi(measurement.weight_kg(), measurement.height_cm())?;
    let bmr = calculate_bmr(
        measurement.weight_kg(),
        measurement.height_cm(),
        measurement.age_years(),
        measurement.gender(),
    );
    let (ideal_weight_low, ideal_weight_high) =
        calculate_ideal_weight_range(measurement.height_cm());

    let metrics = ComputedMetrics {
        bmi,
        category: classify_bmi(bmi).category,
        bmr,
        ideal_weight_low,
        ideal_weight_high,
    };

    tracing::debug!(
        "Computed metrics: bmi={} ({}), bmr={}",
        metrics.bmi,
        metrics.category,
        metrics.bmr
    );

    Ok(metrics)
}
