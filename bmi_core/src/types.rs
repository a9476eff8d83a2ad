//! Core domain types for the BMI calculator.
//!
//! This module defines the fundamental types used throughout the system:
//! - Measurements as entered by the user
//! - Metrics derived from a measurement (BMI, BMR, ideal range)
//! - Diet plans
//! - Persisted history entries and their statistics

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

// ============================================================================
// Input Types
// ============================================================================

/// Gender as used by the Mifflin-St Jeor equation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl From<&str> for Gender {
    /// Unrecognized values map to `Other`, which applies no BMR adjustment.
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            _ => Gender::Other,
        }
    }
}

impl FromStr for Gender {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Gender::from(s))
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user input event. Immutable once created.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    name: String,
    age_years: u32,
    gender: Gender,
    weight_kg: f64,
    height_cm: f64,
}

impl Measurement {
    /// Build a validated measurement
    ///
    /// Fails with `InvalidInput` for an empty name, a zero age, or a
    /// weight/height that is not a positive finite number.
    pub fn new(
        name: impl Into<String>,
        age_years: u32,
        gender: Gender,
        weight_kg: f64,
        height_cm: f64,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::invalid_input("Please enter your name."));
        }
        if age_years == 0 {
            return Err(Error::invalid_input("Please enter a valid age (> 0)."));
        }
        if !is_positive(weight_kg) || !is_positive(height_cm) {
            return Err(Error::invalid_input(
                "Please enter positive values for weight and height.",
            ));
        }

        Ok(Self {
            name,
            age_years,
            gender,
            weight_kg,
            height_cm,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age_years(&self) -> u32 {
        self.age_years
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }
}

pub(crate) fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

// ============================================================================
// Derived Types
// ============================================================================

/// BMI category. The serialized form is the label stored in history.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal Weight")]
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal Weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metrics derived from a `Measurement`
#[derive(Clone, Debug, PartialEq)]
pub struct ComputedMetrics {
    /// Body mass index, 2 decimals
    pub bmi: f64,
    pub category: BmiCategory,
    /// Basal metabolic rate in kcal/day
    pub bmr: i32,
    /// Lower end of the healthy weight range in kg, 1 decimal
    pub ideal_weight_low: f64,
    /// Upper end of the healthy weight range in kg, 1 decimal
    pub ideal_weight_high: f64,
}

/// Templated diet plan
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DietPlan {
    pub title: String,
    pub daily_goal_kcal: i32,
    pub focus: String,
    pub macro_split: String,
    pub suggestions: Vec<String>,
}

// ============================================================================
// History Types
// ============================================================================

/// A persisted calculation result
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    #[serde(default = "unknown_name")]
    pub name: String,
    #[serde(with = "entry_date")]
    pub date: NaiveDateTime,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub bmi: f64,
    pub category: BmiCategory,
}

fn unknown_name() -> String {
    "N/A".into()
}

/// Minute-resolution timestamps, e.g. `2024-03-01 08:15`
pub(crate) mod entry_date {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Aggregate BMI statistics over the history
///
/// With no entries, `count` is 0 and every aggregate is `None`, which
/// displays as "N/A".
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HistoryStatistics {
    pub count: usize,
    pub avg_bmi: Option<f64>,
    pub min_bmi: Option<f64>,
    pub max_bmi: Option<f64>,
}

impl HistoryStatistics {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Format one aggregate the way the dashboard shows it
    pub fn display_value(value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{:.2}", v),
            None => "N/A".into(),
        }
    }
}
