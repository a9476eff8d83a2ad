//! Validation of raw form input.
//!
//! The presentation layer collects every field as text. Fields are checked
//! in the order the form presents them, and the first problem found is
//! reported as `InvalidInput` with a message suitable for the user.

use crate::{Error, Gender, Measurement, Result};

/// Unvalidated text fields of the calculator form
#[derive(Clone, Debug, Default)]
pub struct RawMeasurement {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub weight: String,
    pub height: String,
}

const NON_NUMERIC: &str =
    "Please ensure all fields contain valid numerical data (Age, Weight, Height).";

impl RawMeasurement {
    pub fn validate(&self) -> Result<Measurement> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::invalid_input("Please enter your name."));
        }

        let age = self.age.trim();
        if age.is_empty() {
            return Err(Error::invalid_input("Please enter a valid age (> 0)."));
        }
        let age_years = parse_age(age)?;

        let weight = self.weight.trim();
        let height = self.height.trim();
        if weight.is_empty() || height.is_empty() {
            return Err(Error::invalid_input(
                "Please enter values for both weight and height.",
            ));
        }

        let weight_kg = parse_number(weight)?;
        let height_cm = parse_number(height)?;

        Measurement::new(
            name,
            age_years,
            Gender::from(self.gender.as_str()),
            weight_kg,
            height_cm,
        )
    }
}

fn parse_age(text: &str) -> Result<u32> {
    let age: i64 = text.parse().map_err(|_| Error::invalid_input(NON_NUMERIC))?;
    if age <= 0 {
        return Err(Error::invalid_input("Please enter a valid age (> 0)."));
    }
    u32::try_from(age).map_err(|_| Error::invalid_input("Please enter a valid age (> 0)."))
}

fn parse_number(text: &str) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|_| Error::invalid_input(NON_NUMERIC))
}
