//! BMI classification.
//!
//! Categories come from an ordered table of half-open bands that covers
//! `[0, ∞)` without gaps. `classify_bmi` picks the first band whose upper
//! bound lies above the value.

use crate::BmiCategory;

/// One row of the classification table: `[lower, upper)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BmiBand {
    pub lower: f64,
    pub upper: f64,
    pub category: BmiCategory,
    pub advice: &'static str,
}

pub static BMI_BANDS: [BmiBand; 4] = [
    BmiBand {
        lower: 0.0,
        upper: 18.5,
        category: BmiCategory::Underweight,
        advice: "Focus on a nutrient-rich diet to gain weight safely.",
    },
    BmiBand {
        lower: 18.5,
        upper: 25.0,
        category: BmiCategory::Normal,
        advice: "Maintain your current healthy habits. Excellent!",
    },
    BmiBand {
        lower: 25.0,
        upper: 30.0,
        category: BmiCategory::Overweight,
        advice: "Consider consulting a doctor or dietitian to manage weight.",
    },
    BmiBand {
        lower: 30.0,
        upper: f64::INFINITY,
        category: BmiCategory::Obese,
        advice: "It is highly recommended to seek professional health guidance immediately.",
    },
];

/// Category plus the advice shown alongside it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classification {
    pub category: BmiCategory,
    pub advice: &'static str,
}

impl From<&BmiBand> for Classification {
    fn from(band: &BmiBand) -> Self {
        Classification {
            category: band.category,
            advice: band.advice,
        }
    }
}

/// Classify a BMI value
///
/// Values below zero land in the first band; NaN fails every comparison and
/// lands in the open-ended last band.
pub fn classify_bmi(bmi: f64) -> Classification {
    let band = BMI_BANDS
        .iter()
        .find(|band| bmi < band.upper)
        .unwrap_or(&BMI_BANDS[BMI_BANDS.len() - 1]);
    Classification::from(band)
}

/// The band row for a category
pub fn band_for(category: BmiCategory) -> &'static BmiBand {
    match category {
        BmiCategory::Underweight => &BMI_BANDS[0],
        BmiCategory::Normal => &BMI_BANDS[1],
        BmiCategory::Overweight => &BMI_BANDS[2],
        BmiCategory::Obese => &BMI_BANDS[3],
    }
}
