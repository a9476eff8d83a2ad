//! BMI trend series for charting.
//!
//! Turns the history into plot-ready data: one point per record, a y-axis
//! range and the classification bands as shaded zones. At least two
//! records are needed for a trend.

use crate::classification::BMI_BANDS;
use crate::metrics::round_to;
use crate::{BmiCategory, HistoryEntry};
use chrono::NaiveDate;

/// Fewest records that make a trend
pub const MIN_TREND_POINTS: usize = 2;

/// The y-axis always reaches at least into the obese band
const AXIS_MIN_UPPER: f64 = 35.0;
const AXIS_HEADROOM: f64 = 5.0;
const AXIS_FOOTROOM: f64 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub bmi: f64,
    pub category: BmiCategory,
}

/// A classification band clipped to the visible axis
#[derive(Clone, Debug, PartialEq)]
pub struct TrendZone {
    pub category: BmiCategory,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BmiTrend {
    pub points: Vec<TrendPoint>,
    pub y_min: f64,
    pub y_max: f64,
    pub zones: Vec<TrendZone>,
}

impl BmiTrend {
    /// BMI change from the first to the last record
    pub fn change(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => round_to(last.bmi - first.bmi, 2),
            _ => 0.0,
        }
    }
}

/// Build the trend series, or `None` with fewer than two records
pub fn bmi_trend(entries: &[HistoryEntry]) -> Option<BmiTrend> {
    if entries.len() < MIN_TREND_POINTS {
        tracing::debug!("Not enough records for a trend ({})", entries.len());
        return None;
    }

    let points: Vec<TrendPoint> = entries
        .iter()
        .map(|e| TrendPoint {
            date: e.date.date(),
            bmi: e.bmi,
            category: e.category,
        })
        .collect();

    let min = points.iter().map(|p| p.bmi).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|p| p.bmi)
        .fold(f64::NEG_INFINITY, f64::max);

    let y_min = (min - AXIS_FOOTROOM).max(0.0);
    let y_max = (max + AXIS_HEADROOM).max(AXIS_MIN_UPPER);

    let zones = BMI_BANDS
        .iter()
        .filter(|band| band.lower < y_max)
        .map(|band| TrendZone {
            category: band.category,
            lower: band.lower,
            upper: band.upper.min(y_max),
        })
        .collect();

    Some(BmiTrend {
        points,
        y_min,
        y_max,
        zones,
    })
}
