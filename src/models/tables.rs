//! Derived tables produced by the aggregation pipeline.
//!
//! Each row type is keyed by its grouping attribute and carries `Option<f64>`
//! means so that a group with no valid readings reports a missing value
//! rather than zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::pollutant::{Pollutant, PollutantValues};
use crate::models::record::{DayPeriod, Meteorology, WindCategory};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMeanRow {
    pub date: NaiveDate,
    pub pollutants: PollutantValues,
    pub meteorology: Meteorology,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantTotal {
    pub pollutant: Pollutant,
    pub total_concentration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMeanRow {
    pub station: String,
    pub pollutants: PollutantValues,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyMeanRow {
    pub hour: u32,
    pub pollutants: PollutantValues,
}

/// Mean of one pollutant for a station during day or night hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodMeanRow {
    pub station: String,
    pub period: DayPeriod,
    pub mean: Option<f64>,
}

/// Five-number summary of one pollutant under a wind category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindDistributionRow {
    pub category: WindCategory,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationTrendRow {
    pub date: NaiveDate,
    pub station: String,
    pub mean: Option<f64>,
}
