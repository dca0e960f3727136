use crate::error::{ProcessingError, Result};
use crate::models::{AirQualityRecord, Pollutant, WindCategory};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub unique_stations: usize,
    pub time_range: (NaiveDateTime, NaiveDateTime),
    pub completeness: Vec<PollutantCompleteness>,
    pub wind_categories: BTreeMap<WindCategory, usize>,
    pub uncategorized_wind: usize,
}

#[derive(Debug, Serialize)]
pub struct PollutantCompleteness {
    pub pollutant: Pollutant,
    pub missing: usize,
    pub total: usize,
}

impl PollutantCompleteness {
    pub fn missing_percentage(&self) -> f64 {
        (self.missing as f64 / self.total as f64) * 100.0
    }
}

pub struct AirQualityAnalyzer;

impl AirQualityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, records: &[AirQualityRecord]) -> Result<DatasetSummary> {
        let first = records
            .first()
            .ok_or_else(|| ProcessingError::MissingData("No records to analyze".to_string()))?;

        let mut stations = HashSet::new();
        let mut earliest = first.timestamp;
        let mut latest = first.timestamp;
        let mut missing = [0usize; 6];
        let mut wind_categories = BTreeMap::new();
        let mut uncategorized_wind = 0;

        for record in records {
            stations.insert(record.station.as_str());
            earliest = earliest.min(record.timestamp);
            latest = latest.max(record.timestamp);

            for (pollutant, value) in record.pollutants.iter() {
                if value.is_none() {
                    missing[pollutant.index()] += 1;
                }
            }

            match record.wind_category {
                Some(category) => *wind_categories.entry(category).or_insert(0) += 1,
                None => uncategorized_wind += 1,
            }
        }

        Ok(DatasetSummary {
            total_records: records.len(),
            unique_stations: stations.len(),
            time_range: (earliest, latest),
            completeness: Pollutant::ALL
                .iter()
                .map(|&pollutant| PollutantCompleteness {
                    pollutant,
                    missing: missing[pollutant.index()],
                    total: records.len(),
                })
                .collect(),
            wind_categories,
            uncategorized_wind,
        })
    }
}

impl Default for AirQualityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetSummary {
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Pollutants: PM2.5, PM10, CO, SO2, NO2, O3\n\
            Stations: {} stations\n\
            Time Range: {} to {} ({} days)\n\
            Records: {} total\n\
            Missing Readings:",
            self.unique_stations,
            self.time_range.0,
            self.time_range.1,
            self.time_range
                .1
                .signed_duration_since(self.time_range.0)
                .num_days(),
            self.total_records,
        );

        for entry in &self.completeness {
            out.push_str(&format!(
                "\n- {}: {} ({:.1}%)",
                entry.pollutant,
                entry.missing,
                entry.missing_percentage()
            ));
        }

        out.push_str("\nWind Categories:");
        for (category, count) in &self.wind_categories {
            out.push_str(&format!("\n- {}: {}", category, count));
        }
        if self.uncategorized_wind > 0 {
            out.push_str(&format!("\n- (none): {}", self.uncategorized_wind));
        }

        out
    }
}
