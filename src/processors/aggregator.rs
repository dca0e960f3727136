//! Reductions over a record set.
//!
//! Every function here is pure and independent of input row order. Groups
//! come out of a `BTreeMap`, so dates and hours are ascending and stations
//! are alphabetical. Missing readings are skipped when averaging and count
//! as zero when summing.

use crate::models::{
    AirQualityRecord, DailyMeanRow, HourlyMeanRow, Meteorology, Pollutant, PollutantTotal,
    PollutantValues, StationMeanRow,
};
use crate::utils::stats::ColumnMeans;
use chrono::NaiveDate;
use std::collections::BTreeMap;

fn pollutant_row(record: &AirQualityRecord) -> [Option<f64>; 6] {
    Pollutant::ALL.map(|p| record.concentration(p))
}

/// Mean of every numeric column per calendar date, ascending by date
pub fn daily_mean<R: AsRef<AirQualityRecord>>(records: &[R]) -> Vec<DailyMeanRow> {
    let mut groups: BTreeMap<NaiveDate, (ColumnMeans<6>, ColumnMeans<5>)> = BTreeMap::new();

    for record in records.iter().map(|r| r.as_ref()) {
        let (pollutants, meteorology) = groups.entry(record.date()).or_default();
        pollutants.push(pollutant_row(record));
        meteorology.push(record.meteorology.to_array());
    }

    groups
        .into_iter()
        .map(|(date, (pollutants, meteorology))| DailyMeanRow {
            date,
            pollutants: PollutantValues::new(pollutants.means()),
            meteorology: Meteorology::from_array(meteorology.means()),
        })
        .collect()
}

/// Column sums for all six pollutants, largest first.
///
/// Always six rows. Equal totals keep declaration order.
pub fn pollutant_totals<R: AsRef<AirQualityRecord>>(records: &[R]) -> Vec<PollutantTotal> {
    let mut totals: Vec<PollutantTotal> = Pollutant::ALL
        .iter()
        .map(|&pollutant| PollutantTotal {
            pollutant,
            total_concentration: records
                .iter()
                .map(|r| r.as_ref().concentration(pollutant).unwrap_or(0.0))
                .sum(),
        })
        .collect();

    // Stable sort keeps declaration order among ties
    totals.sort_by(|a, b| b.total_concentration.total_cmp(&a.total_concentration));
    totals
}

/// Pollutant means per station present in the input
pub fn station_means<R: AsRef<AirQualityRecord>>(records: &[R]) -> Vec<StationMeanRow> {
    let mut groups: BTreeMap<&str, ColumnMeans<6>> = BTreeMap::new();

    for record in records.iter().map(|r| r.as_ref()) {
        groups
            .entry(record.station.as_str())
            .or_default()
            .push(pollutant_row(record));
    }

    groups
        .into_iter()
        .map(|(station, means)| StationMeanRow {
            station: station.to_string(),
            pollutants: PollutantValues::new(means.means()),
        })
        .collect()
}

/// Pollutant means per hour of day (0-23); hours without records are absent
pub fn hourly_means<R: AsRef<AirQualityRecord>>(records: &[R]) -> Vec<HourlyMeanRow> {
    let mut groups: BTreeMap<u32, ColumnMeans<6>> = BTreeMap::new();

    for record in records.iter().map(|r| r.as_ref()) {
        groups
            .entry(record.hour())
            .or_default()
            .push(pollutant_row(record));
    }

    groups
        .into_iter()
        .map(|(hour, means)| HourlyMeanRow {
            hour,
            pollutants: PollutantValues::new(means.means()),
        })
        .collect()
}
