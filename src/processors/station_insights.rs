use crate::models::{
    AirQualityRecord, DayPeriod, PeriodMeanRow, Pollutant, StationMeanRow, StationTrendRow,
    WindCategory, WindDistributionRow,
};
use crate::processors::aggregator::station_means;
use crate::utils::stats::{quantile_sorted, MeanAccumulator};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Day versus night mean of one pollutant per station
pub fn period_comparison<R: AsRef<AirQualityRecord>>(
    records: &[R],
    pollutant: Pollutant,
) -> Vec<PeriodMeanRow> {
    let mut groups: BTreeMap<(&str, DayPeriod), MeanAccumulator> = BTreeMap::new();

    for record in records.iter().map(|r| r.as_ref()) {
        groups
            .entry((record.station.as_str(), record.period()))
            .or_default()
            .push(record.concentration(pollutant));
    }

    groups
        .into_iter()
        .map(|((station, period), acc)| PeriodMeanRow {
            station: station.to_string(),
            period,
            mean: acc.mean(),
        })
        .collect()
}

/// Spread of one pollutant under each wind category.
///
/// Records without a category or without a reading are skipped, so a
/// category only appears when it has at least one reading.
pub fn wind_distribution<R: AsRef<AirQualityRecord>>(
    records: &[R],
    pollutant: Pollutant,
) -> Vec<WindDistributionRow> {
    let mut groups: BTreeMap<WindCategory, Vec<f64>> = BTreeMap::new();

    for record in records.iter().map(|r| r.as_ref()) {
        if let (Some(category), Some(value)) =
            (record.wind_category, record.concentration(pollutant))
        {
            groups.entry(category).or_default().push(value);
        }
    }

    groups
        .into_iter()
        .filter_map(|(category, mut values)| {
            values.sort_by(f64::total_cmp);
            Some(WindDistributionRow {
                category,
                count: values.len(),
                min: *values.first()?,
                q1: quantile_sorted(&values, 0.25)?,
                median: quantile_sorted(&values, 0.5)?,
                q3: quantile_sorted(&values, 0.75)?,
                max: *values.last()?,
            })
        })
        .collect()
}

/// Mean of one pollutant per (date, station), by date then station
pub fn station_daily_trend<R: AsRef<AirQualityRecord>>(
    records: &[R],
    pollutant: Pollutant,
) -> Vec<StationTrendRow> {
    let mut groups: BTreeMap<(NaiveDate, &str), MeanAccumulator> = BTreeMap::new();

    for record in records.iter().map(|r| r.as_ref()) {
        groups
            .entry((record.date(), record.station.as_str()))
            .or_default()
            .push(record.concentration(pollutant));
    }

    groups
        .into_iter()
        .map(|((date, station), acc)| StationTrendRow {
            date,
            station: station.to_string(),
            mean: acc.mean(),
        })
        .collect()
}

/// Station means ordered by one pollutant, highest first, missing last
pub fn ranked_station_means<R: AsRef<AirQualityRecord>>(
    records: &[R],
    pollutant: Pollutant,
) -> Vec<StationMeanRow> {
    let mut means = station_means(records);
    means.sort_by(|a, b| {
        match (a.pollutants.get(pollutant), b.pollutants.get(pollutant)) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| a.station.cmp(&b.station))
    });
    means
}
