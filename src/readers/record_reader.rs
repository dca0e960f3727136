use crate::error::{ProcessingError, Result};
use crate::models::{AirQualityRecord, Meteorology, Pollutant, PollutantValues, WindCategory};
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, MISSING_MARKERS};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};
use validator::Validate;

/// One CSV row as it appears on disk, before normalisation.
#[derive(Debug, Deserialize, Validate)]
struct RawRecord {
    year: i32,
    month: u32,
    day: u32,

    #[serde(default)]
    hour: Option<String>,

    station: String,

    #[serde(rename = "PM2.5", default, deserialize_with = "csv::invalid_option")]
    #[validate(range(min = 0.0))]
    pm25: Option<f64>,

    #[serde(rename = "PM10", default, deserialize_with = "csv::invalid_option")]
    #[validate(range(min = 0.0))]
    pm10: Option<f64>,

    #[serde(rename = "CO", default, deserialize_with = "csv::invalid_option")]
    #[validate(range(min = 0.0))]
    co: Option<f64>,

    #[serde(rename = "SO2", default, deserialize_with = "csv::invalid_option")]
    #[validate(range(min = 0.0))]
    so2: Option<f64>,

    #[serde(rename = "NO2", default, deserialize_with = "csv::invalid_option")]
    #[validate(range(min = 0.0))]
    no2: Option<f64>,

    #[serde(rename = "O3", default, deserialize_with = "csv::invalid_option")]
    #[validate(range(min = 0.0))]
    o3: Option<f64>,

    #[serde(rename = "TEMP", default, deserialize_with = "csv::invalid_option")]
    temperature: Option<f64>,

    #[serde(rename = "PRES", default, deserialize_with = "csv::invalid_option")]
    pressure: Option<f64>,

    #[serde(rename = "DEWP", default, deserialize_with = "csv::invalid_option")]
    dew_point: Option<f64>,

    #[serde(rename = "RAIN", default, deserialize_with = "csv::invalid_option")]
    rain: Option<f64>,

    #[serde(rename = "WSPM", default, deserialize_with = "csv::invalid_option")]
    wind_speed: Option<f64>,

    #[serde(default)]
    wind_category: Option<String>,
}

impl RawRecord {
    /// `NaN` parses as a float, so it has to be dropped explicitly.
    fn sanitize(&mut self) {
        for value in [
            &mut self.pm25,
            &mut self.pm10,
            &mut self.co,
            &mut self.so2,
            &mut self.no2,
            &mut self.o3,
            &mut self.temperature,
            &mut self.pressure,
            &mut self.dew_point,
            &mut self.rain,
            &mut self.wind_speed,
        ] {
            if value.is_some_and(|v| !v.is_finite()) {
                *value = None;
            }
        }
    }
}

pub struct RecordReader {
    derive_wind_category: bool,
}

impl RecordReader {
    pub fn new() -> Self {
        Self {
            derive_wind_category: true,
        }
    }

    /// Fall back to classifying `WSPM` when a row has no wind category label
    pub fn with_derived_wind_category(derive_wind_category: bool) -> Self {
        Self {
            derive_wind_category,
        }
    }

    /// Read and normalise the measurement table at `path`, sorted by timestamp
    pub fn read_records(&self, path: &Path) -> Result<Vec<AirQualityRecord>> {
        info!(path = %path.display(), "Reading measurement table");
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        self.read_from(reader)
    }

    /// Read from any CSV source with a header row
    pub fn read_from<R: Read>(&self, source: R) -> Result<Vec<AirQualityRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(source);

        let mut records = Vec::new();
        for (index, result) in csv_reader.deserialize::<RawRecord>().enumerate() {
            // Header occupies line 1
            let row = index + 2;
            let mut raw = result?;
            raw.sanitize();
            raw.validate()?;
            records.push(self.normalize(raw, row)?);
        }

        sort_chronologically(&mut records);

        debug!(records = records.len(), "Measurement table loaded");
        Ok(records)
    }

    fn normalize(&self, raw: RawRecord, row: usize) -> Result<AirQualityRecord> {
        let hour_text = raw.hour.as_deref().map(str::trim).unwrap_or_default();
        let hour = if hour_text.is_empty() {
            Some(0)
        } else {
            hour_text.parse::<u32>().ok()
        };
        let timestamp = hour
            .and_then(|hour| {
                NaiveDate::from_ymd_opt(raw.year, raw.month, raw.day)?.and_hms_opt(hour, 0, 0)
            })
            .ok_or_else(|| ProcessingError::InvalidDate {
                row,
                year: raw.year,
                month: raw.month,
                day: raw.day,
                hour: hour_text.to_string(),
            })?;

        let meteorology = Meteorology {
            temperature: raw.temperature,
            pressure: raw.pressure,
            dew_point: raw.dew_point,
            rain: raw.rain,
            wind_speed: raw.wind_speed,
        };

        let wind_category = match raw.wind_category.as_deref().map(str::trim) {
            Some(label) if !MISSING_MARKERS.contains(&label) => {
                Some(label.parse::<WindCategory>()?)
            }
            _ if self.derive_wind_category => raw.wind_speed.map(WindCategory::from_speed),
            _ => None,
        };

        let mut pollutants = PollutantValues::default();
        pollutants.set(Pollutant::Pm25, raw.pm25);
        pollutants.set(Pollutant::Pm10, raw.pm10);
        pollutants.set(Pollutant::Co, raw.co);
        pollutants.set(Pollutant::So2, raw.so2);
        pollutants.set(Pollutant::No2, raw.no2);
        pollutants.set(Pollutant::O3, raw.o3);

        Ok(AirQualityRecord {
            station: raw.station,
            timestamp,
            pollutants,
            meteorology,
            wind_category,
        })
    }
}

impl Default for RecordReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the measurement table at `path` with default settings
pub fn load_records(path: &Path) -> Result<Vec<AirQualityRecord>> {
    RecordReader::new().read_records(path)
}

/// Chronological order, ties broken by station name. Stable.
pub fn sort_chronologically(records: &mut [AirQualityRecord]) {
    records.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.station.cmp(&b.station))
    });
}
