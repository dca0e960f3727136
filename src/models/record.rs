use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};
use crate::models::pollutant::{Pollutant, PollutantValues};
use crate::utils::constants::{
    CALM_WIND_LIMIT, DAY_END_HOUR, DAY_START_HOUR, LIGHT_WIND_LIMIT, MODERATE_WIND_LIMIT,
};

/// One row of the measurement table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityRecord {
    pub station: String,
    pub timestamp: NaiveDateTime,
    pub pollutants: PollutantValues,
    pub meteorology: Meteorology,
    pub wind_category: Option<WindCategory>,
}

impl AirQualityRecord {
    pub fn new(station: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            station: station.into(),
            timestamp,
            pollutants: PollutantValues::default(),
            meteorology: Meteorology::default(),
            wind_category: None,
        }
    }

    pub fn with_pollutant(mut self, pollutant: Pollutant, value: f64) -> Self {
        self.pollutants.set(pollutant, Some(value));
        self
    }

    pub fn with_meteorology(mut self, meteorology: Meteorology) -> Self {
        self.meteorology = meteorology;
        self
    }

    pub fn with_wind_category(mut self, category: WindCategory) -> Self {
        self.wind_category = Some(category);
        self
    }

    pub fn concentration(&self, pollutant: Pollutant) -> Option<f64> {
        self.pollutants.get(pollutant)
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    pub fn period(&self) -> DayPeriod {
        DayPeriod::from_hour(self.hour())
    }
}

impl AsRef<AirQualityRecord> for AirQualityRecord {
    fn as_ref(&self) -> &AirQualityRecord {
        self
    }
}

/// Meteorological readings carried alongside the pollutants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Meteorology {
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
    pub dew_point: Option<f64>,
    pub rain: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl Meteorology {
    pub const FIELD_NAMES: [&'static str; 5] = ["TEMP", "PRES", "DEWP", "RAIN", "WSPM"];

    pub fn to_array(&self) -> [Option<f64>; 5] {
        [
            self.temperature,
            self.pressure,
            self.dew_point,
            self.rain,
            self.wind_speed,
        ]
    }

    pub fn from_array(values: [Option<f64>; 5]) -> Self {
        let [temperature, pressure, dew_point, rain, wind_speed] = values;
        Self {
            temperature,
            pressure,
            dew_point,
            rain,
            wind_speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WindCategory {
    Calm,
    Light,
    Moderate,
    Strong,
}

impl WindCategory {
    pub const ALL: [WindCategory; 4] = [
        WindCategory::Calm,
        WindCategory::Light,
        WindCategory::Moderate,
        WindCategory::Strong,
    ];

    /// Classify a wind speed in m/s.
    pub fn from_speed(speed: f64) -> Self {
        if speed < CALM_WIND_LIMIT {
            WindCategory::Calm
        } else if speed < LIGHT_WIND_LIMIT {
            WindCategory::Light
        } else if speed < MODERATE_WIND_LIMIT {
            WindCategory::Moderate
        } else {
            WindCategory::Strong
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WindCategory::Calm => "Calm",
            WindCategory::Light => "Light",
            WindCategory::Moderate => "Moderate",
            WindCategory::Strong => "Strong",
        }
    }
}

impl fmt::Display for WindCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for WindCategory {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let base = lowered
            .trim_end_matches("breeze")
            .trim_end_matches("wind")
            .trim();

        match base {
            "calm" => Ok(WindCategory::Calm),
            "light" => Ok(WindCategory::Light),
            "moderate" => Ok(WindCategory::Moderate),
            "strong" => Ok(WindCategory::Strong),
            _ => Err(ProcessingError::UnknownWindCategory(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Day,
    Night,
}

impl DayPeriod {
    /// Hours 6 through 18 inclusive are daytime.
    pub fn from_hour(hour: u32) -> Self {
        if (DAY_START_HOUR..=DAY_END_HOUR).contains(&hour) {
            DayPeriod::Day
        } else {
            DayPeriod::Night
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayPeriod::Day => "day",
            DayPeriod::Night => "night",
        }
    }
}

impl fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}
