use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};

/// The six tracked concentration measures, in declaration order.
///
/// Declaration order is significant: it breaks ties when ranking pollutant
/// totals and fixes the column order of every derived table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pollutant {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "SO2")]
    So2,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "O3")]
    O3,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::Co,
        Pollutant::So2,
        Pollutant::No2,
        Pollutant::O3,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::Co => "CO",
            Pollutant::So2 => "SO2",
            Pollutant::No2 => "NO2",
            Pollutant::O3 => "O3",
        }
    }

    pub fn units(&self) -> &'static str {
        "µg/m³"
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Pollutant {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace(['_', ' '], "");
        match normalized.as_str() {
            "PM2.5" | "PM25" => Ok(Pollutant::Pm25),
            "PM10" => Ok(Pollutant::Pm10),
            "CO" => Ok(Pollutant::Co),
            "SO2" => Ok(Pollutant::So2),
            "NO2" => Ok(Pollutant::No2),
            "O3" => Ok(Pollutant::O3),
            _ => Err(ProcessingError::UnknownPollutant(s.to_string())),
        }
    }
}

/// One optional reading per pollutant, indexed by [`Pollutant`].
///
/// Serialises as a map keyed by pollutant label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<Pollutant, Option<f64>>",
    from = "BTreeMap<Pollutant, Option<f64>>"
)]
pub struct PollutantValues {
    values: [Option<f64>; 6],
}

impl PollutantValues {
    pub fn new(values: [Option<f64>; 6]) -> Self {
        Self { values }
    }

    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        self.values[pollutant.index()]
    }

    pub fn set(&mut self, pollutant: Pollutant, value: Option<f64>) {
        self.values[pollutant.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, Option<f64>)> + '_ {
        Pollutant::ALL.iter().map(move |p| (*p, self.get(*p)))
    }
}

impl From<PollutantValues> for BTreeMap<Pollutant, Option<f64>> {
    fn from(values: PollutantValues) -> Self {
        values.iter().collect()
    }
}

impl From<BTreeMap<Pollutant, Option<f64>>> for PollutantValues {
    fn from(map: BTreeMap<Pollutant, Option<f64>>) -> Self {
        let mut values = PollutantValues::default();
        for (pollutant, value) in map {
            values.set(pollutant, value);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pollutant_parsing() {
        assert_eq!("PM2.5".parse::<Pollutant>().unwrap(), Pollutant::Pm25);
        assert_eq!("pm25".parse::<Pollutant>().unwrap(), Pollutant::Pm25);
        assert_eq!(" no2 ".parse::<Pollutant>().unwrap(), Pollutant::No2);
        assert!("CO2".parse::<Pollutant>().is_err());
    }

    #[test]
    fn test_declaration_order() {
        let labels: Vec<&str> = Pollutant::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["PM2.5", "PM10", "CO", "SO2", "NO2", "O3"]);
        assert!(Pollutant::Pm25 < Pollutant::O3);
    }

    #[test]
    fn test_pollutant_values_indexing() {
        let mut values = PollutantValues::default();
        values.set(Pollutant::So2, Some(12.0));

        assert_eq!(values.get(Pollutant::So2), Some(12.0));
        assert_eq!(values.get(Pollutant::Pm25), None);
        assert_eq!(values.iter().filter(|(_, v)| v.is_some()).count(), 1);
    }

    #[test]
    fn test_pollutant_values_serialize_by_label() {
        let mut values = PollutantValues::default();
        values.set(Pollutant::Pm25, Some(3.5));

        let json = serde_json::to_value(values).unwrap();
        assert_eq!(json["PM2.5"], 3.5);
        assert!(json["O3"].is_null());

        let back: PollutantValues = serde_json::from_value(json).unwrap();
        assert_eq!(back, values);
    }
}
