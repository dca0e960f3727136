use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::pollutant::Pollutant;
use crate::utils::constants::{
    CRITICAL_SCORE_FLOOR, HIGH_RISK_SCORE_FLOOR, LOW_RISK_SCORE_FLOOR, MEDIUM_RISK_SCORE_FLOOR,
};

/// Station risk tier derived from the RFM score, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskSegment {
    #[serde(rename = "Critical Station")]
    Critical,
    #[serde(rename = "High Risk Station")]
    HighRisk,
    #[serde(rename = "Medium Risk Station")]
    MediumRisk,
    #[serde(rename = "Low Risk Station")]
    LowRisk,
    #[serde(rename = "Safe Station")]
    Safe,
}

impl RiskSegment {
    pub const ALL: [RiskSegment; 5] = [
        RiskSegment::Critical,
        RiskSegment::HighRisk,
        RiskSegment::MediumRisk,
        RiskSegment::LowRisk,
        RiskSegment::Safe,
    ];

    /// First match wins; every floor is exclusive.
    pub fn from_score(score: f64) -> Self {
        if score > CRITICAL_SCORE_FLOOR {
            RiskSegment::Critical
        } else if score > HIGH_RISK_SCORE_FLOOR {
            RiskSegment::HighRisk
        } else if score > MEDIUM_RISK_SCORE_FLOOR {
            RiskSegment::MediumRisk
        } else if score > LOW_RISK_SCORE_FLOOR {
            RiskSegment::LowRisk
        } else {
            RiskSegment::Safe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskSegment::Critical => "Critical Station",
            RiskSegment::HighRisk => "High Risk Station",
            RiskSegment::MediumRisk => "Medium Risk Station",
            RiskSegment::LowRisk => "Low Risk Station",
            RiskSegment::Safe => "Safe Station",
        }
    }
}

impl fmt::Display for RiskSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRiskScore {
    pub station: String,
    /// Whole days between the latest timestamp in the table and this
    /// station's latest exceedance.
    pub recency: i64,
    pub frequency: usize,
    pub monetary: f64,
    pub r_rank_norm: f64,
    pub f_rank_norm: f64,
    pub m_rank_norm: f64,
    #[serde(rename = "RFM_score")]
    pub rfm_score: f64,
    pub segment: RiskSegment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub pollutant: Pollutant,
    pub threshold: f64,
    pub latest_timestamp: NaiveDateTime,
    pub scores: Vec<StationRiskScore>,
}

impl RiskReport {
    pub fn station(&self, name: &str) -> Option<&StationRiskScore> {
        self.scores.iter().find(|s| s.station == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RfmDimension {
    Recency,
    Frequency,
    Monetary,
}

impl RfmDimension {
    pub const ALL: [RfmDimension; 3] = [
        RfmDimension::Recency,
        RfmDimension::Frequency,
        RfmDimension::Monetary,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RfmDimension::Recency => "By Recency (days)",
            RfmDimension::Frequency => "By Frequency",
            RfmDimension::Monetary => "By Monetary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentCount {
    pub segment: RiskSegment,
    pub stations: usize,
}
