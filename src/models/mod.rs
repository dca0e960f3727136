pub mod pollutant;
pub mod record;
pub mod risk;
pub mod tables;

pub use pollutant::{Pollutant, PollutantValues};
pub use record::{AirQualityRecord, DayPeriod, Meteorology, WindCategory};
pub use risk::{RfmDimension, RiskReport, RiskSegment, SegmentCount, StationRiskScore};
pub use tables::{
    DailyMeanRow, HourlyMeanRow, PeriodMeanRow, PollutantTotal, StationMeanRow, StationTrendRow,
    WindDistributionRow,
};
