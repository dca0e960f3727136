pub mod air_quality_analyzer;

pub use air_quality_analyzer::{AirQualityAnalyzer, DatasetSummary, PollutantCompleteness};
