use crate::error::{ProcessingError, Result};
use crate::models::{
    AirQualityRecord, Pollutant, RfmDimension, RiskReport, RiskSegment, SegmentCount,
    StationRiskScore,
};
use crate::processors::ranking::{normalized_rank, RankOrder};
use crate::utils::constants::{
    DEFAULT_RISK_THRESHOLD, FREQUENCY_WEIGHT, MONETARY_WEIGHT, RECENCY_WEIGHT, RFM_SCALE,
};
use crate::utils::stats::round_to;
use chrono::NaiveDateTime;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Exceedance statistics for one station before ranking
#[derive(Debug, Clone)]
struct StationExceedance<'a> {
    station: &'a str,
    latest: NaiveDateTime,
    frequency: usize,
    sum: f64,
}

/// Recency-frequency-monetary scoring of stations for one pollutant.
///
/// Always runs over the whole table, not a date-filtered slice: the score
/// characterises a station's overall history of exceedances.
pub struct RiskScorer {
    threshold: f64,
}

impl RiskScorer {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_RISK_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score every station with at least one reading strictly above the
    /// threshold. Fails with `EmptyFilterResult` when no station has one.
    pub fn score(&self, records: &[AirQualityRecord], pollutant: Pollutant) -> Result<RiskReport> {
        let empty = || ProcessingError::EmptyFilterResult {
            pollutant: pollutant.to_string(),
            threshold: self.threshold,
        };

        let latest_timestamp = records
            .iter()
            .map(|r| r.timestamp)
            .max()
            .ok_or_else(empty)?;

        let mut groups: BTreeMap<&str, StationExceedance> = BTreeMap::new();
        for record in records {
            let Some(value) = record.concentration(pollutant) else {
                continue;
            };
            if value <= self.threshold {
                continue;
            }

            let entry = groups
                .entry(record.station.as_str())
                .or_insert_with(|| StationExceedance {
                    station: record.station.as_str(),
                    latest: record.timestamp,
                    frequency: 0,
                    sum: 0.0,
                });
            entry.latest = entry.latest.max(record.timestamp);
            entry.frequency += 1;
            entry.sum += value;
        }

        if groups.is_empty() {
            return Err(empty());
        }

        let stations: Vec<StationExceedance> = groups.into_values().collect();
        let recency: Vec<i64> = stations
            .iter()
            .map(|s| (latest_timestamp - s.latest).num_days())
            .collect();
        let monetary: Vec<f64> = stations
            .iter()
            .map(|s| s.sum / s.frequency as f64)
            .collect();

        let r_norm = normalized_rank(
            &recency.iter().map(|&d| d as f64).collect::<Vec<_>>(),
            RankOrder::Descending,
        );
        let f_norm = normalized_rank(
            &stations
                .iter()
                .map(|s| s.frequency as f64)
                .collect::<Vec<_>>(),
            RankOrder::Ascending,
        );
        let m_norm = normalized_rank(&monetary, RankOrder::Ascending);

        let mut scores: Vec<StationRiskScore> = stations
            .iter()
            .enumerate()
            .map(|(i, station)| {
                let rfm_score = round_to(rfm_score(r_norm[i], f_norm[i], m_norm[i]), 2);
                StationRiskScore {
                    station: station.station.to_string(),
                    recency: recency[i],
                    frequency: station.frequency,
                    monetary: round_to(monetary[i], 2),
                    r_rank_norm: round_to(r_norm[i], 2),
                    f_rank_norm: round_to(f_norm[i], 2),
                    m_rank_norm: round_to(m_norm[i], 2),
                    rfm_score,
                    segment: RiskSegment::from_score(rfm_score),
                }
            })
            .collect();

        scores.sort_by(|a, b| {
            b.rfm_score
                .total_cmp(&a.rfm_score)
                .then_with(|| a.station.cmp(&b.station))
        });

        info!(
            pollutant = %pollutant,
            threshold = self.threshold,
            stations = scores.len(),
            "Scored station risk"
        );

        Ok(RiskReport {
            pollutant,
            threshold: self.threshold,
            latest_timestamp,
            scores,
        })
    }

    /// Score all six pollutants concurrently over the same read-only table
    pub fn score_all(&self, records: &[AirQualityRecord]) -> Vec<(Pollutant, Result<RiskReport>)> {
        let outcomes: Vec<(Pollutant, Result<RiskReport>)> = Pollutant::ALL
            .par_iter()
            .map(|&pollutant| (pollutant, self.score(records, pollutant)))
            .collect();

        debug!(
            scored = outcomes.iter().filter(|(_, r)| r.is_ok()).count(),
            "Scored all pollutants"
        );
        outcomes
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Weighted blend of the normalised ranks, before rounding
pub fn rfm_score(r_rank_norm: f64, f_rank_norm: f64, m_rank_norm: f64) -> f64 {
    (RECENCY_WEIGHT * r_rank_norm + FREQUENCY_WEIGHT * f_rank_norm + MONETARY_WEIGHT * m_rank_norm)
        * RFM_SCALE
}

/// Score with an explicit threshold
pub fn score(
    records: &[AirQualityRecord],
    pollutant: Pollutant,
    threshold: f64,
) -> Result<RiskReport> {
    RiskScorer::new()
        .with_threshold(threshold)
        .score(records, pollutant)
}

/// Station count per segment, most severe first; empty segments included
pub fn segment_distribution(report: &RiskReport) -> Vec<SegmentCount> {
    RiskSegment::ALL
        .iter()
        .map(|&segment| SegmentCount {
            segment,
            stations: report
                .scores
                .iter()
                .filter(|s| s.segment == segment)
                .count(),
        })
        .collect()
}

/// Top `n` stations along one dimension: most recent exceedance, most
/// exceedances, or highest mean exceedance. Ties fall back to station name.
pub fn top_stations(
    report: &RiskReport,
    dimension: RfmDimension,
    n: usize,
) -> Vec<&StationRiskScore> {
    let mut ranked: Vec<&StationRiskScore> = report.scores.iter().collect();
    ranked.sort_by(|a, b| {
        let primary = match dimension {
            RfmDimension::Recency => a.recency.cmp(&b.recency),
            RfmDimension::Frequency => b.frequency.cmp(&a.frequency),
            RfmDimension::Monetary => b.monetary.total_cmp(&a.monetary),
        };
        primary.then_with(|| a.station.cmp(&b.station))
    });
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn reading(station: &str, day: u32, pm25: f64) -> AirQualityRecord {
        AirQualityRecord::new(station, at(day, 12)).with_pollutant(Pollutant::Pm25, pm25)
    }

    /// Two stations, five records; two rows sit below the threshold.
    fn fixture() -> Vec<AirQualityRecord> {
        vec![
            reading("Huairou", 1, 150.0),
            reading("Huairou", 2, 120.0),
            reading("Huairou", 3, 90.0),
            reading("Shunyi", 4, 300.0),
            reading("Shunyi", 5, 50.0),
        ]
    }

    #[test]
    fn test_reference_scores() {
        let report = RiskScorer::new().score(&fixture(), Pollutant::Pm25).unwrap();

        assert_eq!(report.latest_timestamp, at(5, 12));
        assert_eq!(report.scores.len(), 2);

        let shunyi = report.station("Shunyi").unwrap();
        assert_eq!(shunyi.recency, 1);
        assert_eq!(shunyi.frequency, 1);
        assert_eq!(shunyi.monetary, 300.0);
        assert_eq!(shunyi.r_rank_norm, 100.0);
        assert_eq!(shunyi.f_rank_norm, 50.0);
        assert_eq!(shunyi.m_rank_norm, 100.0);
        assert_eq!(shunyi.rfm_score, 4.3);
        assert_eq!(shunyi.segment, RiskSegment::HighRisk);

        let huairou = report.station("Huairou").unwrap();
        assert_eq!(huairou.recency, 3);
        assert_eq!(huairou.frequency, 2);
        assert_eq!(huairou.monetary, 135.0);
        assert_eq!(huairou.r_rank_norm, 50.0);
        assert_eq!(huairou.f_rank_norm, 100.0);
        assert_eq!(huairou.m_rank_norm, 50.0);
        assert_eq!(huairou.rfm_score, 3.2);
        assert_eq!(huairou.segment, RiskSegment::MediumRisk);

        // Highest score first
        assert_eq!(report.scores[0].station, "Shunyi");
    }

    #[test]
    fn test_score_tie_rounds_to_even() {
        let records = vec![
            reading("Aotizhongxin", 1, 200.0),
            reading("Aotizhongxin", 2, 200.0),
            reading("Dongsi", 5, 150.0),
        ];
        let report = RiskScorer::new().score(&records, Pollutant::Pm25).unwrap();

        // 4.625 rounds down, which keeps it below the Critical floor
        let aoti = report.station("Aotizhongxin").unwrap();
        assert_eq!(aoti.rfm_score, 4.62);
        assert_eq!(aoti.segment, RiskSegment::HighRisk);

        let dongsi = report.station("Dongsi").unwrap();
        assert_eq!(dongsi.rfm_score, 2.88);
        assert_eq!(dongsi.segment, RiskSegment::LowRisk);
    }

    #[test]
    fn test_threshold_is_strict() {
        let records = vec![reading("Gucheng", 1, 100.0), reading("Gucheng", 2, 100.5)];
        let report = score(&records, Pollutant::Pm25, 100.0).unwrap();

        assert_eq!(report.scores[0].frequency, 1);
        assert_eq!(report.scores[0].monetary, 100.5);
    }

    #[test]
    fn test_station_without_exceedance_is_absent() {
        let mut records = fixture();
        records.push(reading("Changping", 5, 20.0));

        let report = RiskScorer::new().score(&records, Pollutant::Pm25).unwrap();
        assert!(report.station("Changping").is_none());
    }

    #[test]
    fn test_empty_filter_result() {
        let records = vec![reading("Dingling", 1, 40.0), reading("Dingling", 2, 99.0)];
        let err = RiskScorer::new()
            .score(&records, Pollutant::Pm25)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::EmptyFilterResult { .. }));

        let err = RiskScorer::new().score(&[], Pollutant::O3).unwrap_err();
        assert!(matches!(err, ProcessingError::EmptyFilterResult { .. }));
    }

    #[test]
    fn test_tied_stations_share_ranks() {
        let records = vec![reading("Nongzhanguan", 3, 200.0), reading("Wanshouxigong", 3, 200.0)];
        let report = RiskScorer::new().score(&records, Pollutant::Pm25).unwrap();

        for station in &report.scores {
            assert_eq!(station.r_rank_norm, 100.0);
            assert_eq!(station.f_rank_norm, 100.0);
            assert_eq!(station.m_rank_norm, 100.0);
            assert_eq!(station.rfm_score, 5.0);
            assert_eq!(station.segment, RiskSegment::Critical);
        }
    }

    #[test]
    fn test_missing_readings_are_ignored() {
        let mut records = fixture();
        records.push(AirQualityRecord::new("Huairou", at(6, 0)));

        let report = RiskScorer::new().score(&records, Pollutant::Pm25).unwrap();
        // Latest timestamp still counts the reading-less row
        assert_eq!(report.latest_timestamp, at(6, 0));
        assert_eq!(report.station("Huairou").unwrap().frequency, 2);
    }

    #[test]
    fn test_source_table_unchanged() {
        let records = fixture();
        let snapshot = records.clone();
        let _ = RiskScorer::new().score(&records, Pollutant::Pm25);
        assert_eq!(records, snapshot);
    }

    #[test]
    fn test_score_all_reports_each_pollutant() {
        let outcomes = RiskScorer::new().score_all(&fixture());

        assert_eq!(outcomes.len(), 6);
        assert_eq!(outcomes[0].0, Pollutant::Pm25);
        assert!(outcomes[0].1.is_ok());
        assert!(matches!(
            outcomes[1].1,
            Err(ProcessingError::EmptyFilterResult { .. })
        ));
    }

    #[test]
    fn test_segment_distribution_lists_every_segment() {
        let report = RiskScorer::new().score(&fixture(), Pollutant::Pm25).unwrap();
        let distribution = segment_distribution(&report);

        assert_eq!(distribution.len(), 5);
        assert_eq!(distribution[1].segment, RiskSegment::HighRisk);
        assert_eq!(distribution[1].stations, 1);
        assert_eq!(distribution[2].stations, 1);
        assert_eq!(distribution[0].stations, 0);
    }

    #[test]
    fn test_top_stations() {
        let report = RiskScorer::new().score(&fixture(), Pollutant::Pm25).unwrap();

        let by_recency = top_stations(&report, RfmDimension::Recency, 5);
        assert_eq!(by_recency[0].station, "Shunyi");

        let by_frequency = top_stations(&report, RfmDimension::Frequency, 1);
        assert_eq!(by_frequency.len(), 1);
        assert_eq!(by_frequency[0].station, "Huairou");

        let by_monetary = top_stations(&report, RfmDimension::Monetary, 5);
        assert_eq!(by_monetary[0].station, "Shunyi");
    }
}
