use crate::analyzers::DatasetSummary;
use crate::error::{ProcessingError, Result};
use crate::models::{
    DailyMeanRow, HourlyMeanRow, PeriodMeanRow, Pollutant, PollutantTotal, PollutantValues,
    RfmDimension, RiskReport, SegmentCount, StationMeanRow, StationRiskScore, StationTrendRow,
    WindDistributionRow,
};
use crate::utils::constants::{FORMAT_JSON, FORMAT_TEXT};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Every view derived from one date-filtered slice of the table
#[derive(Debug, Serialize)]
pub struct AggregateReport {
    pub pollutant: Pollutant,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub records: usize,
    pub daily_mean: Vec<DailyMeanRow>,
    pub pollutant_totals: Vec<PollutantTotal>,
    pub station_means: Vec<StationMeanRow>,
    pub hourly_means: Vec<HourlyMeanRow>,
    pub period_comparison: Vec<PeriodMeanRow>,
    pub wind_distribution: Vec<WindDistributionRow>,
    pub station_daily_trend: Vec<StationTrendRow>,
}

#[derive(Debug, Serialize)]
pub struct TopStations {
    pub dimension: RfmDimension,
    pub stations: Vec<StationRiskScore>,
}

#[derive(Debug, Serialize)]
pub struct RiskOverview {
    pub report: RiskReport,
    pub segment_distribution: Vec<SegmentCount>,
    pub top_stations: Vec<TopStations>,
}

pub struct ReportWriter {
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            format: ReportFormat::Text,
        }
    }

    pub fn with_format(mut self, format: &str) -> Result<Self> {
        self.format = match format.to_lowercase().as_str() {
            FORMAT_TEXT => ReportFormat::Text,
            FORMAT_JSON => ReportFormat::Json,
            _ => {
                return Err(ProcessingError::InvalidFormat(format!(
                    "Unsupported report format: {}",
                    format
                )))
            }
        };
        Ok(self)
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Open `path` for writing, or stdout when `None`
    pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
        Ok(match path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                Box::new(BufWriter::new(File::create(path)?))
            }
            None => Box::new(io::stdout().lock()),
        })
    }

    pub fn write_summary<W: Write>(&self, summary: &DatasetSummary, out: &mut W) -> Result<()> {
        match self.format {
            ReportFormat::Json => self.write_json(summary, out),
            ReportFormat::Text => {
                writeln!(out, "{}", summary.summary())?;
                Ok(())
            }
        }
    }

    pub fn write_aggregate<W: Write>(&self, report: &AggregateReport, out: &mut W) -> Result<()> {
        if self.format == ReportFormat::Json {
            return self.write_json(report, out);
        }

        let p = report.pollutant;
        writeln!(
            out,
            "Air quality from {} to {} ({} records, focus {})",
            report.start, report.end, report.records, p
        )?;

        section(out, "Pollutant Totals")?;
        for row in &report.pollutant_totals {
            writeln!(out, "{:<8}{:>16.2}", row.pollutant, row.total_concentration)?;
        }

        section(out, "Daily Means")?;
        writeln!(out, "{:<12}{}", "date", pollutant_header())?;
        for row in &report.daily_mean {
            writeln!(out, "{:<12}{}", row.date.to_string(), pollutant_cells(&row.pollutants))?;
        }

        section(out, &format!("Station Means (by {})", p))?;
        writeln!(out, "{:<16}{}", "station", pollutant_header())?;
        for row in &report.station_means {
            writeln!(out, "{:<16}{}", row.station, pollutant_cells(&row.pollutants))?;
        }

        section(out, "Hourly Means")?;
        writeln!(out, "{:<6}{}", "hour", pollutant_header())?;
        for row in &report.hourly_means {
            writeln!(out, "{:<6}{}", row.hour, pollutant_cells(&row.pollutants))?;
        }

        section(out, &format!("{} Day vs Night", p))?;
        for row in &report.period_comparison {
            writeln!(out, "{:<16}{:<7}{:>10}", row.station, row.period, cell(row.mean))?;
        }

        section(out, &format!("{} by Wind Category", p))?;
        writeln!(
            out,
            "{:<10}{:>8}{:>10}{:>10}{:>10}{:>10}{:>10}",
            "wind", "count", "min", "q1", "median", "q3", "max"
        )?;
        for row in &report.wind_distribution {
            writeln!(
                out,
                "{:<10}{:>8}{:>10.2}{:>10.2}{:>10.2}{:>10.2}{:>10.2}",
                row.category, row.count, row.min, row.q1, row.median, row.q3, row.max
            )?;
        }

        section(out, &format!("{} Daily Trend per Station", p))?;
        for row in &report.station_daily_trend {
            writeln!(out, "{:<12}{:<16}{:>10}", row.date.to_string(), row.station, cell(row.mean))?;
        }

        Ok(())
    }

    pub fn write_risk<W: Write>(&self, overview: &RiskOverview, out: &mut W) -> Result<()> {
        if self.format == ReportFormat::Json {
            return self.write_json(overview, out);
        }

        let report = &overview.report;
        writeln!(
            out,
            "RFM risk for {} (threshold {}, latest reading {})",
            report.pollutant, report.threshold, report.latest_timestamp
        )?;

        section(out, "Station Scores")?;
        writeln!(
            out,
            "{:<16}{:>8}{:>10}{:>10}{:>8}{:>8}{:>8}{:>8}  {}",
            "station", "recency", "frequency", "monetary", "r_norm", "f_norm", "m_norm", "score",
            "segment"
        )?;
        for s in &report.scores {
            writeln!(
                out,
                "{:<16}{:>8}{:>10}{:>10.2}{:>8.2}{:>8.2}{:>8.2}{:>8.2}  {}",
                s.station,
                s.recency,
                s.frequency,
                s.monetary,
                s.r_rank_norm,
                s.f_rank_norm,
                s.m_rank_norm,
                s.rfm_score,
                s.segment
            )?;
        }

        section(out, "Segment Distribution")?;
        for entry in &overview.segment_distribution {
            writeln!(out, "{:<22}{:>4}", entry.segment, entry.stations)?;
        }

        for top in &overview.top_stations {
            section(out, top.dimension.label())?;
            for (i, s) in top.stations.iter().enumerate() {
                let value = match top.dimension {
                    RfmDimension::Recency => s.recency.to_string(),
                    RfmDimension::Frequency => s.frequency.to_string(),
                    RfmDimension::Monetary => format!("{:.2}", s.monetary),
                };
                writeln!(out, "{}. {:<16}{:>10}", i + 1, s.station, value)?;
            }
        }

        Ok(())
    }

    /// Placeholder shown when no reading crosses the threshold
    pub fn write_empty_risk<W: Write>(
        &self,
        pollutant: Pollutant,
        threshold: f64,
        out: &mut W,
    ) -> Result<()> {
        match self.format {
            ReportFormat::Json => self.write_json(
                &serde_json::json!({
                    "pollutant": pollutant,
                    "threshold": threshold,
                    "scores": [],
                }),
                out,
            ),
            ReportFormat::Text => {
                writeln!(
                    out,
                    "No station recorded {} above {}; nothing to score.",
                    pollutant, threshold
                )?;
                Ok(())
            }
        }
    }

    fn write_json<T: Serialize, W: Write>(&self, value: &T, out: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "\n=== {} ===", title)
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

fn pollutant_header() -> String {
    Pollutant::ALL
        .iter()
        .map(|p| format!("{:>10}", p.label()))
        .collect()
}

fn pollutant_cells(values: &PollutantValues) -> String {
    values
        .iter()
        .map(|(_, v)| format!("{:>10}", cell(v)))
        .collect()
}
