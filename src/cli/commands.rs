use crate::analyzers::AirQualityAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::{ProcessingError, Result};
use crate::models::{AirQualityRecord, Pollutant, RfmDimension, RiskReport};
use crate::processors::{
    daily_mean, date_bounds, hourly_means, period_comparison, pollutant_totals,
    ranked_station_means, segment_distribution, station_daily_trend, top_stations,
    wind_distribution, RiskScorer, TimeFilter,
};
use crate::readers::RecordReader;
use crate::utils::progress::ProgressReporter;
use crate::writers::{AggregateReport, ReportWriter, RiskOverview, TopStations};
use chrono::{NaiveDate, NaiveTime};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Summary {
            input,
            format,
            output,
        } => {
            let input = resolve_input(input, &settings)?;
            let records = load_table(&input, cli.quiet)?;
            let writer = report_writer(format, &settings)?;

            let summary = AirQualityAnalyzer::new().summarize(&records)?;
            let mut out = ReportWriter::open_output(output.as_deref())?;
            writer.write_summary(&summary, &mut out)?;
            out.flush()?;
        }

        Commands::Aggregate {
            input,
            start,
            end,
            pollutant,
            format,
            output,
        } => {
            let input = resolve_input(input, &settings)?;
            let pollutant = match pollutant {
                Some(p) => p,
                None => settings.pollutant()?,
            };
            let writer = report_writer(format, &settings)?;
            let records = load_table(&input, cli.quiet)?;

            let report = aggregate(&records, start, end, pollutant)?;
            let mut out = ReportWriter::open_output(output.as_deref())?;
            writer.write_aggregate(&report, &mut out)?;
            out.flush()?;
        }

        Commands::Risk {
            input,
            pollutant,
            threshold,
            top,
            all_pollutants,
            format,
            output,
        } => {
            let input = resolve_input(input, &settings)?;
            let pollutant = match pollutant {
                Some(p) => p,
                None => settings.pollutant()?,
            };
            let threshold = threshold.unwrap_or(settings.threshold);
            let top = top.unwrap_or(settings.top);
            let writer = report_writer(format, &settings)?;
            let records = load_table(&input, cli.quiet)?;

            let scorer = RiskScorer::new().with_threshold(threshold);
            let outcomes = if all_pollutants {
                scorer.score_all(&records)
            } else {
                vec![(pollutant, scorer.score(&records, pollutant))]
            };

            let mut out = ReportWriter::open_output(output.as_deref())?;
            for (pollutant, outcome) in outcomes {
                match outcome {
                    Ok(report) => writer.write_risk(&risk_overview(report, top), &mut out)?,
                    Err(ProcessingError::EmptyFilterResult { .. }) => {
                        warn!(%pollutant, threshold, "No readings above threshold");
                        writer.write_empty_risk(pollutant, threshold, &mut out)?;
                    }
                    Err(e) => return Err(e),
                }
            }
            out.flush()?;
        }
    }

    Ok(())
}

/// Filter to the requested window and derive every aggregate view.
///
/// Omitted bounds fall back to the first and last readings in the table.
/// The day/night comparison uses the whole table.
#[instrument(skip(records), fields(rows = records.len()))]
pub fn aggregate(
    records: &[AirQualityRecord],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    pollutant: Pollutant,
) -> Result<AggregateReport> {
    let empty_table = || ProcessingError::MissingData("Measurement table is empty".to_string());
    let (first_date, _) = date_bounds(records).ok_or_else(empty_table)?;
    let start = start.unwrap_or(first_date);

    let window = match end {
        Some(end) => TimeFilter::new(start, end)?,
        None => {
            let latest = records
                .iter()
                .map(|r| r.timestamp)
                .max()
                .ok_or_else(empty_table)?;
            TimeFilter::between(start.and_time(NaiveTime::MIN), latest)?
        }
    };

    let filtered = window.apply(records);
    info!(
        start = %window.start(),
        end = %window.end(),
        retained = filtered.len(),
        "Aggregating date range"
    );

    Ok(AggregateReport {
        pollutant,
        start: window.start(),
        end: window.end(),
        records: filtered.len(),
        daily_mean: daily_mean(&filtered),
        pollutant_totals: pollutant_totals(&filtered),
        station_means: ranked_station_means(&filtered, pollutant),
        hourly_means: hourly_means(&filtered),
        period_comparison: period_comparison(records, pollutant),
        wind_distribution: wind_distribution(&filtered, pollutant),
        station_daily_trend: station_daily_trend(&filtered, pollutant),
    })
}

/// Attach the segment distribution and top-N tables to a risk report
pub fn risk_overview(report: RiskReport, top: usize) -> RiskOverview {
    let segment_distribution = segment_distribution(&report);
    let top_stations = RfmDimension::ALL
        .iter()
        .map(|&dimension| TopStations {
            dimension,
            stations: top_stations(&report, dimension, top)
                .into_iter()
                .cloned()
                .collect(),
        })
        .collect();

    RiskOverview {
        report,
        segment_distribution,
        top_stations,
    }
}

#[instrument(skip(quiet))]
fn load_table(path: &Path, quiet: bool) -> Result<Vec<AirQualityRecord>> {
    let progress = ProgressReporter::new_spinner("Loading measurements...", quiet);
    let records = RecordReader::new().read_records(path)?;
    progress.finish_with_message(&format!("Loaded {} records", records.len()));
    Ok(records)
}

fn resolve_input(input: Option<PathBuf>, settings: &Settings) -> Result<PathBuf> {
    input.or_else(|| settings.input.clone()).ok_or_else(|| {
        ProcessingError::MissingData(
            "No input file given; pass --input or set `input` in the settings file".to_string(),
        )
    })
}

fn report_writer(format: Option<String>, settings: &Settings) -> Result<ReportWriter> {
    ReportWriter::new().with_format(format.as_deref().unwrap_or(&settings.format))
}

fn init_logging(verbose: bool, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let initialised = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    // A subscriber may already be installed when embedded or under test
    if let Err(e) = initialised {
        eprintln!("Logging not initialised: {}", e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 12, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn table() -> Vec<AirQualityRecord> {
        vec![
            AirQualityRecord::new("Dongsi", at(1, 8)).with_pollutant(Pollutant::Pm25, 210.0),
            AirQualityRecord::new("Dongsi", at(2, 20)).with_pollutant(Pollutant::Pm25, 90.0),
            AirQualityRecord::new("Wanliu", at(3, 23)).with_pollutant(Pollutant::Pm25, 130.0),
        ]
    }

    #[test]
    fn test_aggregate_defaults_to_full_table() {
        let report = aggregate(&table(), None, None, Pollutant::Pm25).unwrap();

        assert_eq!(report.records, 3);
        assert_eq!(report.daily_mean.len(), 3);
        assert_eq!(report.station_means[0].station, "Dongsi");
        assert_eq!(report.end, at(3, 23));
    }

    #[test]
    fn test_aggregate_explicit_range() {
        let start = NaiveDate::from_ymd_opt(2016, 12, 2);
        let end = NaiveDate::from_ymd_opt(2016, 12, 3);
        let report = aggregate(&table(), start, end, Pollutant::Pm25).unwrap();

        // 23:00 on the end date falls after the midnight cut
        assert_eq!(report.records, 1);
        // Day/night view keeps every station
        assert_eq!(report.period_comparison.len(), 3);
    }

    #[test]
    fn test_aggregate_inverted_range() {
        let start = NaiveDate::from_ymd_opt(2016, 12, 3);
        let end = NaiveDate::from_ymd_opt(2016, 12, 1);
        let err = aggregate(&table(), start, end, Pollutant::Pm25).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidRange { .. }));
    }

    #[test]
    fn test_risk_overview_tables() {
        let report = RiskScorer::new().score(&table(), Pollutant::Pm25).unwrap();
        let overview = risk_overview(report, 1);

        assert_eq!(overview.segment_distribution.len(), 5);
        assert_eq!(overview.top_stations.len(), 3);
        assert!(overview.top_stations.iter().all(|t| t.stations.len() == 1));
    }
}
