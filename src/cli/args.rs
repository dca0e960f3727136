use crate::models::Pollutant;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "air-quality-processor")]
#[command(about = "Derive daily, station, hourly and RFM risk views from air quality measurements")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress output and info logs")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Settings file [default: air-quality.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Overview of a measurement table
    Summary {
        #[arg(short, long, help = "Input CSV file")]
        input: Option<PathBuf>,

        #[arg(short, long, help = "Report format: text or json")]
        format: Option<String>,

        #[arg(short, long, help = "Write the report here instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Daily, pollutant, station and hourly views over a date range
    Aggregate {
        #[arg(short, long, help = "Input CSV file")]
        input: Option<PathBuf>,

        #[arg(short, long, help = "First date (YYYY-MM-DD) [default: earliest in table]")]
        start: Option<NaiveDate>,

        #[arg(short, long, help = "Last date (YYYY-MM-DD) [default: latest in table]")]
        end: Option<NaiveDate>,

        #[arg(short, long, help = "Pollutant for the per-station views")]
        pollutant: Option<Pollutant>,

        #[arg(short, long, help = "Report format: text or json")]
        format: Option<String>,

        #[arg(short, long, help = "Write the report here instead of stdout")]
        output: Option<PathBuf>,
    },

    /// RFM risk score and segment per station over the whole table
    Risk {
        #[arg(short, long, help = "Input CSV file")]
        input: Option<PathBuf>,

        #[arg(short, long, help = "Pollutant to score")]
        pollutant: Option<Pollutant>,

        #[arg(short, long, help = "Concentration a reading must exceed")]
        threshold: Option<f64>,

        #[arg(short = 'n', long, help = "Stations listed per RFM dimension")]
        top: Option<usize>,

        #[arg(long, default_value = "false", help = "Score every pollutant")]
        all_pollutants: bool,

        #[arg(short, long, help = "Report format: text or json")]
        format: Option<String>,

        #[arg(short, long, help = "Write the report here instead of stdout")]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_risk_command() {
        let cli = Cli::try_parse_from([
            "air-quality-processor",
            "risk",
            "-i",
            "all_data.csv",
            "-p",
            "NO2",
            "-t",
            "80",
        ])
        .unwrap();

        match cli.command {
            Commands::Risk {
                pollutant,
                threshold,
                all_pollutants,
                ..
            } => {
                assert_eq!(pollutant, Some(Pollutant::No2));
                assert_eq!(threshold, Some(80.0));
                assert!(!all_pollutants);
            }
            _ => panic!("expected risk command"),
        }
    }

    #[test]
    fn test_parse_aggregate_dates() {
        let cli = Cli::try_parse_from([
            "air-quality-processor",
            "aggregate",
            "--start",
            "2016-01-01",
            "--end",
            "2016-01-31",
        ])
        .unwrap();

        match cli.command {
            Commands::Aggregate { start, end, .. } => {
                assert_eq!(start, NaiveDate::from_ymd_opt(2016, 1, 1));
                assert_eq!(end, NaiveDate::from_ymd_opt(2016, 1, 31));
            }
            _ => panic!("expected aggregate command"),
        }
    }
}
