pub mod aggregator;
pub mod ranking;
pub mod risk_scorer;
pub mod station_insights;
pub mod time_filter;

pub use aggregator::{daily_mean, hourly_means, pollutant_totals, station_means};
pub use ranking::{average_rank, normalize, normalized_rank, RankOrder};
pub use risk_scorer::{segment_distribution, top_stations, RiskScorer};
pub use station_insights::{
    period_comparison, ranked_station_means, station_daily_trend, wind_distribution,
};
pub use time_filter::{date_bounds, filter, PeriodRecord, TimeFilter};
