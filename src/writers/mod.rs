pub mod report_writer;

pub use report_writer::{AggregateReport, ReportFormat, ReportWriter, RiskOverview, TopStations};
