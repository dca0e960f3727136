use crate::error::{ProcessingError, Result};
use crate::models::{AirQualityRecord, DayPeriod};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::debug;

/// A record retained by [`TimeFilter`], labelled day or night.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRecord {
    pub record: AirQualityRecord,
    pub period: DayPeriod,
}

impl AsRef<AirQualityRecord> for PeriodRecord {
    fn as_ref(&self) -> &AirQualityRecord {
        &self.record
    }
}

/// Inclusive timestamp window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFilter {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeFilter {
    /// Window from midnight of `start` to midnight of `end`, both inclusive.
    ///
    /// Readings taken after 00:00 on `end` fall outside the window. Use
    /// [`TimeFilter::between`] to choose a different cut.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        Self::between(start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN))
    }

    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(ProcessingError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// Copy the records inside the window, attaching the day/night label.
    /// The source slice is left untouched.
    pub fn apply(&self, records: &[AirQualityRecord]) -> Vec<PeriodRecord> {
        let retained: Vec<PeriodRecord> = records
            .iter()
            .filter(|r| self.contains(r.timestamp))
            .map(|r| PeriodRecord {
                record: r.clone(),
                period: r.period(),
            })
            .collect();

        debug!(
            start = %self.start,
            end = %self.end,
            input = records.len(),
            retained = retained.len(),
            "Applied time filter"
        );

        retained
    }
}

/// Records with `start <= timestamp <= end`, compared at midnight of each date.
///
/// Hourly readings on `end` after 00:00 are dropped. For whole-day selection
/// use [`TimeFilter::between`] with `end` at 23:59:59 instead.
pub fn filter(
    records: &[AirQualityRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PeriodRecord>> {
    Ok(TimeFilter::new(start, end)?.apply(records))
}

/// Earliest and latest calendar dates in the table
pub fn date_bounds(records: &[AirQualityRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let min = records.iter().map(|r| r.timestamp).min()?;
    let max = records.iter().map(|r| r.timestamp).max()?;
    Some((min.date(), max.date()))
}
