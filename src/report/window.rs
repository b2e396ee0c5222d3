use crate::error::{Result, SentinelError};
use chrono::{DateTime, Duration, NaiveDate, Utc};

const BOUND_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Longest rolling period a report may cover
pub const MAX_PERIOD_DAYS: u32 = 30;

/// The period a report covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportWindow {
    /// Explicit calendar dates, each taken at midnight UTC
    Range { since: NaiveDate, until: NaiveDate },
    /// The last `days` days, ending now
    Period { days: u32 },
}

impl ReportWindow {
    /// Build a range from two `YYYY-MM-DD` strings
    pub fn range(since: &str, until: &str) -> Result<Self> {
        let since = parse_date(since)?;
        let until = parse_date(until)?;
        if since > until {
            return Err(SentinelError::InvalidTimespan(format!(
                "start date {} is after end date {}",
                since, until
            )));
        }
        Ok(Self::Range { since, until })
    }

    pub fn period(days: u32) -> Result<Self> {
        if !(1..=MAX_PERIOD_DAYS).contains(&days) {
            return Err(SentinelError::InvalidTimespan(format!(
                "period must be between 1 and {} days, got {}",
                MAX_PERIOD_DAYS, days
            )));
        }
        Ok(Self::Period { days })
    }

    /// The `(since, until)` bounds sent upstream, relative to `now` for periods
    pub fn bounds_at(&self, now: DateTime<Utc>) -> (String, String) {
        match self {
            Self::Range { since, until } => (
                since.format("%Y-%m-%dT00:00:00Z").to_string(),
                until.format("%Y-%m-%dT00:00:00Z").to_string(),
            ),
            Self::Period { days } => {
                let since = now
                    .checked_sub_signed(Duration::days(i64::from(*days)))
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                (
                    since.format(BOUND_FORMAT).to_string(),
                    now.format(BOUND_FORMAT).to_string(),
                )
            }
        }
    }

    pub fn bounds(&self) -> (String, String) {
        self.bounds_at(Utc::now())
    }

    /// Number of days covered
    pub fn days(&self) -> u32 {
        match self {
            Self::Range { since, until } => (*until - *since).num_days().max(0) as u32,
            Self::Period { days } => *days,
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        SentinelError::invalid_timestamp(format!("{} (expected YYYY-MM-DD)", value.trim()))
    })
}
