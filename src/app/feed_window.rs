use chrono::NaiveDate;

use crate::constants::{FEED_DATE_FORMAT, MAX_FEED_WINDOW_DAYS};
use crate::error::{NeoError, Result};

/// Date range forwarded to the upstream feed endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedWindow {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl FeedWindow {
    /// Parse optional caller-supplied dates. `None` when neither is given.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>> {
        let start = start.map(str::trim).filter(|s| !s.is_empty());
        let end = end.map(str::trim).filter(|s| !s.is_empty());

        let start_date = match (start, end) {
            (None, None) => return Ok(None),
            (None, Some(_)) => {
                return Err(NeoError::Validation("end_date requires start_date".to_string()))
            }
            (Some(s), _) => parse_date("start_date", s)?,
        };
        let end_date = end.map(|e| parse_date("end_date", e)).transpose()?;

        if let Some(end_date) = end_date {
            let span = (end_date - start_date).num_days();
            if span < 0 {
                return Err(NeoError::Validation(
                    "end_date must not be before start_date".to_string(),
                ));
            }
            if span > MAX_FEED_WINDOW_DAYS {
                return Err(NeoError::Validation(format!(
                    "feed window may span at most {} days",
                    MAX_FEED_WINDOW_DAYS
                )));
            }
        }

        Ok(Some(Self { start_date, end_date }))
    }

    /// Query pairs in upstream parameter names
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("start_date", self.start_date.format(FEED_DATE_FORMAT).to_string())];
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.format(FEED_DATE_FORMAT).to_string()));
        }
        pairs
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, FEED_DATE_FORMAT)
        .map_err(|_| NeoError::Validation(format!("{} must be YYYY-MM-DD, got '{}'", field, value)))
}
