use chrono::NaiveDate;

use crate::error::PipelineError;

const DATE_FORMAT: &str = "%m/%d/%Y";
const LAST_HOUR: u32 = 23;

/// Which hours of the station's archive to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSpec {
    /// Whatever the live playlist page shows right now
    Current,
    /// The given hours of one calendar day, ascending
    Historical { date: NaiveDate, hours: Vec<u32> },
}

/// Whether the upper bound of an `a-b` hour range is fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeEnd {
    /// `7-10` fetches 7, 8 and 9
    #[default]
    Exclusive,
    /// `7-10` fetches 7 through 10
    Inclusive,
}

/// Turn the `--hour` and `--mdy` arguments into a fetch window.
///
/// With neither argument the live page is used. Otherwise the date comes from
/// `mdy` (strict `month/day/year`) or falls back to `today`, and `hour` is a
/// single hour or an `a-b` range.
pub fn resolve(
    hour: Option<&str>,
    mdy: Option<&str>,
    today: NaiveDate,
    range_end: RangeEnd,
) -> Result<TimeSpec, PipelineError> {
    if hour.is_none() && mdy.is_none() {
        return Ok(TimeSpec::Current);
    }

    let date = match mdy {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| {
            PipelineError::InvalidTimeSpec(format!("date '{raw}' is not month/day/year: {e}"))
        })?,
        None => today,
    };

    let hour = hour.ok_or_else(|| {
        PipelineError::InvalidTimeSpec("an hour is required when a date is given".to_string())
    })?;

    Ok(TimeSpec::Historical {
        date,
        hours: parse_hours(hour, range_end)?,
    })
}

fn parse_hours(raw: &str, range_end: RangeEnd) -> Result<Vec<u32>, PipelineError> {
    let bounds: Vec<&str> = raw.split('-').collect();

    let (start, last) = match bounds.as_slice() {
        [single] => {
            let hour = parse_number(single)?;
            (hour, hour)
        }
        [start, end] => {
            let (start, end) = (parse_number(start)?, parse_number(end)?);
            match range_end {
                RangeEnd::Exclusive if start >= end => return Err(empty_range(raw)),
                RangeEnd::Exclusive => (start, end - 1),
                RangeEnd::Inclusive if start > end => return Err(empty_range(raw)),
                RangeEnd::Inclusive => (start, end),
            }
        }
        _ => {
            return Err(PipelineError::InvalidTimeSpec(format!(
                "hour '{raw}' is neither an hour nor an a-b range"
            )));
        }
    };

    // Bounds are checked before the range is expanded
    if last > LAST_HOUR {
        return Err(PipelineError::InvalidTimeSpec(format!(
            "hour {last} is outside 0-{LAST_HOUR}"
        )));
    }

    Ok((start..=last).collect())
}

fn empty_range(raw: &str) -> PipelineError {
    PipelineError::InvalidTimeSpec(format!("hour range '{raw}' contains no hours"))
}

fn parse_number(raw: &str) -> Result<u32, PipelineError> {
    raw.trim()
        .parse()
        .map_err(|_| PipelineError::InvalidTimeSpec(format!("hour '{raw}' is not a number")))
}
