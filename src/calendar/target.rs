use super::util::YearMonth;
use thiserror::Error;
use time::{Date, Month};

/// The request parameters that select what to show
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct RequestParams {
    /// Month to show, as `YYYYMM`
    pub(crate) month: Option<String>,
    /// Day to select, as `YYYYMMDD`
    pub(crate) day: Option<String>,
}

impl RequestParams {
    pub(crate) fn month<S: Into<String>>(month: S) -> RequestParams {
        RequestParams {
            month: Some(month.into()),
            day: None,
        }
    }
}

/// The month being viewed, plus the selected day if one was requested
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct TargetDate {
    pub(crate) month: YearMonth,
    pub(crate) day: Option<Date>,
}

impl TargetDate {
    pub(crate) fn for_month(month: YearMonth) -> TargetDate {
        TargetDate { month, day: None }
    }

    pub(crate) fn month_begin(&self) -> Option<Date> {
        self.month.first_day()
    }

    pub(crate) fn month_end(&self) -> Option<Date> {
        self.month.last_day()
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum ResolveError {
    #[error("page not found: invalid {param} parameter {value:?}")]
    NotFound { param: &'static str, value: String },
}

/// Determines the month to show.  A `month` parameter takes precedence over
/// `day`; without either, the month containing `today` is shown.  Empty
/// parameters count as absent.  A well-formed `day` is kept as the selected
/// day even when `month` picks the month.
pub(crate) fn resolve_target_date(
    params: &RequestParams,
    today: Date,
) -> Result<TargetDate, ResolveError> {
    if let Some(month) = present(params.month.as_deref()) {
        let month = parse_year_month(month).ok_or_else(|| ResolveError::NotFound {
            param: "month",
            value: month.to_owned(),
        })?;
        Ok(TargetDate {
            month,
            day: present(params.day.as_deref()).and_then(parse_date_key),
        })
    } else if let Some(day) = present(params.day.as_deref()) {
        let date = parse_date_key(day).ok_or_else(|| ResolveError::NotFound {
            param: "day",
            value: day.to_owned(),
        })?;
        Ok(TargetDate {
            month: YearMonth::of(date),
            day: Some(date),
        })
    } else {
        Ok(TargetDate::for_month(YearMonth::of(today)))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Parses `YYYYMM`
pub(crate) fn parse_year_month(s: &str) -> Option<YearMonth> {
    let (year, month) = split_digits(s, 6)?;
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    let ym = YearMonth::new(year.parse().ok()?, month);
    // Rejects years the calendar cannot represent
    ym.first_day().map(|_| ym)
}

/// Parses `YYYYMMDD`
pub(crate) fn parse_date_key(s: &str) -> Option<Date> {
    let (year, rest) = split_digits(s, 8)?;
    let (month, day) = rest.split_at(2);
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    Date::from_calendar_date(year.parse().ok()?, month, day.parse().ok()?).ok()
}

// Checks that `s` is exactly `len` ASCII digits and splits off the year
fn split_digits(s: &str, len: usize) -> Option<(&str, &str)> {
    (s.len() == len && s.bytes().all(|b| b.is_ascii_digit())).then(|| s.split_at(4))
}
