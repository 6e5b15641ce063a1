//! Preset report periods such as "This Month" or "Last Year".

use std::{fmt::Display, str::FromStr};

use time::{Date, Month};

use crate::report::DateFilter;

/// A named date range relative to today, or a custom range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportPeriod {
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
    /// The range is given by the `startDate` and `endDate` parameters.
    #[default]
    Custom,
}

impl ReportPeriod {
    /// Every period, in the order they are offered.
    pub const ALL: [ReportPeriod; 5] = [
        ReportPeriod::ThisMonth,
        ReportPeriod::LastMonth,
        ReportPeriod::ThisYear,
        ReportPeriod::LastYear,
        ReportPeriod::Custom,
    ];

    /// The value used in the `period` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::ThisMonth => "this-month",
            ReportPeriod::LastMonth => "last-month",
            ReportPeriod::ThisYear => "this-year",
            ReportPeriod::LastYear => "last-year",
            ReportPeriod::Custom => "custom",
        }
    }

    /// The name shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            ReportPeriod::ThisMonth => "This Month",
            ReportPeriod::LastMonth => "Last Month",
            ReportPeriod::ThisYear => "This Year",
            ReportPeriod::LastYear => "Last Year",
            ReportPeriod::Custom => "Custom Range",
        }
    }

    /// The inclusive bounds of the period as seen from `today`.
    ///
    /// The current month and year end today. Returns `None` for
    /// [ReportPeriod::Custom], or if the period falls outside the supported
    /// calendar.
    pub fn date_filter(&self, today: Date) -> Option<DateFilter> {
        let (start, end) = match self {
            ReportPeriod::ThisMonth => (today.replace_day(1).ok()?, today),
            ReportPeriod::LastMonth => {
                let end = today.replace_day(1).ok()?.previous_day()?;
                (end.replace_day(1).ok()?, end)
            }
            ReportPeriod::ThisYear => (first_of_year(today.year())?, today),
            ReportPeriod::LastYear => {
                let start = first_of_year(today.year() - 1)?;
                let end = Date::from_calendar_date(start.year(), Month::December, 31).ok()?;
                (start, end)
            }
            ReportPeriod::Custom => return None,
        };

        Some(DateFilter {
            start: Some(start),
            end: Some(end),
        })
    }
}

fn first_of_year(year: i32) -> Option<Date> {
    Date::from_calendar_date(year, Month::January, 1).ok()
}

impl Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The error returned for an unknown `period` value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown report period \"{0}\"")]
pub struct InvalidReportPeriod(pub String);

impl FromStr for ReportPeriod {
    type Err = InvalidReportPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportPeriod::ALL
            .into_iter()
            .find(|period| period.as_str() == s)
            .ok_or_else(|| InvalidReportPeriod(s.to_owned()))
    }
}
