//! Statutory report generation (GSTR-1 and GSTR-3B)

pub mod gstr1;
pub mod gstr3b;

pub use gstr1::*;
pub use gstr3b::*;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{RetailError, RetailResult};

/// Inclusive date range for a statutory filing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportingPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> RetailResult<Self> {
        if start > end {
            return Err(RetailError::InvalidInput(format!(
                "period start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// The full calendar month `year`-`month`
    pub fn month(year: i32, month: u32) -> RetailResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            RetailError::InvalidInput(format!("invalid reporting month {}-{}", year, month))
        })?;
        let first_of_next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .expect("first day of month is always valid");
        let end = first_of_next.pred_opt().expect("previous day exists");
        Ok(Self { start, end })
    }

    /// The calendar month before the one containing `today`
    ///
    /// The conventional GSTR-1 filing period.
    pub fn previous_month(today: NaiveDate) -> Self {
        let (year, month) = if today.month() == 1 {
            (today.year() - 1, 12)
        } else {
            (today.year(), today.month() - 1)
        };
        Self::month(year, month).expect("previous calendar month is always valid")
    }

    /// Four-digit year of the period start
    pub fn year(&self) -> String {
        format!("{:04}", self.start.year())
    }

    /// Two-digit month of the period start
    pub fn month_str(&self) -> String {
        format!("{:02}", self.start.month())
    }

    /// Statutory filing period string, `MMYYYY`
    pub fn filing_period(&self) -> String {
        format!("{:02}{:04}", self.start.month(), self.start.year())
    }
}
