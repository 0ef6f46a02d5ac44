//! Shift Model (排班)

use super::role::Role;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Half-day period of a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum ShiftPeriod {
    Am,
    Pm,
}

impl ShiftPeriod {
    /// Default (start, end) times used when a period is given without times
    pub fn default_times(&self) -> (&'static str, &'static str) {
        match self {
            ShiftPeriod::Am => ("09:00", "17:00"),
            ShiftPeriod::Pm => ("17:00", "23:00"),
        }
    }
}

/// Shift record: one employee, one role, one restaurant, one date
///
/// Shifts are never updated in place, only created and deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: i64,
    pub restaurant_id: i64,
    pub employee_id: i64,
    pub shift_date: NaiveDate,
    pub role: Role,
    pub period: Option<ShiftPeriod>,
    /// "HH:MM"
    pub start_time: Option<String>,
    /// "HH:MM"
    pub end_time: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Create shift payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCreate {
    pub restaurant_id: i64,
    pub employee_id: i64,
    pub shift_date: NaiveDate,
    pub role: Role,
    pub period: Option<ShiftPeriod>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub notes: Option<String>,
}

/// Shift joined with display names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShiftDetail {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub shift: Shift,
    pub employee_name: String,
    pub restaurant_name: String,
}

/// Inclusive date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the window (both ends included)
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
