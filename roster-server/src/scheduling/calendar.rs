//! Calendar projection
//!
//! Month grids always cover whole Sunday-to-Saturday weeks. Cells outside
//! the target month are non-primary but still carry their shifts.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::models::{DateRange, Role, Shift, ShiftDetail};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarMode {
    #[default]
    Month,
    Week,
}

/// Anything that can be bucketed into a calendar cell
pub trait Scheduled {
    fn date(&self) -> NaiveDate;
    fn role(&self) -> Role;
}

impl Scheduled for Shift {
    fn date(&self) -> NaiveDate {
        self.shift_date
    }

    fn role(&self) -> Role {
        self.role
    }
}

impl Scheduled for ShiftDetail {
    fn date(&self) -> NaiveDate {
        self.shift.shift_date
    }

    fn role(&self) -> Role {
        self.shift.role
    }
}

/// Navigation state: mode plus a reference date
///
/// In month mode the anchor is normalized to the first of the month, in
/// week mode to the Sunday on or before the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarView {
    pub mode: CalendarMode,
    pub anchor: NaiveDate,
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn sunday_on_or_before(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

fn saturday_on_or_after(date: NaiveDate) -> NaiveDate {
    let forward = u64::from(6 - date.weekday().num_days_from_sunday());
    date.checked_add_days(Days::new(forward)).unwrap_or(date)
}

impl CalendarView {
    pub fn new(mode: CalendarMode, reference: NaiveDate) -> Self {
        let anchor = match mode {
            CalendarMode::Month => first_of_month(reference),
            CalendarMode::Week => sunday_on_or_before(reference),
        };
        Self { mode, anchor }
    }

    pub fn month(reference: NaiveDate) -> Self {
        Self::new(CalendarMode::Month, reference)
    }

    pub fn week(reference: NaiveDate) -> Self {
        Self::new(CalendarMode::Week, reference)
    }

    /// Visible window, inclusive on both ends
    pub fn window(&self) -> DateRange {
        match self.mode {
            CalendarMode::Month => {
                let first = self.anchor;
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(first);
                DateRange {
                    start: sunday_on_or_before(first),
                    end: saturday_on_or_after(last),
                }
            }
            CalendarMode::Week => DateRange {
                start: self.anchor,
                end: self.anchor.checked_add_days(Days::new(6)).unwrap_or(self.anchor),
            },
        }
    }

    /// Whether `date` belongs to the period being viewed (the month, or the week)
    pub fn is_primary(&self, date: NaiveDate) -> bool {
        match self.mode {
            CalendarMode::Month => {
                date.year() == self.anchor.year() && date.month() == self.anchor.month()
            }
            CalendarMode::Week => self.window().contains(date),
        }
    }

    pub fn previous(&self) -> Self {
        let reference = match self.mode {
            CalendarMode::Month => self.anchor.checked_sub_months(Months::new(1)),
            CalendarMode::Week => self.anchor.checked_sub_days(Days::new(7)),
        };
        Self::new(self.mode, reference.unwrap_or(self.anchor))
    }

    pub fn next(&self) -> Self {
        let reference = match self.mode {
            CalendarMode::Month => self.anchor.checked_add_months(Months::new(1)),
            CalendarMode::Week => self.anchor.checked_add_days(Days::new(7)),
        };
        Self::new(self.mode, reference.unwrap_or(self.anchor))
    }

    /// Jump to the period containing `today`, keeping the mode
    pub fn today(&self, today: NaiveDate) -> Self {
        Self::new(self.mode, today)
    }

    /// Heading for the view, e.g. "January 2025" or "Week of 2025-01-05"
    pub fn title(&self) -> String {
        match self.mode {
            CalendarMode::Month => self.anchor.format("%B %Y").to_string(),
            CalendarMode::Week => format!("Week of {}", self.anchor),
        }
    }
}

/// One day of the grid
#[derive(Debug, Clone, Serialize)]
pub struct CalendarCell<T> {
    pub date: NaiveDate,
    /// False for leading/trailing days from adjacent months
    pub is_primary: bool,
    pub is_today: bool,
    pub shifts_by_role: BTreeMap<Role, Vec<T>>,
}

impl<T> CalendarCell<T> {
    pub fn shift_count(&self) -> usize {
        self.shifts_by_role.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarGrid<T> {
    pub mode: CalendarMode,
    pub title: String,
    pub range: DateRange,
    pub today: NaiveDate,
    pub previous: NaiveDate,
    pub next: NaiveDate,
    /// Set when the shift fetch failed and the grid was rendered empty
    pub fetch_failed: bool,
    pub cells: Vec<CalendarCell<T>>,
}

impl<T> CalendarGrid<T> {
    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell<T>> {
        self.cells.iter().find(|c| c.date == date)
    }

    pub fn weeks(&self) -> usize {
        self.cells.len() / 7
    }
}

/// Build the grid for `view` and bucket `shifts` by date, then by role
///
/// `today` is taken once by the caller so every cell is compared against the
/// same date. Shifts outside the window are dropped; order within a role
/// bucket follows the input order.
pub fn project<T: Scheduled>(view: CalendarView, today: NaiveDate, shifts: Vec<T>) -> CalendarGrid<T> {
    let range = view.window();

    let mut buckets: BTreeMap<NaiveDate, BTreeMap<Role, Vec<T>>> = BTreeMap::new();
    for shift in shifts {
        let date = shift.date();
        if range.contains(date) {
            buckets
                .entry(date)
                .or_default()
                .entry(shift.role())
                .or_default()
                .push(shift);
        }
    }

    let cells = range
        .start
        .iter_days()
        .take_while(|date| *date <= range.end)
        .map(|date| CalendarCell {
            date,
            is_primary: view.is_primary(date),
            is_today: date == today,
            shifts_by_role: buckets.remove(&date).unwrap_or_default(),
        })
        .collect();

    CalendarGrid {
        mode: view.mode,
        title: view.title(),
        range,
        today,
        previous: view.previous().anchor,
        next: view.next().anchor,
        fetch_failed: false,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn shift(id: i64, date: &str, role: Role) -> Shift {
        Shift {
            id,
            restaurant_id: 1,
            employee_id: id,
            shift_date: d(date),
            role,
            period: None,
            start_time: None,
            end_time: None,
            notes: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_month_grid_covers_whole_weeks() {
        // Every month of 2024 and 2025 (includes 35- and 42-cell months)
        let mut sizes = std::collections::BTreeSet::new();
        for year in [2024, 2025] {
            for month in 1..=12 {
                let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
                let grid = project::<Shift>(CalendarView::month(first), first, vec![]);
                let n = grid.cells.len();
                assert_eq!(n % 7, 0);
                sizes.insert(n);

                // Starts on Sunday, ends on Saturday, no gaps
                assert_eq!(grid.cells[0].date.weekday().num_days_from_sunday(), 0);
                assert_eq!(grid.cells[n - 1].date.weekday().num_days_from_sunday(), 6);
                for pair in grid.cells.windows(2) {
                    assert_eq!(pair[0].date.succ_opt().unwrap(), pair[1].date);
                }

                // Every day of the month is present and primary
                let primary: Vec<_> = grid.cells.iter().filter(|c| c.is_primary).collect();
                assert_eq!(primary[0].date, first);
                assert!(primary.iter().all(|c| c.date.month() == month));
                let days_in_month = first
                    .checked_add_months(Months::new(1))
                    .unwrap()
                    .signed_duration_since(first)
                    .num_days() as usize;
                assert_eq!(primary.len(), days_in_month);
            }
        }
        assert!(sizes.contains(&35));
        assert!(sizes.contains(&42));
    }

    #[test]
    fn test_known_month_sizes() {
        // January 2025 starts on Wednesday: Dec 29 .. Feb 1
        let grid = project::<Shift>(CalendarView::month(d("2025-01-15")), d("2025-01-15"), vec![]);
        assert_eq!(grid.range.start, d("2024-12-29"));
        assert_eq!(grid.range.end, d("2025-02-01"));
        assert_eq!(grid.cells.len(), 35);
        assert_eq!(grid.title, "January 2025");

        // March 2025 starts on Saturday and has 31 days: 6 weeks
        let grid = project::<Shift>(CalendarView::month(d("2025-03-01")), d("2025-03-01"), vec![]);
        assert_eq!(grid.weeks(), 6);

        // February 2026 starts on Sunday in a non-leap year: exactly 4 weeks
        let grid = project::<Shift>(CalendarView::month(d("2026-02-10")), d("2026-02-10"), vec![]);
        assert_eq!(grid.cells.len(), 28);
        assert!(grid.cells.iter().all(|c| c.is_primary));
    }

    #[test]
    fn test_week_mode() {
        // 2025-01-10 is a Friday
        let view = CalendarView::week(d("2025-01-10"));
        assert_eq!(view.anchor, d("2025-01-05"));
        let grid = project::<Shift>(view, d("2025-01-10"), vec![]);
        assert_eq!(grid.cells.len(), 7);
        assert_eq!(grid.range.start, d("2025-01-05"));
        assert_eq!(grid.range.end, d("2025-01-11"));
        assert!(grid.cells.iter().all(|c| c.is_primary));

        // A Sunday is its own week start
        assert_eq!(CalendarView::week(d("2025-01-05")).anchor, d("2025-01-05"));
    }

    #[test]
    fn test_exactly_one_today_inside_window() {
        let today = d("2025-01-10");
        let grid = project::<Shift>(CalendarView::month(today), today, vec![]);
        let todays: Vec<_> = grid.cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].date, today);

        // Today falls in the trailing days of the previous month's grid
        let grid = project::<Shift>(CalendarView::month(d("2024-12-01")), d("2025-01-02"), vec![]);
        assert_eq!(grid.cells.iter().filter(|c| c.is_today).count(), 1);

        let grid = project::<Shift>(CalendarView::month(d("2025-03-01")), today, vec![]);
        assert_eq!(grid.cells.iter().filter(|c| c.is_today).count(), 0);
        let grid = project::<Shift>(CalendarView::week(d("2025-01-20")), today, vec![]);
        assert_eq!(grid.cells.iter().filter(|c| c.is_today).count(), 0);
    }

    #[test]
    fn test_bucketing_by_date_then_role() {
        let shifts = vec![
            shift(1, "2025-01-10", Role::Server),
            shift(2, "2025-01-10", Role::Door),
            shift(3, "2025-01-10", Role::Server),
            // Trailing day from February, still in the January grid
            shift(4, "2025-02-01", Role::Gelato),
            // Outside the window
            shift(5, "2025-02-02", Role::Server),
        ];
        let grid = project(CalendarView::month(d("2025-01-01")), d("2025-01-01"), shifts);

        let cell = grid.cell(d("2025-01-10")).unwrap();
        assert_eq!(cell.shift_count(), 3);
        let servers: Vec<i64> = cell.shifts_by_role[&Role::Server].iter().map(|s| s.id).collect();
        assert_eq!(servers, vec![1, 3]);
        assert_eq!(cell.shifts_by_role[&Role::Door].len(), 1);

        let trailing = grid.cell(d("2025-02-01")).unwrap();
        assert!(!trailing.is_primary);
        assert_eq!(trailing.shift_count(), 1);

        let total: usize = grid.cells.iter().map(|c| c.shift_count()).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_navigation() {
        let view = CalendarView::month(d("2025-01-31"));
        assert_eq!(view.anchor, d("2025-01-01"));
        assert_eq!(view.next().anchor, d("2025-02-01"));
        assert_eq!(view.previous().anchor, d("2024-12-01"));
        assert_eq!(view.next().today(d("2025-01-10")), view);

        let week = CalendarView::week(d("2025-01-10"));
        assert_eq!(week.next().anchor, d("2025-01-12"));
        assert_eq!(week.previous().anchor, d("2024-12-29"));

        let grid = project::<Shift>(view, d("2025-01-10"), vec![]);
        assert_eq!(grid.previous, d("2024-12-01"));
        assert_eq!(grid.next, d("2025-02-01"));
    }

    #[test]
    fn test_mode_serde() {
        let mode: CalendarMode = serde_json::from_str("\"week\"").unwrap();
        assert_eq!(mode, CalendarMode::Week);
        assert_eq!(CalendarMode::default(), CalendarMode::Month);
    }
}
