//! Scheduling service
//!
//! Orchestrates the check → confirm → persist round trip for shifts and
//! serves calendar windows through [`ShiftWindowCache`].

use chrono::NaiveDate;
use serde::Serialize;
use shared::models::{Employee, Restaurant, Shift, ShiftCreate, ShiftDetail};
use std::collections::HashMap;
use std::sync::Arc;

use super::cache::ShiftWindowCache;
use super::calendar::{self, CalendarGrid, CalendarView};
use super::rules::{AssignmentChecker, AssignmentDecision, CrossLocationConflict, RejectReason};
use crate::db::repository::RepoError;
use crate::store::{EmployeeFilter, ScheduleStore};
use crate::utils::time::normalize_shift_times;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Result of asking to create a shift
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShiftProposal {
    /// Persisted; `warnings` lists same-day shifts elsewhere that were confirmed
    Created {
        shift: Shift,
        warnings: Vec<CrossLocationConflict>,
    },
    /// Nothing written; resubmit with `confirm = true` to accept the conflicts
    ConfirmationRequired {
        conflicts: Vec<CrossLocationConflict>,
    },
}

#[derive(Clone)]
pub struct ScheduleService {
    store: Arc<dyn ScheduleStore>,
    checker: Arc<AssignmentChecker>,
    cache: Arc<ShiftWindowCache>,
}

impl std::fmt::Debug for ScheduleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleService")
            .field("checker", &self.checker)
            .field("cached_windows", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Fill in period default times, canonicalize times to `HH:MM`, trim notes
fn normalize(mut req: ShiftCreate) -> AppResult<ShiftCreate> {
    if let Some(period) = req.period
        && req.start_time.is_none()
        && req.end_time.is_none()
    {
        let (start, end) = period.default_times();
        req.start_time = Some(start.to_string());
        req.end_time = Some(end.to_string());
    }
    req.notes = req
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    (req.start_time, req.end_time) =
        normalize_shift_times(req.start_time.as_deref(), req.end_time.as_deref())?;
    validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN)?;
    Ok(req)
}

impl ScheduleService {
    pub fn new(store: Arc<dyn ScheduleStore>, checker: AssignmentChecker) -> Self {
        Self {
            store,
            checker: Arc::new(checker),
            cache: Arc::new(ShiftWindowCache::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn ScheduleStore> {
        &self.store
    }

    pub fn cache(&self) -> &ShiftWindowCache {
        &self.cache
    }

    async fn load_restaurant(&self, id: i64) -> AppResult<Restaurant> {
        self.store.get_restaurant(id).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::RestaurantNotFound, format!("Restaurant {id} not found"))
        })
    }

    async fn load_employee(&self, id: i64) -> AppResult<Employee> {
        self.store.get_employee(id).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found"))
        })
    }

    /// Whether the employee is linked to the restaurant
    pub async fn is_linked(&self, employee_id: i64, restaurant_id: i64) -> AppResult<bool> {
        let links = self.store.list_employee_links(employee_id).await?;
        Ok(links.iter().any(|l| l.restaurant_id == restaurant_id))
    }

    async fn evaluate(&self, req: &ShiftCreate) -> AppResult<(Employee, AssignmentDecision)> {
        let employee = self.load_employee(req.employee_id).await?;
        let restaurant = self.load_restaurant(req.restaurant_id).await?;

        if !self.is_linked(employee.id, restaurant.id).await? {
            return Err(AppError::with_message(
                ErrorCode::NotLinked,
                format!("{} does not work at {}", employee.name, restaurant.name),
            )
            .with_detail("employee_id", employee.id)
            .with_detail("restaurant_id", restaurant.id));
        }

        let existing = self
            .store
            .list_shifts_for_employee_on(employee.id, req.shift_date)
            .await?;
        let decision = self
            .checker
            .check(&employee, &restaurant, req.shift_date, req.role, &existing);
        Ok((employee, decision))
    }

    /// Dry-run a proposed shift; nothing is written
    pub async fn check_assignment(&self, req: ShiftCreate) -> AppResult<AssignmentDecision> {
        let req = normalize(req)?;
        let (_, decision) = self.evaluate(&req).await?;
        Ok(decision)
    }

    /// Check and, if allowed, persist a shift
    ///
    /// Cross-location conflicts require `confirm`; without it the conflicts
    /// are returned and nothing is written. Rejections become errors.
    pub async fn propose_shift(&self, req: ShiftCreate, confirm: bool) -> AppResult<ShiftProposal> {
        let req = normalize(req)?;
        let (employee, decision) = self.evaluate(&req).await?;

        let warnings = match decision {
            AssignmentDecision::Rejected(reason) => {
                tracing::info!(
                    employee_id = employee.id,
                    restaurant_id = req.restaurant_id,
                    date = %req.shift_date,
                    code = %reason.code(),
                    "Shift rejected"
                );
                return Err(reason.into());
            }
            AssignmentDecision::AcceptedWithWarning(conflicts) if !confirm => {
                return Ok(ShiftProposal::ConfirmationRequired { conflicts });
            }
            AssignmentDecision::AcceptedWithWarning(conflicts) => conflicts,
            AssignmentDecision::Accepted => Vec::new(),
        };

        let date = req.shift_date;
        let shift = match self.store.create_shift(req).await {
            Ok(shift) => shift,
            // Lost a race against a concurrent insert
            Err(RepoError::Duplicate(_)) => {
                return Err(RejectReason::DuplicateShift {
                    employee_name: employee.name,
                    date,
                    existing_shift_id: None,
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        };

        self.cache.invalidate(shift.restaurant_id, shift.shift_date);
        tracing::info!(
            shift_id = shift.id,
            employee_id = shift.employee_id,
            restaurant_id = shift.restaurant_id,
            date = %shift.shift_date,
            role = %shift.role,
            cross_location = warnings.len(),
            "Shift created"
        );
        Ok(ShiftProposal::Created { shift, warnings })
    }

    pub async fn delete_shift(&self, id: i64) -> AppResult<Shift> {
        let shift = self.store.delete_shift(id).await.map_err(|e| match e {
            RepoError::NotFound(_) => {
                AppError::with_message(ErrorCode::ShiftNotFound, format!("Shift {id} not found"))
            }
            other => other.into(),
        })?;
        self.cache.invalidate(shift.restaurant_id, shift.shift_date);
        tracing::info!(shift_id = id, restaurant_id = shift.restaurant_id, "Shift deleted");
        Ok(shift)
    }

    /// Shifts of a restaurant in an inclusive window, served from cache when possible
    pub async fn list_shifts(
        &self,
        restaurant_id: i64,
        range: shared::models::DateRange,
    ) -> AppResult<Arc<Vec<Shift>>> {
        if let Some(hit) = self.cache.get(restaurant_id, range) {
            return Ok(hit);
        }
        let ticket = self.cache.begin_fill(restaurant_id, range);
        let shifts = Arc::new(self.store.list_shifts(restaurant_id, range).await?);
        self.cache.complete_fill(ticket, Arc::clone(&shifts));
        Ok(shifts)
    }

    /// Project the calendar grid for a restaurant
    ///
    /// An unknown restaurant is an error. A failed shift fetch renders the
    /// grid empty with `fetch_failed` set.
    pub async fn calendar(
        &self,
        restaurant_id: i64,
        view: CalendarView,
        today: NaiveDate,
    ) -> AppResult<CalendarGrid<ShiftDetail>> {
        let restaurant = self.load_restaurant(restaurant_id).await?;
        let range = view.window();

        let (shifts, fetch_failed) = match self.list_shifts(restaurant_id, range).await {
            Ok(shifts) => (shifts, false),
            Err(e) => {
                tracing::warn!(
                    restaurant_id,
                    start = %range.start,
                    end = %range.end,
                    error = %e,
                    "Failed to load shifts for calendar window"
                );
                (Arc::new(Vec::new()), true)
            }
        };

        let names: HashMap<i64, String> = if shifts.is_empty() {
            HashMap::new()
        } else {
            match self
                .store
                .list_employees(EmployeeFilter::ByRestaurant(restaurant_id))
                .await
            {
                Ok(employees) => employees.into_iter().map(|e| (e.id, e.name)).collect(),
                Err(e) => {
                    tracing::warn!(restaurant_id, error = %e, "Failed to load employee names");
                    HashMap::new()
                }
            }
        };

        let details: Vec<ShiftDetail> = shifts
            .iter()
            .map(|shift| ShiftDetail {
                employee_name: names
                    .get(&shift.employee_id)
                    .cloned()
                    .unwrap_or_else(|| format!("#{}", shift.employee_id)),
                restaurant_name: restaurant.name.clone(),
                shift: shift.clone(),
            })
            .collect();

        let mut grid = calendar::project(view, today, details);
        grid.fetch_failed = fetch_failed;
        Ok(grid)
    }

    /// Drop every cached window of a restaurant (after link removals)
    pub fn invalidate_restaurant(&self, restaurant_id: i64) {
        self.cache.invalidate_restaurant(restaurant_id);
    }
}
