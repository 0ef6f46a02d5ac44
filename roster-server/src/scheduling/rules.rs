//! Shift assignment rules
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. role eligibility (`RoleMismatch`)
//! 2. role offered at this restaurant (`RoleNotOffered`)
//! 3. one shift per employee per restaurant per day (`DuplicateShift`)
//! 4. same-day shifts at other restaurants (warning only)

use chrono::NaiveDate;
use serde::Serialize;
use shared::models::{Employee, Restaurant, Role, ShiftDetail, UnknownRole};
use shared::{AppError, ErrorCode};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Roles restricted to specific restaurants, matched by name
///
/// Parsed from `ROLE_RESTRICTIONS`, e.g.
/// `gelato=Gelateria Centrale,Gelateria Nord;door=Trattoria`.
/// Roles without an entry are offered everywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRestrictions {
    by_role: HashMap<Role, BTreeSet<String>>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RestrictionParseError {
    #[error("expected `role=restaurant[,restaurant...]`, got `{0}`")]
    MissingSeparator(String),
    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),
    #[error("no restaurants listed for role {0}")]
    EmptyList(Role),
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl RoleRestrictions {
    pub fn parse(input: &str) -> Result<Self, RestrictionParseError> {
        let mut restrictions = Self::default();
        for entry in input.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (role, names) = entry
                .split_once('=')
                .ok_or_else(|| RestrictionParseError::MissingSeparator(entry.to_string()))?;
            let role: Role = role.parse()?;
            let names: Vec<&str> = names
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .collect();
            if names.is_empty() {
                return Err(RestrictionParseError::EmptyList(role));
            }
            restrictions = restrictions.restrict(role, names);
        }
        Ok(restrictions)
    }

    /// Offer `role` only at the named restaurants (adds to any existing list)
    pub fn restrict<I, S>(mut self, role: Role, restaurants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.by_role
            .entry(role)
            .or_default()
            .extend(restaurants.into_iter().map(|n| normalize(n.as_ref())));
        self
    }

    pub fn is_offered(&self, role: Role, restaurant_name: &str) -> bool {
        match self.by_role.get(&role) {
            Some(names) => names.contains(&normalize(restaurant_name)),
            None => true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_role.is_empty()
    }

    /// Roles offered at a restaurant, in display order
    pub fn roles_offered_at(&self, restaurant_name: &str) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|r| self.is_offered(*r, restaurant_name))
            .collect()
    }
}

/// An existing same-day shift at another restaurant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossLocationConflict {
    pub shift_id: i64,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub role: Role,
}

/// Why a proposed shift is blocked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    RoleMismatch {
        employee_name: String,
        role: Role,
    },
    RoleNotOffered {
        role: Role,
        restaurant_name: String,
    },
    /// `existing_shift_id` is `None` when only the storage constraint caught it
    DuplicateShift {
        employee_name: String,
        date: NaiveDate,
        existing_shift_id: Option<i64>,
    },
}

impl RejectReason {
    pub fn code(&self) -> ErrorCode {
        match self {
            RejectReason::RoleMismatch { .. } => ErrorCode::RoleMismatch,
            RejectReason::RoleNotOffered { .. } => ErrorCode::RoleNotOffered,
            RejectReason::DuplicateShift { .. } => ErrorCode::DuplicateShift,
        }
    }
}

impl From<RejectReason> for AppError {
    fn from(reason: RejectReason) -> Self {
        let code = reason.code();
        match reason {
            RejectReason::RoleMismatch {
                employee_name,
                role,
            } => AppError::with_message(
                code,
                format!("{employee_name} does not have the {} role", role.label()),
            )
            .with_detail("role", role.as_str()),
            RejectReason::RoleNotOffered {
                role,
                restaurant_name,
            } => AppError::with_message(
                code,
                format!("{} is not offered at {restaurant_name}", role.label()),
            )
            .with_detail("role", role.as_str())
            .with_detail("restaurant_name", restaurant_name),
            RejectReason::DuplicateShift {
                employee_name,
                date,
                existing_shift_id,
            } => {
                let err = AppError::with_message(
                    code,
                    format!("{employee_name} already has a shift here on {date}"),
                )
                .with_detail("date", date.to_string());
                match existing_shift_id {
                    Some(id) => err.with_detail("existing_shift_id", id),
                    None => err,
                }
            }
        }
    }
}

/// Outcome of checking a proposed shift
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "details", rename_all = "snake_case")]
pub enum AssignmentDecision {
    Accepted,
    AcceptedWithWarning(Vec<CrossLocationConflict>),
    Rejected(RejectReason),
}

impl AssignmentDecision {
    pub fn is_rejected(&self) -> bool {
        matches!(self, AssignmentDecision::Rejected(_))
    }
}

/// Pure decision function for proposed shifts
#[derive(Debug, Clone, Default)]
pub struct AssignmentChecker {
    restrictions: RoleRestrictions,
}

impl AssignmentChecker {
    pub fn new(restrictions: RoleRestrictions) -> Self {
        Self { restrictions }
    }

    pub fn restrictions(&self) -> &RoleRestrictions {
        &self.restrictions
    }

    /// Decide whether `employee` may work `role` at `restaurant` on `date`
    ///
    /// `existing` holds the employee's shifts on that date at any restaurant;
    /// rows for other employees or other dates are ignored.
    pub fn check(
        &self,
        employee: &Employee,
        restaurant: &Restaurant,
        date: NaiveDate,
        role: Role,
        existing: &[ShiftDetail],
    ) -> AssignmentDecision {
        if !employee.has_role(role) {
            return AssignmentDecision::Rejected(RejectReason::RoleMismatch {
                employee_name: employee.name.clone(),
                role,
            });
        }

        if !self.restrictions.is_offered(role, &restaurant.name) {
            return AssignmentDecision::Rejected(RejectReason::RoleNotOffered {
                role,
                restaurant_name: restaurant.name.clone(),
            });
        }

        let same_day = existing
            .iter()
            .filter(|s| s.shift.employee_id == employee.id && s.shift.shift_date == date);

        let mut conflicts = Vec::new();
        for s in same_day {
            if s.shift.restaurant_id == restaurant.id {
                return AssignmentDecision::Rejected(RejectReason::DuplicateShift {
                    employee_name: employee.name.clone(),
                    date,
                    existing_shift_id: Some(s.shift.id),
                });
            }
            conflicts.push(CrossLocationConflict {
                shift_id: s.shift.id,
                restaurant_id: s.shift.restaurant_id,
                restaurant_name: s.restaurant_name.clone(),
                role: s.shift.role,
            });
        }

        if conflicts.is_empty() {
            AssignmentDecision::Accepted
        } else {
            AssignmentDecision::AcceptedWithWarning(conflicts)
        }
    }
}
