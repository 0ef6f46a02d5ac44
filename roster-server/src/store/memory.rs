//! In-process [`ScheduleStore`]
//!
//! Mirrors the SQLite schema constraints (unique keys, foreign keys,
//! cascades) so tests exercise the same failure modes.

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use shared::models::{
    Admin, DateRange, Employee, EmployeeRestaurant, Restaurant, RestaurantCreate, Shift,
    ShiftCreate, ShiftDetail, UnlinkOutcome,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{EmployeeFilter, NewEmployee, ScheduleStore};
use crate::db::repository::{RepoError, RepoResult};

#[derive(Debug, Default)]
struct Tables {
    restaurants: BTreeMap<i64, Restaurant>,
    employees: BTreeMap<i64, Employee>,
    links: Vec<EmployeeRestaurant>,
    shifts: BTreeMap<i64, Shift>,
    admins: BTreeMap<i64, Admin>,
}

impl Tables {
    fn require_restaurant(&self, id: i64) -> RepoResult<&Restaurant> {
        self.restaurants
            .get(&id)
            .ok_or_else(|| RepoError::Validation(format!("Restaurant {id} does not exist")))
    }

    fn require_employee(&self, id: i64) -> RepoResult<&Employee> {
        self.employees
            .get(&id)
            .ok_or_else(|| RepoError::Validation(format!("Employee {id} does not exist")))
    }

    fn detail(&self, shift: &Shift) -> Option<ShiftDetail> {
        let employee = self.employees.get(&shift.employee_id)?;
        let restaurant = self.restaurants.get(&shift.restaurant_id)?;
        Some(ShiftDetail {
            shift: shift.clone(),
            employee_name: employee.name.clone(),
            restaurant_name: restaurant.name.clone(),
        })
    }

    fn username_taken(&self, username: &str) -> bool {
        self.employees
            .values()
            .any(|e| e.username.as_deref() == Some(username))
    }
}

fn sorted_by_name<T, F: Fn(&T) -> &str>(mut rows: Vec<T>, name: F) -> Vec<T> {
    rows.sort_by(|a, b| name(a).cmp(name(b)));
    rows
}

/// Memory store (cheap to clone, shares the same tables)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn list_restaurants(&self) -> RepoResult<Vec<Restaurant>> {
        let t = self.tables.read();
        Ok(sorted_by_name(t.restaurants.values().cloned().collect(), |r| &r.name))
    }

    async fn get_restaurant(&self, id: i64) -> RepoResult<Option<Restaurant>> {
        Ok(self.tables.read().restaurants.get(&id).cloned())
    }

    async fn list_restaurants_for_employee(&self, employee_id: i64) -> RepoResult<Vec<Restaurant>> {
        let t = self.tables.read();
        let mut primary = Vec::new();
        let mut others = Vec::new();
        for link in t.links.iter().filter(|l| l.employee_id == employee_id) {
            if let Some(r) = t.restaurants.get(&link.restaurant_id) {
                if link.primary_location {
                    primary.push(r.clone());
                } else {
                    others.push(r.clone());
                }
            }
        }
        primary.extend(sorted_by_name(others, |r| &r.name));
        Ok(primary)
    }

    async fn create_restaurant(&self, data: RestaurantCreate) -> RepoResult<Restaurant> {
        let mut t = self.tables.write();
        let name = data.name.trim().to_string();
        if t.restaurants.values().any(|r| r.name == name) {
            return Err(RepoError::Duplicate(format!("Restaurant '{name}' already exists")));
        }
        let restaurant = Restaurant {
            id: shared::util::snowflake_id(),
            name,
            address: data.address,
            phone: data.phone,
            created_at: shared::util::now_millis(),
        };
        t.restaurants.insert(restaurant.id, restaurant.clone());
        Ok(restaurant)
    }

    async fn list_employees(&self, filter: EmployeeFilter) -> RepoResult<Vec<Employee>> {
        let t = self.tables.read();
        let rows: Vec<Employee> = match filter {
            EmployeeFilter::All => t.employees.values().cloned().collect(),
            EmployeeFilter::ByRestaurant(restaurant_id) => t
                .links
                .iter()
                .filter(|l| l.restaurant_id == restaurant_id)
                .filter_map(|l| t.employees.get(&l.employee_id).cloned())
                .collect(),
        };
        Ok(sorted_by_name(rows, |e| &e.name))
    }

    async fn get_employee(&self, id: i64) -> RepoResult<Option<Employee>> {
        Ok(self.tables.read().employees.get(&id).cloned())
    }

    async fn find_employee_by_username(&self, username: &str) -> RepoResult<Option<Employee>> {
        let t = self.tables.read();
        Ok(t
            .employees
            .values()
            .find(|e| e.username.as_deref() == Some(username))
            .cloned())
    }

    async fn list_employees_without_account(&self) -> RepoResult<Vec<Employee>> {
        let t = self.tables.read();
        let rows = t
            .employees
            .values()
            .filter(|e| !e.has_account())
            .cloned()
            .collect();
        Ok(sorted_by_name(rows, |e| &e.name))
    }

    async fn create_employee(&self, data: NewEmployee) -> RepoResult<Employee> {
        let mut t = self.tables.write();
        if let Some(username) = &data.username
            && t.username_taken(username)
        {
            return Err(RepoError::Duplicate(format!("Username '{username}' already exists")));
        }
        for (i, link) in data.links.iter().enumerate() {
            t.require_restaurant(link.restaurant_id)?;
            if data.links[..i].iter().any(|l| l.restaurant_id == link.restaurant_id) {
                return Err(RepoError::Duplicate(format!(
                    "Restaurant {} listed twice",
                    link.restaurant_id
                )));
            }
        }

        let employee = Employee {
            id: shared::util::snowflake_id(),
            name: data.name,
            email: data.email,
            phone: data.phone,
            roles: data.roles,
            username: data.username,
            hash_pass: data.hash_pass,
            created_at: shared::util::now_millis(),
        };
        for link in &data.links {
            t.links.push(EmployeeRestaurant {
                employee_id: employee.id,
                restaurant_id: link.restaurant_id,
                primary_location: link.primary_location,
                created_at: employee.created_at,
            });
        }
        t.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn set_employee_credentials(
        &self,
        id: i64,
        username: &str,
        hash_pass: &str,
    ) -> RepoResult<Employee> {
        let mut t = self.tables.write();
        let has_account = match t.employees.get(&id) {
            Some(e) => e.has_account(),
            None => return Err(RepoError::NotFound(format!("Employee {id} not found"))),
        };
        if has_account {
            return Err(RepoError::Validation(format!("Employee {id} already has an account")));
        }
        if t.employees
            .values()
            .any(|e| e.id != id && e.username.as_deref() == Some(username))
        {
            return Err(RepoError::Duplicate(format!("Username '{username}' already exists")));
        }
        let employee = t
            .employees
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))?;
        employee.username = Some(username.to_string());
        employee.hash_pass = Some(hash_pass.to_string());
        Ok(employee.clone())
    }

    async fn list_employee_links(&self, employee_id: i64) -> RepoResult<Vec<EmployeeRestaurant>> {
        let t = self.tables.read();
        let mut links: Vec<EmployeeRestaurant> = t
            .links
            .iter()
            .filter(|l| l.employee_id == employee_id)
            .cloned()
            .collect();
        links.sort_by_key(|l| (!l.primary_location, l.created_at));
        Ok(links)
    }

    async fn link_employee_to_restaurant(
        &self,
        employee_id: i64,
        restaurant_id: i64,
        primary_location: bool,
    ) -> RepoResult<EmployeeRestaurant> {
        let mut t = self.tables.write();
        t.require_employee(employee_id)?;
        t.require_restaurant(restaurant_id)?;
        if t.links
            .iter()
            .any(|l| l.employee_id == employee_id && l.restaurant_id == restaurant_id)
        {
            return Err(RepoError::Duplicate(format!(
                "Employee {employee_id} already linked to restaurant {restaurant_id}"
            )));
        }

        let primary = primary_location || !t.links.iter().any(|l| l.employee_id == employee_id);
        if primary {
            for l in t.links.iter_mut().filter(|l| l.employee_id == employee_id) {
                l.primary_location = false;
            }
        }
        let link = EmployeeRestaurant {
            employee_id,
            restaurant_id,
            primary_location: primary,
            created_at: shared::util::now_millis(),
        };
        t.links.push(link.clone());
        Ok(link)
    }

    async fn unlink_employee_from_restaurant(
        &self,
        employee_id: i64,
        restaurant_id: i64,
    ) -> RepoResult<UnlinkOutcome> {
        let mut t = self.tables.write();
        let pos = t
            .links
            .iter()
            .position(|l| l.employee_id == employee_id && l.restaurant_id == restaurant_id)
            .ok_or_else(|| {
                RepoError::NotFound(format!(
                    "Employee {employee_id} is not linked to restaurant {restaurant_id}"
                ))
            })?;
        let removed = t.links.remove(pos);
        t.shifts
            .retain(|_, s| !(s.employee_id == employee_id && s.restaurant_id == restaurant_id));

        if !t.links.iter().any(|l| l.employee_id == employee_id) {
            t.employees.remove(&employee_id);
            t.shifts.retain(|_, s| s.employee_id != employee_id);
            return Ok(UnlinkOutcome::EmployeeDeleted);
        }

        if removed.primary_location
            && let Some(oldest) = t
                .links
                .iter_mut()
                .filter(|l| l.employee_id == employee_id)
                .min_by_key(|l| (l.created_at, l.restaurant_id))
        {
            oldest.primary_location = true;
        }
        Ok(UnlinkOutcome::LinkRemoved)
    }

    async fn list_shifts(&self, restaurant_id: i64, range: DateRange) -> RepoResult<Vec<Shift>> {
        let t = self.tables.read();
        let mut rows: Vec<Shift> = t
            .shifts
            .values()
            .filter(|s| s.restaurant_id == restaurant_id && range.contains(s.shift_date))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (a.shift_date, &a.start_time).cmp(&(b.shift_date, &b.start_time))
        });
        Ok(rows)
    }

    async fn list_shifts_for_employee_on(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> RepoResult<Vec<ShiftDetail>> {
        let t = self.tables.read();
        let mut rows: Vec<ShiftDetail> = t
            .shifts
            .values()
            .filter(|s| s.employee_id == employee_id && s.shift_date == date)
            .filter_map(|s| t.detail(s))
            .collect();
        rows.sort_by(|a, b| a.restaurant_name.cmp(&b.restaurant_name));
        Ok(rows)
    }

    async fn list_upcoming_shifts_for_employee(
        &self,
        employee_id: i64,
        from: NaiveDate,
    ) -> RepoResult<Vec<ShiftDetail>> {
        let t = self.tables.read();
        let mut rows: Vec<ShiftDetail> = t
            .shifts
            .values()
            .filter(|s| s.employee_id == employee_id && s.shift_date >= from)
            .filter_map(|s| t.detail(s))
            .collect();
        rows.sort_by(|a, b| {
            (a.shift.shift_date, &a.shift.start_time, &a.restaurant_name).cmp(&(
                b.shift.shift_date,
                &b.shift.start_time,
                &b.restaurant_name,
            ))
        });
        Ok(rows)
    }

    async fn get_shift(&self, id: i64) -> RepoResult<Option<Shift>> {
        Ok(self.tables.read().shifts.get(&id).cloned())
    }

    async fn create_shift(&self, data: ShiftCreate) -> RepoResult<Shift> {
        let mut t = self.tables.write();
        t.require_restaurant(data.restaurant_id)?;
        t.require_employee(data.employee_id)?;
        if t.shifts.values().any(|s| {
            s.employee_id == data.employee_id
                && s.restaurant_id == data.restaurant_id
                && s.shift_date == data.shift_date
        }) {
            return Err(RepoError::Duplicate(format!(
                "Employee {} already has a shift at restaurant {} on {}",
                data.employee_id, data.restaurant_id, data.shift_date
            )));
        }
        let shift = Shift {
            id: shared::util::snowflake_id(),
            restaurant_id: data.restaurant_id,
            employee_id: data.employee_id,
            shift_date: data.shift_date,
            role: data.role,
            period: data.period,
            start_time: data.start_time,
            end_time: data.end_time,
            notes: data.notes,
            created_at: shared::util::now_millis(),
        };
        t.shifts.insert(shift.id, shift.clone());
        Ok(shift)
    }

    async fn delete_shift(&self, id: i64) -> RepoResult<Shift> {
        self.tables
            .write()
            .shifts
            .remove(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Shift {id} not found")))
    }

    async fn get_admin(&self, id: i64) -> RepoResult<Option<Admin>> {
        Ok(self.tables.read().admins.get(&id).cloned())
    }

    async fn find_admin_by_username(&self, username: &str) -> RepoResult<Option<Admin>> {
        let t = self.tables.read();
        Ok(t.admins.values().find(|a| a.username == username).cloned())
    }

    async fn ensure_admin(&self, username: &str, hash_pass: &str) -> RepoResult<Admin> {
        let mut t = self.tables.write();
        if let Some(existing) = t.admins.values().find(|a| a.username == username) {
            return Ok(existing.clone());
        }
        let admin = Admin {
            id: shared::util::snowflake_id(),
            username: username.to_string(),
            hash_pass: hash_pass.to_string(),
            created_at: shared::util::now_millis(),
        };
        t.admins.insert(admin.id, admin.clone());
        Ok(admin)
    }
}
