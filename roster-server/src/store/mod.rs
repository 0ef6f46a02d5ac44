//! Persistence port
//!
//! [`ScheduleStore`] is the only storage interface the scheduling core
//! depends on, injected as `Arc<dyn ScheduleStore>`.
//!
//! - [`SqliteStore`] - SQLite (sqlx) implementation, used in production
//! - [`MemoryStore`] - in-process implementation for tests and demos

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::models::{
    Admin, DateRange, Employee, EmployeeRestaurant, Restaurant, RestaurantCreate, Role, Shift,
    ShiftCreate, ShiftDetail, UnlinkOutcome,
};

use crate::db::repository::RepoResult;

/// Employee listing filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmployeeFilter {
    #[default]
    All,
    ByRestaurant(i64),
}

/// Restaurant link requested at employee creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewLink {
    pub restaurant_id: i64,
    pub primary_location: bool,
}

/// Validated employee row ready for insertion (password already hashed)
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub roles: Vec<Role>,
    pub username: Option<String>,
    pub hash_pass: Option<String>,
    pub links: Vec<NewLink>,
}

/// Persistence contract for restaurants, employees, links, shifts and admins
///
/// Uniqueness violations come back as `RepoError::Duplicate`, missing rows
/// as `RepoError::NotFound`.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    // ── Restaurants ──
    async fn list_restaurants(&self) -> RepoResult<Vec<Restaurant>>;
    async fn get_restaurant(&self, id: i64) -> RepoResult<Option<Restaurant>>;
    async fn list_restaurants_for_employee(&self, employee_id: i64) -> RepoResult<Vec<Restaurant>>;
    async fn create_restaurant(&self, data: RestaurantCreate) -> RepoResult<Restaurant>;

    // ── Employees ──
    async fn list_employees(&self, filter: EmployeeFilter) -> RepoResult<Vec<Employee>>;
    async fn get_employee(&self, id: i64) -> RepoResult<Option<Employee>>;
    async fn find_employee_by_username(&self, username: &str) -> RepoResult<Option<Employee>>;
    async fn list_employees_without_account(&self) -> RepoResult<Vec<Employee>>;
    /// Insert an employee together with its initial links
    async fn create_employee(&self, data: NewEmployee) -> RepoResult<Employee>;
    async fn set_employee_credentials(
        &self,
        id: i64,
        username: &str,
        hash_pass: &str,
    ) -> RepoResult<Employee>;

    // ── Links ──
    async fn list_employee_links(&self, employee_id: i64) -> RepoResult<Vec<EmployeeRestaurant>>;
    async fn link_employee_to_restaurant(
        &self,
        employee_id: i64,
        restaurant_id: i64,
        primary_location: bool,
    ) -> RepoResult<EmployeeRestaurant>;
    /// Remove a link; deletes the employee when it was the last one
    async fn unlink_employee_from_restaurant(
        &self,
        employee_id: i64,
        restaurant_id: i64,
    ) -> RepoResult<UnlinkOutcome>;

    // ── Shifts ──
    async fn list_shifts(&self, restaurant_id: i64, range: DateRange) -> RepoResult<Vec<Shift>>;
    async fn list_shifts_for_employee_on(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> RepoResult<Vec<ShiftDetail>>;
    async fn list_upcoming_shifts_for_employee(
        &self,
        employee_id: i64,
        from: NaiveDate,
    ) -> RepoResult<Vec<ShiftDetail>>;
    async fn get_shift(&self, id: i64) -> RepoResult<Option<Shift>>;
    async fn create_shift(&self, data: ShiftCreate) -> RepoResult<Shift>;
    /// Delete a shift, returning the removed row
    async fn delete_shift(&self, id: i64) -> RepoResult<Shift>;

    // ── Admins ──
    async fn get_admin(&self, id: i64) -> RepoResult<Option<Admin>>;
    async fn find_admin_by_username(&self, username: &str) -> RepoResult<Option<Admin>>;
    /// Create the admin if missing; an existing admin is returned unchanged
    async fn ensure_admin(&self, username: &str, hash_pass: &str) -> RepoResult<Admin>;

    /// Cheap liveness check for `/api/health`
    async fn ping(&self) -> bool {
        true
    }
}
