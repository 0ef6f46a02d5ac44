//! SQLite-backed [`ScheduleStore`]

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::models::{
    Admin, DateRange, Employee, EmployeeRestaurant, Restaurant, RestaurantCreate, Shift,
    ShiftCreate, ShiftDetail, UnlinkOutcome,
};
use sqlx::SqlitePool;

use super::{EmployeeFilter, NewEmployee, ScheduleStore};
use crate::db::repository::{RepoResult, admin, employee, link, restaurant, shift};

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ScheduleStore for SqliteStore {
    async fn list_restaurants(&self) -> RepoResult<Vec<Restaurant>> {
        restaurant::find_all(&self.pool).await
    }

    async fn get_restaurant(&self, id: i64) -> RepoResult<Option<Restaurant>> {
        restaurant::find_by_id(&self.pool, id).await
    }

    async fn list_restaurants_for_employee(&self, employee_id: i64) -> RepoResult<Vec<Restaurant>> {
        restaurant::find_by_employee(&self.pool, employee_id).await
    }

    async fn create_restaurant(&self, data: RestaurantCreate) -> RepoResult<Restaurant> {
        restaurant::create(&self.pool, data).await
    }

    async fn list_employees(&self, filter: EmployeeFilter) -> RepoResult<Vec<Employee>> {
        match filter {
            EmployeeFilter::All => employee::find_all(&self.pool).await,
            EmployeeFilter::ByRestaurant(id) => employee::find_by_restaurant(&self.pool, id).await,
        }
    }

    async fn get_employee(&self, id: i64) -> RepoResult<Option<Employee>> {
        employee::find_by_id(&self.pool, id).await
    }

    async fn find_employee_by_username(&self, username: &str) -> RepoResult<Option<Employee>> {
        employee::find_by_username(&self.pool, username).await
    }

    async fn list_employees_without_account(&self) -> RepoResult<Vec<Employee>> {
        employee::find_without_account(&self.pool).await
    }

    async fn create_employee(&self, data: NewEmployee) -> RepoResult<Employee> {
        employee::create(&self.pool, data).await
    }

    async fn set_employee_credentials(
        &self,
        id: i64,
        username: &str,
        hash_pass: &str,
    ) -> RepoResult<Employee> {
        employee::set_credentials(&self.pool, id, username, hash_pass).await
    }

    async fn list_employee_links(&self, employee_id: i64) -> RepoResult<Vec<EmployeeRestaurant>> {
        link::find_by_employee(&self.pool, employee_id).await
    }

    async fn link_employee_to_restaurant(
        &self,
        employee_id: i64,
        restaurant_id: i64,
        primary_location: bool,
    ) -> RepoResult<EmployeeRestaurant> {
        link::create(&self.pool, employee_id, restaurant_id, primary_location).await
    }

    async fn unlink_employee_from_restaurant(
        &self,
        employee_id: i64,
        restaurant_id: i64,
    ) -> RepoResult<UnlinkOutcome> {
        link::remove(&self.pool, employee_id, restaurant_id).await
    }

    async fn list_shifts(&self, restaurant_id: i64, range: DateRange) -> RepoResult<Vec<Shift>> {
        shift::find_by_restaurant(&self.pool, restaurant_id, range).await
    }

    async fn list_shifts_for_employee_on(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> RepoResult<Vec<ShiftDetail>> {
        shift::find_by_employee_on(&self.pool, employee_id, date).await
    }

    async fn list_upcoming_shifts_for_employee(
        &self,
        employee_id: i64,
        from: NaiveDate,
    ) -> RepoResult<Vec<ShiftDetail>> {
        shift::find_upcoming_for_employee(&self.pool, employee_id, from).await
    }

    async fn get_shift(&self, id: i64) -> RepoResult<Option<Shift>> {
        shift::find_by_id(&self.pool, id).await
    }

    async fn create_shift(&self, data: ShiftCreate) -> RepoResult<Shift> {
        shift::create(&self.pool, data).await
    }

    async fn delete_shift(&self, id: i64) -> RepoResult<Shift> {
        shift::delete(&self.pool, id).await
    }

    async fn get_admin(&self, id: i64) -> RepoResult<Option<Admin>> {
        admin::find_by_id(&self.pool, id).await
    }

    async fn find_admin_by_username(&self, username: &str) -> RepoResult<Option<Admin>> {
        admin::find_by_username(&self.pool, username).await
    }

    async fn ensure_admin(&self, username: &str, hash_pass: &str) -> RepoResult<Admin> {
        admin::ensure(&self.pool, username, hash_pass).await
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
