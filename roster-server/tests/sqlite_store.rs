//! SqliteStore against a real database file with migrations applied.

use chrono::NaiveDate;
use roster_server::ScheduleStore;
use roster_server::SqliteStore;
use roster_server::db::DbService;
use roster_server::db::repository::RepoError;
use roster_server::store::{EmployeeFilter, NewEmployee, NewLink};
use shared::models::{
    DateRange, RestaurantCreate, Role, ShiftCreate, ShiftPeriod, UnlinkOutcome,
};
use tempfile::TempDir;

async fn open_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    (dir, SqliteStore::new(db.pool))
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn restaurant(store: &SqliteStore, name: &str) -> i64 {
    store
        .create_restaurant(RestaurantCreate {
            name: name.to_string(),
            address: None,
            phone: None,
        })
        .await
        .unwrap()
        .id
}

async fn employee(store: &SqliteStore, name: &str, roles: Vec<Role>, restaurants: &[i64]) -> i64 {
    let links = restaurants
        .iter()
        .enumerate()
        .map(|(i, &restaurant_id)| NewLink {
            restaurant_id,
            primary_location: i == 0,
        })
        .collect();
    store
        .create_employee(NewEmployee {
            name: name.to_string(),
            email: None,
            phone: None,
            roles,
            username: None,
            hash_pass: None,
            links,
        })
        .await
        .unwrap()
        .id
}

fn shift(restaurant_id: i64, employee_id: i64, date: &str) -> ShiftCreate {
    ShiftCreate {
        restaurant_id,
        employee_id,
        shift_date: d(date),
        role: Role::Server,
        period: Some(ShiftPeriod::Am),
        start_time: Some("09:00".to_string()),
        end_time: Some("17:00".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn restaurant_names_are_unique() {
    let (_dir, store) = open_store().await;
    restaurant(&store, "Centro").await;

    let err = store
        .create_restaurant(RestaurantCreate {
            name: "Centro".to_string(),
            address: None,
            phone: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
    assert_eq!(store.list_restaurants().await.unwrap().len(), 1);
}

#[tokio::test]
async fn roles_round_trip_through_json_column() {
    let (_dir, store) = open_store().await;
    let a = restaurant(&store, "A").await;
    let id = employee(&store, "Marco", vec![Role::Door, Role::Gelato], &[a]).await;

    let loaded = store.get_employee(id).await.unwrap().unwrap();
    assert_eq!(loaded.roles, vec![Role::Door, Role::Gelato]);
    assert!(!loaded.has_account());

    let by_restaurant = store
        .list_employees(EmployeeFilter::ByRestaurant(a))
        .await
        .unwrap();
    assert_eq!(by_restaurant.len(), 1);
    assert_eq!(store.list_employees_without_account().await.unwrap().len(), 1);
}

#[tokio::test]
async fn one_shift_per_restaurant_per_day() {
    let (_dir, store) = open_store().await;
    let a = restaurant(&store, "A").await;
    let b = restaurant(&store, "B").await;
    let jane = employee(&store, "Jane", vec![Role::Server], &[a, b]).await;

    store.create_shift(shift(a, jane, "2025-01-10")).await.unwrap();
    let err = store
        .create_shift(shift(a, jane, "2025-01-10"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // Another restaurant on the same day is a storage-level non-issue
    store.create_shift(shift(b, jane, "2025-01-10")).await.unwrap();
    let same_day = store
        .list_shifts_for_employee_on(jane, d("2025-01-10"))
        .await
        .unwrap();
    assert_eq!(same_day.len(), 2);
    assert_eq!(same_day[0].restaurant_name, "A");
    assert_eq!(same_day[0].employee_name, "Jane");
}

#[tokio::test]
async fn shift_range_is_inclusive() {
    let (_dir, store) = open_store().await;
    let a = restaurant(&store, "A").await;
    let jane = employee(&store, "Jane", vec![Role::Server], &[a]).await;

    for date in ["2025-01-04", "2025-01-05", "2025-01-11", "2025-01-12"] {
        store.create_shift(shift(a, jane, date)).await.unwrap();
    }

    let week = DateRange::new(d("2025-01-05"), d("2025-01-11")).unwrap();
    let shifts = store.list_shifts(a, week).await.unwrap();
    let dates: Vec<_> = shifts.iter().map(|s| s.shift_date).collect();
    assert_eq!(dates, vec![d("2025-01-05"), d("2025-01-11")]);

    let upcoming = store
        .list_upcoming_shifts_for_employee(jane, d("2025-01-11"))
        .await
        .unwrap();
    assert_eq!(upcoming.len(), 2);
}

#[tokio::test]
async fn delete_shift_returns_row() {
    let (_dir, store) = open_store().await;
    let a = restaurant(&store, "A").await;
    let jane = employee(&store, "Jane", vec![Role::Server], &[a]).await;
    let created = store.create_shift(shift(a, jane, "2025-01-10")).await.unwrap();

    let deleted = store.delete_shift(created.id).await.unwrap();
    assert_eq!(deleted, created);
    assert!(store.get_shift(created.id).await.unwrap().is_none());
    assert!(matches!(
        store.delete_shift(created.id).await,
        Err(RepoError::NotFound(_))
    ));
}

#[tokio::test]
async fn unlink_promotes_primary_and_deletes_last() {
    let (_dir, store) = open_store().await;
    let a = restaurant(&store, "A").await;
    let b = restaurant(&store, "B").await;
    let c = restaurant(&store, "C").await;
    let jane = employee(&store, "Jane", vec![Role::Server], &[a]).await;
    store.link_employee_to_restaurant(jane, b, false).await.unwrap();
    store.link_employee_to_restaurant(jane, c, false).await.unwrap();
    assert!(matches!(
        store.link_employee_to_restaurant(jane, b, false).await,
        Err(RepoError::Duplicate(_))
    ));

    store.create_shift(shift(a, jane, "2025-01-10")).await.unwrap();
    store.create_shift(shift(b, jane, "2025-01-11")).await.unwrap();

    assert_eq!(
        store.unlink_employee_from_restaurant(jane, a).await.unwrap(),
        UnlinkOutcome::LinkRemoved
    );
    let links = store.list_employee_links(jane).await.unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].restaurant_id, b);
    assert!(links[0].primary_location);
    assert!(!links[1].primary_location);

    let january = DateRange::new(d("2025-01-01"), d("2025-01-31")).unwrap();
    assert!(store.list_shifts(a, january).await.unwrap().is_empty());
    assert_eq!(store.list_shifts(b, january).await.unwrap().len(), 1);

    assert!(matches!(
        store.unlink_employee_from_restaurant(jane, a).await,
        Err(RepoError::NotFound(_))
    ));

    store.unlink_employee_from_restaurant(jane, c).await.unwrap();
    assert_eq!(
        store.unlink_employee_from_restaurant(jane, b).await.unwrap(),
        UnlinkOutcome::EmployeeDeleted
    );
    assert!(store.get_employee(jane).await.unwrap().is_none());
    assert!(store.list_shifts(b, january).await.unwrap().is_empty());
}

#[tokio::test]
async fn explicit_primary_replaces_previous() {
    let (_dir, store) = open_store().await;
    let a = restaurant(&store, "A").await;
    let b = restaurant(&store, "B").await;
    let jane = employee(&store, "Jane", vec![Role::Server], &[a]).await;

    let link = store.link_employee_to_restaurant(jane, b, true).await.unwrap();
    assert!(link.primary_location);

    let restaurants = store.list_restaurants_for_employee(jane).await.unwrap();
    let names: Vec<_> = restaurants.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
}

#[tokio::test]
async fn credentials_are_set_once() {
    let (_dir, store) = open_store().await;
    let a = restaurant(&store, "A").await;
    let jane = employee(&store, "Jane", vec![Role::Server], &[a]).await;
    let marco = employee(&store, "Marco", vec![Role::Door], &[a]).await;

    let updated = store
        .set_employee_credentials(jane, "jane", "hash-1")
        .await
        .unwrap();
    assert!(updated.has_account());
    assert_eq!(
        store
            .find_employee_by_username("jane")
            .await
            .unwrap()
            .map(|e| e.id),
        Some(jane)
    );

    assert!(matches!(
        store.set_employee_credentials(jane, "jane2", "hash-2").await,
        Err(RepoError::Validation(_))
    ));
    assert!(matches!(
        store.set_employee_credentials(marco, "jane", "hash-3").await,
        Err(RepoError::Duplicate(_))
    ));
    assert!(matches!(
        store.set_employee_credentials(424242, "ghost", "hash-4").await,
        Err(RepoError::NotFound(_))
    ));
}

#[tokio::test]
async fn ensure_admin_is_idempotent() {
    let (_dir, store) = open_store().await;

    let first = store.ensure_admin("admin", "hash-1").await.unwrap();
    let second = store.ensure_admin("admin", "hash-2").await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.hash_pass, "hash-1");

    let found = store.find_admin_by_username("admin").await.unwrap().unwrap();
    assert_eq!(found.id, first.id);
    assert!(store.get_admin(first.id).await.unwrap().is_some());
    assert!(store.ping().await);
}
