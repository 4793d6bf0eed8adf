//! Integration tests for the people and address repositories
//!
//! Exercises save with identity write-back, the address and child cascades,
//! the hierarchical find, flat find_all, count, update and both delete
//! forms against a real PostgreSQL instance.
//!
//! Requires DATABASE_URL; every test skips cleanly when it is not set. The
//! tests share the people and addresses tables, so each one runs under a
//! global lock and recreates the schema.

use chrono::{TimeZone, Utc};
use peopledb::prelude::*;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, MutexGuard};

static DB_LOCK: Mutex<()> = Mutex::const_new(());

async fn setup_db() -> Option<(PeopleDb, MutexGuard<'static, ()>)> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let guard = DB_LOCK.lock().await;
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database");
    let db = PeopleDb::with_pool(pool);
    db.migrate(true).await.expect("Failed to recreate schema");
    Some((db, guard))
}

fn john() -> Person {
    Person::new(
        "John",
        "Smith",
        Utc.with_ymd_and_hms(1980, 11, 15, 15, 15, 0).unwrap(),
    )
}

fn test_address() -> Address {
    Address::new(
        "123 Beale St",
        "Apt. 1a",
        "Wala Wala",
        "WA",
        "90210",
        "Fulton County",
        "United States",
        Region::West,
    )
}

#[tokio::test]
async fn save_writes_the_generated_id_back() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    let people = db.people();

    let saved = people.save(john()).await.unwrap();
    assert!(saved.id.is_some());

    let again = people.save(john()).await.unwrap();
    assert_ne!(saved.id, again.id);
}

#[tokio::test]
async fn save_cascades_into_transient_addresses() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    let people = db.people();
    let addresses = db.addresses();

    let mut person = john();
    person.home_address = Some(test_address());
    person.business_address = Some(test_address());

    let saved = people.save(person).await.unwrap();
    let home_id = saved.home_address.as_ref().and_then(|a| a.id()).unwrap();
    let business_id = saved.business_address.as_ref().and_then(|a| a.id()).unwrap();
    assert_ne!(home_id, business_id);

    let stored = addresses.find_by_id(home_id).await.unwrap().unwrap();
    assert_eq!(stored.city(), "Wala Wala");
    assert_eq!(stored.region(), Region::West);
    assert_eq!(addresses.count().await.unwrap(), 2);
}

#[tokio::test]
async fn save_cascades_through_a_deep_child_tree() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    let people = db.people();

    let mut grandchild = Person::new(
        "Gia",
        "Smith",
        Utc.with_ymd_and_hms(2022, 3, 1, 8, 0, 0).unwrap(),
    );
    grandchild.children.push(Person::new(
        "Greatgrandchild",
        "Smith",
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
    ));
    let mut child = Person::new(
        "Carl",
        "Smith",
        Utc.with_ymd_and_hms(2002, 9, 9, 9, 0, 0).unwrap(),
    );
    child.children.push(grandchild);
    let mut root = john();
    root.children.push(child);

    let saved = people.save(root).await.unwrap();
    let root_id = saved.id.unwrap();
    let child = &saved.children[0];
    let grandchild = &child.children[0];
    let greatgrandchild = &grandchild.children[0];

    assert_eq!(child.parent_id, Some(root_id));
    assert_eq!(grandchild.parent_id, child.id);
    assert_eq!(greatgrandchild.parent_id, grandchild.id);
    assert_eq!(people.count().await.unwrap(), 4);
}

#[tokio::test]
async fn find_by_id_loads_the_whole_hierarchy_in_one_round_trip() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    let people = db.people();

    let mut person = john();
    person.email = Some("john@smith.test".to_string());
    person.salary = Decimal::new(7350010, 2);
    person.home_address = Some(test_address());
    person.children.push(Person::new(
        "Johnny",
        "Smith",
        Utc.with_ymd_and_hms(2010, 1, 1, 1, 0, 0).unwrap(),
    ));
    person.children.push(Person::new(
        "Sarah",
        "Smith",
        Utc.with_ymd_and_hms(2012, 2, 2, 2, 0, 0).unwrap(),
    ));
    person.children.push(Person::new(
        "Jenny",
        "Smith",
        Utc.with_ymd_and_hms(2014, 3, 3, 3, 0, 0).unwrap(),
    ));
    let saved = people.save(person).await.unwrap();

    let found = people.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(found, saved);
    assert_eq!(found.email.as_deref(), Some("john@smith.test"));
    assert_eq!(found.salary, Decimal::new(7350010, 2));
    assert_eq!(found.dob, saved.dob);

    let home = found.home_address.as_ref().unwrap();
    assert_eq!(home.street_address(), "123 Beale St");
    assert_eq!(home.region(), Region::West);
    assert!(found.business_address.is_none());

    assert_eq!(found.children.len(), 3);
    assert_eq!(found.children[0].first_name, "Johnny");
    assert_eq!(found.children[1].first_name, "Sarah");
    assert_eq!(found.children[2].first_name, "Jenny");
    assert_eq!(found.children[0].parent_id, saved.id);

    // Reading again yields the same reconstruction, no accumulation.
    let again = people.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(again.children.len(), 3);
    assert_eq!(again, found);
}

#[tokio::test]
async fn find_by_id_without_associations_stays_lean() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    let people = db.people();

    let saved = people.save(john()).await.unwrap();
    let found = people.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();

    assert!(found.home_address.is_none());
    assert!(found.business_address.is_none());
    assert!(found.children.is_empty());
}

#[tokio::test]
async fn find_by_id_miss_is_none_not_an_error() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    assert!(db.people().find_by_id(-1).await.unwrap().is_none());
}

#[tokio::test]
async fn find_all_returns_flat_rows_in_id_order() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    let people = db.people();

    let mut parent = john();
    parent.children.push(Person::new(
        "Johnny",
        "Smith",
        Utc.with_ymd_and_hms(2010, 1, 1, 1, 0, 0).unwrap(),
    ));
    people.save(parent).await.unwrap();
    people.save(john()).await.unwrap();

    let all = people.find_all().await.unwrap();
    assert_eq!(all.len(), 3);
    let ids: Vec<i64> = all.iter().map(|p| p.id.unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    // Children surface as their own flat entries, unpopulated.
    assert!(all.iter().all(|p| p.children.is_empty()));
    assert!(all.iter().any(|p| p.parent_id.is_some()));
}

#[tokio::test]
async fn update_persists_field_changes() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    let people = db.people();

    let mut saved = people.save(john()).await.unwrap();
    saved.first_name = "Johnathan".to_string();
    saved.salary = Decimal::new(10000000, 2);
    saved.email = Some("johnathan@smith.test".to_string());
    people.update(&saved).await.unwrap();

    let found = people.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(found.first_name, "Johnathan");
    assert_eq!(found.salary, Decimal::new(10000000, 2));
    assert_eq!(found.email.as_deref(), Some("johnathan@smith.test"));
}

#[tokio::test]
async fn update_of_a_transient_person_is_a_configuration_error() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    let err = db.people().update(&john()).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Configuration { .. }), "{err:?}");
}

#[tokio::test]
async fn delete_removes_one_row_and_leaves_the_instance_alone() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    let people = db.people();

    let saved = people.save(john()).await.unwrap();
    let keeper = people.save(john()).await.unwrap();

    people.delete(&saved).await.unwrap();
    assert!(saved.id.is_some());
    assert!(people.find_by_id(saved.id.unwrap()).await.unwrap().is_none());
    assert!(people.find_by_id(keeper.id.unwrap()).await.unwrap().is_some());
    assert_eq!(people.count().await.unwrap(), 1);
}

#[tokio::test]
async fn delete_many_removes_all_rows_in_one_statement() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    let people = db.people();

    let mut batch = Vec::new();
    for _ in 0..3 {
        batch.push(people.save(john()).await.unwrap());
    }
    let keeper = people.save(john()).await.unwrap();

    people.delete_many(&batch).await.unwrap();
    assert_eq!(people.count().await.unwrap(), 1);
    assert!(people.find_by_id(keeper.id.unwrap()).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_many_with_a_transient_person_rejects_the_whole_batch() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    let people = db.people();

    let saved = people.save(john()).await.unwrap();
    let batch = vec![saved.clone(), john()];

    let err = people.delete_many(&batch).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Configuration { .. }), "{err:?}");
    // Nothing was deleted.
    assert_eq!(people.count().await.unwrap(), 1);
}

#[tokio::test]
async fn delete_many_addresses_leaves_unlisted_rows() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    let addresses = db.addresses();

    let a = addresses.save(test_address()).await.unwrap();
    let b = addresses.save(test_address()).await.unwrap();
    let c = addresses.save(test_address()).await.unwrap();

    addresses.delete_many(&[a, b]).await.unwrap();
    assert_eq!(addresses.count().await.unwrap(), 1);
    assert!(addresses.find_by_id(c.id().unwrap()).await.unwrap().is_some());
}

#[tokio::test]
async fn address_round_trips_through_save_and_find() {
    let Some((db, _guard)) = setup_db().await else {
        return;
    };
    let saved = db.addresses().save(test_address()).await.unwrap();
    let found = db.addresses().find_by_id(saved.id().unwrap()).await.unwrap();
    assert_eq!(found.unwrap(), saved);
}
