//! # People Repository Walkthrough
//!
//! Demonstrates the full repository surface end to end:
//! - Connecting via `DatabaseConfig` and recreating the schema
//! - Saving a person with addresses and children (one cascade)
//! - Loading the whole hierarchy back in one round trip
//! - Flat listing, counting, updating and deleting
//!
//! Expects a reachable PostgreSQL instance; adjust the config below or set
//! PEOPLEDB_CONFIG to point at a TOML file and load it with `AppConfig::load`.

use anyhow::Context;
use peopledb::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("🚀 PeopleDb Walkthrough");
    println!("=======================");

    // 1. Connect and migrate
    println!("\n📊 Step 1: Database Setup");
    println!("--------------------------");

    let config = DatabaseConfig::new(
        "localhost".to_string(),
        5432,
        "peopledb".to_string(),
        "postgres".to_string(),
        "password".to_string(),
        1,    // min_connections
        5,    // max_connections
        30,   // connection_timeout_seconds
        600,  // idle_timeout_seconds
        3600, // max_lifetime_seconds
    );

    let db = PeopleDb::new(config).await?;
    db.migrate(true).await?;
    println!("✅ Connected and recreated the people/addresses schema");

    let people = db.people();

    // 2. Save a whole family in one call
    println!("\n📝 Step 2: Cascade Save");
    println!("------------------------");

    let mut john = Person::new(
        "John",
        "Smith",
        Utc.with_ymd_and_hms(1980, 11, 15, 15, 15, 0).unwrap(),
    )
    .with_salary(Decimal::new(7350010, 2));
    john.email = Some("john@smith.test".to_string());
    john.home_address = Some(Address::new(
        "123 Beale St",
        "Apt. 1a",
        "Wala Wala",
        "WA",
        "90210",
        "Fulton County",
        "United States",
        Region::West,
    ));
    john.children.push(Person::new(
        "Johnny",
        "Smith",
        Utc.with_ymd_and_hms(2010, 1, 1, 1, 0, 0).unwrap(),
    ));
    john.children.push(Person::new(
        "Sarah",
        "Smith",
        Utc.with_ymd_and_hms(2012, 2, 2, 2, 0, 0).unwrap(),
    ));

    let john = people.save(john).await?;
    println!(
        "✅ Saved John as id {:?} with {} children and home address id {:?}",
        john.id,
        john.children.len(),
        john.home_address.as_ref().and_then(|a| a.id()),
    );

    // 3. One round trip brings the hierarchy back
    println!("\n🔍 Step 3: Hierarchical Find");
    println!("-----------------------------");

    let loaded = people
        .find_by_id(john.id.context("john has no id")?)
        .await?
        .context("john vanished")?;
    println!(
        "✅ Loaded {} {} with children {:?}",
        loaded.first_name,
        loaded.last_name,
        loaded
            .children
            .iter()
            .map(|c| c.first_name.as_str())
            .collect::<Vec<_>>(),
    );

    // 4. Flat listing and count
    println!("\n📋 Step 4: List and Count");
    println!("--------------------------");
    let everyone = people.find_all().await?;
    println!(
        "✅ {} people on file ({} by count)",
        everyone.len(),
        people.count().await?
    );

    // 5. Update in place
    println!("\n✏️  Step 5: Update");
    println!("------------------");
    let mut john = loaded;
    john.salary = Decimal::new(10000000, 2);
    people.update(&john).await?;
    println!("✅ Gave John a raise");

    // 6. Delete the children in one statement, then John
    println!("\n🗑️  Step 6: Delete");
    println!("------------------");
    people.delete_many(&john.children).await?;
    people.delete(&john).await?;
    println!("✅ {} people left", people.count().await?);

    println!("\n🎉 Walkthrough complete!");
    Ok(())
}
