//! People and their parent/child hierarchy

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::Address;

/// A person together with everything persisted alongside it: up to two
/// associated addresses and an owned, ordered list of children.
///
/// Created transient (no id); the id appears only through a repository
/// save. Deleting the row leaves the in-memory instance untouched.
#[derive(Debug, Clone)]
pub struct Person {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    /// Date of birth, normalized to UTC in the store.
    pub dob: DateTime<Utc>,
    pub salary: Decimal,
    pub email: Option<String>,
    pub home_address: Option<Address>,
    pub business_address: Option<Address>,
    /// Weak back-reference to the owning parent: relation plus lookup,
    /// never an owned value (that would be a cycle).
    pub parent_id: Option<i64>,
    pub children: Vec<Person>,
}

impl Person {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        dob: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            dob,
            salary: Decimal::ZERO,
            email: None,
            home_address: None,
            business_address: None,
            parent_id: None,
            children: Vec::new(),
        }
    }

    pub fn with_salary(mut self, salary: Decimal) -> Self {
        self.salary = salary;
        self
    }
}

// Equality is (id, first name, last name) only. Date of birth is
// deliberately left out.
// TODO: revisit the dob term once read-back timezone normalization is
// settled.
impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.first_name == other.first_name
            && self.last_name == other.last_name
    }
}

impl Eq for Person {}
