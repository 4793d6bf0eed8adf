//! Person persistence, including the hierarchical load and cascade save

use chrono::{DateTime, Utc};
use repo_core::prelude::*;
use rust_decimal::Decimal;

use crate::model::{Address, Person};
use crate::repository::addresses::{address_from_view, AddressRepository};

const SAVE_PERSON_SQL: &str = "INSERT INTO people \
    (first_name, last_name, dob, salary, email, home_address, business_address, parent_id) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id";

// One round trip loads the person, both optional addresses and every child.
// Each role's columns are aliased with the role prefix; a role absent from
// the row surfaces as a NULL in its id alias.
const FIND_PERSON_BY_ID_SQL: &str = "\
    SELECT \
        parent.id AS parent_id, parent.first_name AS parent_first_name, \
        parent.last_name AS parent_last_name, parent.dob AS parent_dob, \
        parent.salary AS parent_salary, parent.email AS parent_email, \
        parent.parent_id AS parent_parent_id, \
        home.id AS home_id, home.street_address AS home_street_address, \
        home.address2 AS home_address2, home.city AS home_city, \
        home.state AS home_state, home.postcode AS home_postcode, \
        home.county AS home_county, home.region AS home_region, \
        home.country AS home_country, \
        business.id AS business_id, business.street_address AS business_street_address, \
        business.address2 AS business_address2, business.city AS business_city, \
        business.state AS business_state, business.postcode AS business_postcode, \
        business.county AS business_county, business.region AS business_region, \
        business.country AS business_country, \
        child.id AS child_id, child.first_name AS child_first_name, \
        child.last_name AS child_last_name, child.dob AS child_dob, \
        child.salary AS child_salary, child.email AS child_email, \
        child.parent_id AS child_parent_id \
    FROM people AS parent \
    LEFT OUTER JOIN addresses AS home ON parent.home_address = home.id \
    LEFT OUTER JOIN addresses AS business ON parent.business_address = business.id \
    LEFT OUTER JOIN people AS child ON child.parent_id = parent.id \
    WHERE parent.id = $1 \
    ORDER BY child.id";

const FIND_ALL_PEOPLE_SQL: &str = "SELECT id, first_name, last_name, dob, salary, \
    email, parent_id FROM people ORDER BY id";

const COUNT_PEOPLE_SQL: &str = "SELECT COUNT(*) FROM people";

const UPDATE_PERSON_SQL: &str = "UPDATE people SET first_name = $1, last_name = $2, \
    dob = $3, salary = $4, email = $5 WHERE id = $6";

const DELETE_PERSON_SQL: &str = "DELETE FROM people WHERE id = $1";

const DELETE_PEOPLE_SQL: &str = "DELETE FROM people WHERE id = ANY($1)";

/// Build a person from one role of a joined row, or `None` when the role's
/// identity column is NULL. Association fields stay empty; the caller
/// attaches addresses and children.
fn person_from_view(view: &RowView<'_>) -> Result<Option<Person>, RepositoryError> {
    let Some(id) = view.get_opt::<i64>("id")? else {
        return Ok(None);
    };
    let mut person = Person::new(
        view.get::<String>("first_name")?,
        view.get::<String>("last_name")?,
        view.get::<DateTime<Utc>>("dob")?,
    );
    person.id = Some(id);
    person.salary = view.get::<Decimal>("salary")?;
    person.email = view.get_opt::<String>("email")?;
    person.parent_id = view.get_opt::<i64>("parent_id")?;
    Ok(Some(person))
}

pub struct PeopleMapping {
    sql: SqlSet,
}

impl PeopleMapping {
    fn new() -> Self {
        Self {
            sql: SqlSet::new()
                .declare(CrudOperation::Save, SAVE_PERSON_SQL)
                .declare(CrudOperation::FindById, FIND_PERSON_BY_ID_SQL)
                .declare(CrudOperation::FindAll, FIND_ALL_PEOPLE_SQL)
                .declare(CrudOperation::Count, COUNT_PEOPLE_SQL)
                .declare(CrudOperation::Update, UPDATE_PERSON_SQL)
                .declare(CrudOperation::DeleteOne, DELETE_PERSON_SQL)
                .declare(CrudOperation::DeleteMany, DELETE_PEOPLE_SQL),
        }
    }
}

#[async_trait]
impl EntityMapping for PeopleMapping {
    type Entity = Person;

    fn declared_sql(&self) -> &SqlSet {
        &self.sql
    }

    /// Persists any transient associated address first so its generated id
    /// is available for the owning row's foreign key columns. An address
    /// that already has an id is reused as-is.
    async fn bind_save(
        &self,
        person: &mut Person,
        pool: &PgPool,
    ) -> Result<Vec<SqlValue>, RepositoryError> {
        let addresses = AddressRepository::new(pool.clone());
        if let Some(address) = person.home_address.take() {
            person.home_address = Some(persist_if_transient(&addresses, address).await?);
        }
        if let Some(address) = person.business_address.take() {
            person.business_address = Some(persist_if_transient(&addresses, address).await?);
        }

        Ok(vec![
            person.first_name.as_str().into(),
            person.last_name.as_str().into(),
            person.dob.into(),
            person.salary.into(),
            person.email.clone().into(),
            SqlValue::BigInt(person.home_address.as_ref().and_then(Address::id)),
            SqlValue::BigInt(person.business_address.as_ref().and_then(Address::id)),
            person.parent_id.into(),
        ])
    }

    fn bind_update(&self, person: &Person) -> Result<Vec<SqlValue>, RepositoryError> {
        Ok(vec![
            person.first_name.as_str().into(),
            person.last_name.as_str().into(),
            person.dob.into(),
            person.salary.into(),
            person.email.clone().into(),
        ])
    }

    fn extract_row(&self, row: &PgRow) -> Result<Person, RepositoryError> {
        person_from_view(&RowView::new(row, ""))?
            .ok_or_else(|| RepositoryError::extraction("id", "person row without an id"))
    }

    /// Regroup the flattened join: one person from the first row's parent
    /// columns, the addresses from its home and business columns, and one
    /// child per row whose child id is non-NULL.
    fn extract_one(&self, rows: &[PgRow]) -> Result<Option<Person>, RepositoryError> {
        let Some(first) = rows.first() else {
            return Ok(None);
        };
        let Some(mut person) = person_from_view(&RowView::new(first, "parent_"))? else {
            return Ok(None);
        };
        person.home_address = address_from_view(&RowView::new(first, "home_"))?;
        person.business_address = address_from_view(&RowView::new(first, "business_"))?;
        for row in rows {
            if let Some(child) = person_from_view(&RowView::new(row, "child_"))? {
                person.children.push(child);
            }
        }
        Ok(Some(person))
    }
}

async fn persist_if_transient(
    addresses: &AddressRepository,
    address: Address,
) -> Result<Address, RepositoryError> {
    if address.id().is_none() {
        addresses.save(address).await
    } else {
        Ok(address)
    }
}

/// One flattened node of a person tree. `parent` indexes into the arena;
/// parents always precede their children.
struct SaveNode {
    person: Option<Person>,
    parent: Option<usize>,
}

fn flatten_tree(root: Person) -> Vec<SaveNode> {
    let mut nodes: Vec<SaveNode> = Vec::new();
    let mut pending = vec![(root, None)];
    while let Some((mut person, parent)) = pending.pop() {
        let children = std::mem::take(&mut person.children);
        let index = nodes.len();
        nodes.push(SaveNode {
            person: Some(person),
            parent,
        });
        // Reversed so siblings come off the stack in their original order.
        for child in children.into_iter().rev() {
            pending.push((child, Some(index)));
        }
    }
    nodes
}

/// Reattach saved nodes to their parents, back to front. A node's children
/// sit after it in the arena, so by the time a node is taken its subtree is
/// complete; inserting at the front restores sibling order.
fn rebuild_tree(mut nodes: Vec<SaveNode>) -> Result<Person, RepositoryError> {
    let mut root = None;
    while let Some(node) = nodes.pop() {
        let person = node
            .person
            .ok_or_else(|| RepositoryError::configuration("cascade node taken twice"))?;
        match node.parent {
            Some(parent_index) => {
                let parent = nodes[parent_index]
                    .person
                    .as_mut()
                    .ok_or_else(|| RepositoryError::configuration("cascade node taken twice"))?;
                parent.children.insert(0, person);
            }
            None => root = Some(person),
        }
    }
    root.ok_or_else(|| RepositoryError::configuration("cascade save produced no root"))
}

/// Store-backed repository for [`Person`] rows and their hierarchy.
pub struct PeopleRepository {
    engine: CrudEngine<PeopleMapping>,
}

impl PeopleRepository {
    pub fn new(pool: PgPool) -> Self {
        let identity = IdAccessor::new(|p: &Person| p.id, |p: &mut Person, id| p.id = Some(id));
        Self {
            engine: CrudEngine::new(pool, PeopleMapping::new(), identity),
        }
    }

    /// Save the person and its whole child tree, each node after its
    /// parent so the parent's generated id can be recorded on the child.
    /// The traversal is an explicit work list, not recursion, so arbitrary
    /// depth cannot exhaust the call stack. Returns the tree with every
    /// node's identity written back, children in their original order.
    pub async fn save(&self, person: Person) -> Result<Person, RepositoryError> {
        let mut nodes = flatten_tree(person);
        for index in 0..nodes.len() {
            let mut current = nodes[index]
                .person
                .take()
                .ok_or_else(|| RepositoryError::configuration("cascade node taken twice"))?;
            if let Some(parent_index) = nodes[index].parent {
                current.parent_id = nodes[parent_index].person.as_ref().and_then(|p| p.id);
            }
            let saved = self.engine.save(current).await?;
            nodes[index].person = Some(saved);
        }
        rebuild_tree(nodes)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Person>, RepositoryError> {
        self.engine.find_by_id(id).await
    }

    /// Every person as a flat row: associations are not loaded, children
    /// appear as their own entries.
    pub async fn find_all(&self) -> Result<Vec<Person>, RepositoryError> {
        self.engine.find_all().await
    }

    pub async fn count(&self) -> Result<i64, RepositoryError> {
        self.engine.count().await
    }

    pub async fn update(&self, person: &Person) -> Result<(), RepositoryError> {
        self.engine.update(person).await
    }

    pub async fn delete(&self, person: &Person) -> Result<(), RepositoryError> {
        self.engine.delete(person).await
    }

    pub async fn delete_many(&self, people: &[Person]) -> Result<(), RepositoryError> {
        self.engine.delete_many(people).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn person(first: &str) -> Person {
        Person::new(
            first,
            "Test",
            Utc.with_ymd_and_hms(1990, 6, 15, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn flatten_puts_parents_before_children() {
        let mut root = person("root");
        let mut a = person("a");
        a.children.push(person("a1"));
        root.children.push(a);
        root.children.push(person("b"));

        let nodes = flatten_tree(root);
        let names: Vec<&str> = nodes
            .iter()
            .map(|n| n.person.as_ref().unwrap().first_name.as_str())
            .collect();
        assert_eq!(names, ["root", "a", "a1", "b"]);
        for (index, node) in nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                assert!(parent < index);
            }
        }
    }

    #[test]
    fn flatten_then_rebuild_preserves_child_order() {
        let mut root = person("root");
        let mut a = person("a");
        a.children.push(person("a1"));
        a.children.push(person("a2"));
        root.children.push(a);
        root.children.push(person("b"));
        let expected = root.clone();

        let rebuilt = rebuild_tree(flatten_tree(root)).unwrap();
        assert_eq!(rebuilt.first_name, "root");
        assert_eq!(rebuilt.children.len(), 2);
        assert_eq!(rebuilt.children[0].first_name, "a");
        assert_eq!(rebuilt.children[0].children[1].first_name, "a2");
        assert_eq!(rebuilt.children[1].first_name, "b");
        assert_eq!(rebuilt, expected);
    }

    #[test]
    fn every_operation_has_a_declared_statement() {
        let mapping = PeopleMapping::new();
        for operation in [
            CrudOperation::Save,
            CrudOperation::FindById,
            CrudOperation::FindAll,
            CrudOperation::Count,
            CrudOperation::Update,
            CrudOperation::DeleteOne,
            CrudOperation::DeleteMany,
        ] {
            assert!(mapping.sql.lookup(operation).is_some(), "{operation}");
        }
    }
}
