//! Occupant registry contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist staff and fellows with their accommodation preference.
//! - Serve person lookups by id and name, and ordered listings.
//!
//! # Invariants
//! - Names are unique across both roles.
//! - Staff rows always carry `wants_accommodation = 0` (enforced by a CHECK).

use super::{
    bool_to_int, ensure_connection_ready, map_insert_error, parse_uuid, Entity, RepoError,
    RepoResult,
};
use crate::model::person::{Person, PersonId, PersonRole};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub(crate) const PERSON_SELECT_SQL: &str = "SELECT
    p.uuid AS uuid,
    p.name AS name,
    p.role AS role,
    p.wants_accommodation AS wants_accommodation
FROM people p";

/// Repository interface for the occupant registry.
pub trait PersonRepository {
    /// Persists a new person, failing with `DuplicateName` on a name clash.
    fn create_person(&self, person: &Person) -> RepoResult<PersonId>;
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    fn find_person_by_name(&self, name: &str) -> RepoResult<Option<Person>>;
    /// Lists people in registration order, optionally filtered by role.
    fn list_people(&self, role: Option<PersonRole>) -> RepoResult<Vec<Person>>;
    fn count_people(&self) -> RepoResult<u64>;
}

/// SQLite-backed occupant registry.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["people"])?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, person: &Person) -> RepoResult<PersonId> {
        self.conn
            .execute(
                "INSERT INTO people (uuid, name, role, wants_accommodation)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    person.id.to_string(),
                    person.name.as_str(),
                    person.role.as_str(),
                    bool_to_int(person.wants_accommodation),
                ],
            )
            .map_err(|err| map_insert_error(err, Entity::Person, &person.name))?;
        Ok(person.id)
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        load_person(self.conn, id)
    }

    fn find_person_by_name(&self, name: &str) -> RepoResult<Option<Person>> {
        self.conn
            .query_row(
                &format!("{PERSON_SELECT_SQL} WHERE p.name = ?1;"),
                [name],
                |row| Ok(parse_person_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_people(&self, role: Option<PersonRole>) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL}
             WHERE (?1 IS NULL OR p.role = ?1)
             ORDER BY p.id ASC;"
        ))?;
        let mut rows = stmt.query([role.map(PersonRole::as_str)])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }
        Ok(people)
    }

    fn count_people(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

pub(crate) fn load_person(conn: &Connection, id: PersonId) -> RepoResult<Option<Person>> {
    conn.query_row(
        &format!("{PERSON_SELECT_SQL} WHERE p.uuid = ?1;"),
        [id.to_string()],
        |row| Ok(parse_person_row(row)),
    )
    .optional()?
    .transpose()
}

pub(crate) fn load_required_person(conn: &Connection, id: PersonId) -> RepoResult<Person> {
    load_person(conn, id)?.ok_or_else(|| RepoError::NotFound {
        entity: Entity::Person,
        key: id.to_string(),
    })
}

pub(crate) fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "people.uuid")?;

    let role_text: String = row.get("role")?;
    let role = match role_text.as_str() {
        "staff" => PersonRole::Staff,
        "fellow" => PersonRole::Fellow,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid role `{other}` in people.role"
            )));
        }
    };

    let wants_accommodation = match row.get::<_, i64>("wants_accommodation")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid wants_accommodation value `{other}` in people.wants_accommodation"
            )));
        }
    };

    Ok(Person {
        id,
        name: row.get("name")?,
        role,
        wants_accommodation,
    })
}
