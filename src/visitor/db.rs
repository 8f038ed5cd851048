//! Database operations for visitors.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::non_empty,
    visitor::{Visitor, VisitorId},
};

/// Create a visitor and return it with its generated ID.
///
/// # Errors
/// Returns [Error::EmptyText] if `full_name` is empty.
pub fn create_visitor(full_name: &str, age: u32, connection: &Connection) -> Result<Visitor, Error> {
    let full_name = non_empty(full_name, "full name")?;

    connection.execute(
        "INSERT INTO visitor (full_name, age) VALUES (?1, ?2);",
        (full_name, i64::from(age)),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Visitor {
        id,
        full_name: full_name.to_owned(),
        age,
    })
}

/// Retrieve a single visitor by ID.
pub fn get_visitor(visitor_id: VisitorId, connection: &Connection) -> Result<Visitor, Error> {
    connection
        .prepare("SELECT id, full_name, age FROM visitor WHERE id = :id;")?
        .query_row(&[(":id", &visitor_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all visitors ordered by ID.
pub fn get_all_visitors(connection: &Connection) -> Result<Vec<Visitor>, Error> {
    connection
        .prepare("SELECT id, full_name, age FROM visitor ORDER BY id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_visitor| maybe_visitor.map_err(|error| error.into()))
        .collect()
}

/// Initialize the visitor table.
pub fn create_visitor_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS visitor (
            id INTEGER PRIMARY KEY,
            full_name TEXT NOT NULL,
            age INTEGER NOT NULL CHECK (age >= 0)
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Visitor, rusqlite::Error> {
    Ok(Visitor {
        id: row.get(0)?,
        full_name: row.get(1)?,
        age: row.get(2)?,
    })
}

#[cfg(test)]
mod visitor_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        visitor::{create_visitor, get_all_visitors, get_visitor},
    };

    use super::create_visitor_table;

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_visitor_table(&connection).expect("Could not create visitor table");
        connection
    }

    #[test]
    fn create_visitor_succeeds() {
        let connection = get_test_db_connection();

        let visitor = create_visitor("Ivo", 20, &connection).expect("Could not create visitor");

        assert_eq!(visitor.age, 20);
        assert_eq!(get_visitor(visitor.id, &connection), Ok(visitor));
    }

    #[test]
    fn create_visitor_fails_on_empty_name() {
        let connection = get_test_db_connection();

        assert_eq!(
            create_visitor("", 20, &connection),
            Err(Error::EmptyText("full name"))
        );
    }

    #[test]
    fn get_all_visitors_returns_insertion_order() {
        let connection = get_test_db_connection();
        let want = vec![
            create_visitor("Ivaylo Donchev", 20, &connection).unwrap(),
            create_visitor("Pavlin Gergov", 31, &connection).unwrap(),
        ];

        assert_eq!(get_all_visitors(&connection), Ok(want));
    }
}
