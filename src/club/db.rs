//! Database operations for clubs.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    club::{Club, ClubId},
    db::non_empty,
};

/// Create a club and return it with its generated ID.
///
/// # Errors
/// Returns [Error::EmptyText] if `name` is empty or only whitespace.
pub fn create_club(name: &str, connection: &Connection) -> Result<Club, Error> {
    let name = non_empty(name, "club name")?;

    connection.execute("INSERT INTO club (name) VALUES (?1);", (name,))?;

    let id = connection.last_insert_rowid();

    Ok(Club {
        id,
        name: name.to_owned(),
    })
}

/// Retrieve a single club by ID.
pub fn get_club(club_id: ClubId, connection: &Connection) -> Result<Club, Error> {
    connection
        .prepare("SELECT id, name FROM club WHERE id = :id;")?
        .query_row(&[(":id", &club_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all clubs ordered by ID.
pub fn get_all_clubs(connection: &Connection) -> Result<Vec<Club>, Error> {
    connection
        .prepare("SELECT id, name FROM club ORDER BY id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_club| maybe_club.map_err(|error| error.into()))
        .collect()
}

/// Initialize the club table.
pub fn create_club_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS club (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Club, rusqlite::Error> {
    Ok(Club {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
