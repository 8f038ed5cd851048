//! Database operations for parties.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    club::ClubId,
    db::non_empty,
    party::{Party, PartyId},
};

/// Create a party hosted by the club `club_id`.
///
/// # Errors
/// This function will return an error if:
/// - `name` is empty,
/// - `club_id` does not refer to a valid club,
/// - or there is some other SQL error.
pub fn create_party(name: &str, club_id: ClubId, connection: &Connection) -> Result<Party, Error> {
    let name = non_empty(name, "party name")?;

    connection.execute(
        "INSERT INTO party (name, club_id) VALUES (?1, ?2);",
        (name, club_id),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Party {
        id,
        name: name.to_owned(),
        club_id,
    })
}

/// Retrieve a single party by ID.
pub fn get_party(party_id: PartyId, connection: &Connection) -> Result<Party, Error> {
    connection
        .prepare("SELECT id, name, club_id FROM party WHERE id = :id;")?
        .query_row(&[(":id", &party_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all parties ordered by ID.
pub fn get_all_parties(connection: &Connection) -> Result<Vec<Party>, Error> {
    connection
        .prepare("SELECT id, name, club_id FROM party ORDER BY id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_party| maybe_party.map_err(|error| error.into()))
        .collect()
}

/// Initialize the party table and indexes.
pub fn create_party_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS party (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            club_id INTEGER NOT NULL,
            FOREIGN KEY(club_id) REFERENCES club(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_party_club_id ON party(club_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Party, rusqlite::Error> {
    Ok(Party {
        id: row.get(0)?,
        name: row.get(1)?,
        club_id: row.get(2)?,
    })
}
