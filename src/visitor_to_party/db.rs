//! Database operations for visitor-to-party links.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    invoice::InvoiceId,
    party::PartyId,
    visitor::VisitorId,
    visitor_to_party::VisitorToParty,
};

/// Link a visitor to a party, optionally attaching an invoice.
///
/// # Errors
/// This function will return an error if:
/// - any of the IDs do not refer to a valid record,
/// - the invoice is already linked ([Error::DuplicateInvoiceLink]),
/// - or there is some other SQL error.
pub fn create_visitor_to_party(
    visitor_id: VisitorId,
    party_id: PartyId,
    invoice_id: Option<InvoiceId>,
    connection: &Connection,
) -> Result<VisitorToParty, Error> {
    connection.execute(
        "INSERT INTO visitor_to_party (visitor_id, party_id, invoice_id) VALUES (?1, ?2, ?3);",
        (visitor_id, party_id, invoice_id),
    )?;

    let id = connection.last_insert_rowid();

    Ok(VisitorToParty {
        id,
        visitor_id,
        party_id,
        invoice_id,
    })
}

/// Retrieve all links ordered by ID.
pub fn get_all_visitor_to_parties(connection: &Connection) -> Result<Vec<VisitorToParty>, Error> {
    connection
        .prepare("SELECT id, visitor_id, party_id, invoice_id FROM visitor_to_party ORDER BY id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_link| maybe_link.map_err(|error| error.into()))
        .collect()
}

/// Initialize the visitor-to-party table and indexes.
///
/// The unique constraint on `invoice_id` makes the invoice link one-to-one.
pub fn create_visitor_to_party_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS visitor_to_party (
            id INTEGER PRIMARY KEY,
            visitor_id INTEGER NOT NULL,
            party_id INTEGER NOT NULL,
            invoice_id INTEGER UNIQUE,
            FOREIGN KEY(visitor_id) REFERENCES visitor(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(party_id) REFERENCES party(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(invoice_id) REFERENCES invoice(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_visitor_to_party_party_id ON visitor_to_party(party_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<VisitorToParty, rusqlite::Error> {
    Ok(VisitorToParty {
        id: row.get(0)?,
        visitor_id: row.get(1)?,
        party_id: row.get(2)?,
        invoice_id: row.get(3)?,
    })
}
