//! Schema setup and helpers shared by the per-entity database modules.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, club::create_club_table, invoice::create_invoice_table,
    invoice_row::create_invoice_row_table, party::create_party_table,
    visitor::create_visitor_table, visitor_to_party::create_visitor_to_party_table,
};

/// Create the tables for the domain models if they do not exist yet.
///
/// Foreign key enforcement is switched on for `connection`.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_club_table(&transaction)?;
    create_party_table(&transaction)?;
    create_visitor_table(&transaction)?;
    create_invoice_table(&transaction)?;
    create_invoice_row_table(&transaction)?;
    create_visitor_to_party_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Trim `text` and reject it if nothing is left.
///
/// `field` names the value in the returned [Error::EmptyText].
pub(crate) fn non_empty<'a>(text: &'a str, field: &'static str) -> Result<&'a str, Error> {
    let text = text.trim();

    if text.is_empty() {
        Err(Error::EmptyText(field))
    } else {
        Ok(text)
    }
}
