//! Database operations for invoices.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    invoice::{Invoice, InvoiceId},
    money::TaxRate,
};

/// Create an invoice and return it with its generated ID.
///
/// The description is stored as given, an empty description behaves like a
/// missing one when the invoice details are computed.
pub fn create_invoice(
    description: Option<&str>,
    default_tax_rate: TaxRate,
    connection: &Connection,
) -> Result<Invoice, Error> {
    connection.execute(
        "INSERT INTO invoice (description, default_tax_rate_percent) VALUES (?1, ?2);",
        (description, default_tax_rate.as_percent()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Invoice {
        id,
        description: description.map(str::to_owned),
        default_tax_rate,
    })
}

/// Retrieve a single invoice by ID.
pub fn get_invoice(invoice_id: InvoiceId, connection: &Connection) -> Result<Invoice, Error> {
    connection
        .prepare(
            "SELECT id, description, default_tax_rate_percent FROM invoice WHERE id = :id;",
        )?
        .query_row(&[(":id", &invoice_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all invoices ordered by ID.
pub fn get_all_invoices(connection: &Connection) -> Result<Vec<Invoice>, Error> {
    connection
        .prepare("SELECT id, description, default_tax_rate_percent FROM invoice ORDER BY id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_invoice| maybe_invoice.map_err(|error| error.into()))
        .collect()
}

/// Initialize the invoice table.
///
/// Tax rates are stored in whole percent, see [TaxRate::as_percent].
pub fn create_invoice_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS invoice (
            id INTEGER PRIMARY KEY,
            description TEXT,
            default_tax_rate_percent INTEGER NOT NULL DEFAULT 20
                CHECK (default_tax_rate_percent BETWEEN 0 AND 9999)
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Invoice, rusqlite::Error> {
    Ok(Invoice {
        id: row.get(0)?,
        description: row.get(1)?,
        default_tax_rate: TaxRate::from_percent(row.get(2)?),
    })
}

#[cfg(test)]
mod invoice_query_tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use crate::{
        Error,
        invoice::{create_invoice, get_all_invoices, get_invoice},
        money::TaxRate,
    };

    use super::create_invoice_table;

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_invoice_table(&connection).expect("Could not create invoice table");
        connection
    }

    #[test]
    fn create_invoice_succeeds() {
        let connection = get_test_db_connection();
        let rate = TaxRate::new(dec!(0.8)).unwrap();

        let invoice = create_invoice(Some("asdf"), rate, &connection)
            .expect("Could not create invoice");

        assert_eq!(get_invoice(invoice.id, &connection), Ok(invoice));
    }

    #[test]
    fn create_invoice_without_description() {
        let connection = get_test_db_connection();

        let invoice = create_invoice(None, TaxRate::DEFAULT_INVOICE_RATE, &connection)
            .expect("Could not create invoice");

        let got = get_invoice(invoice.id, &connection).expect("Could not get invoice");
        assert_eq!(got.description, None);
        assert_eq!(got.default_tax_rate.as_decimal(), dec!(0.2));
    }

    #[test]
    fn get_invoice_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(get_invoice(1, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_all_invoices_returns_insertion_order() {
        let connection = get_test_db_connection();
        let want = vec![
            create_invoice(None, TaxRate::from_percent(50), &connection).unwrap(),
            create_invoice(Some(""), TaxRate::ZERO, &connection).unwrap(),
        ];

        assert_eq!(get_all_invoices(&connection), Ok(want));
    }
}
