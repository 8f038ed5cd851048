//! Database operations for invoice rows.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::non_empty,
    invoice_row::{InvoiceRow, NewInvoiceRow},
    money::{TaxRate, UnitPrice},
};

/// Create an invoice row and return it with its generated ID.
///
/// Prices are stored in cents and tax rates in whole percent.
///
/// # Errors
/// This function will return an error if:
/// - the description is empty,
/// - the quantity does not fit into a signed 32-bit integer,
/// - `invoice_id` does not refer to a valid invoice,
/// - or there is some other SQL error.
pub fn create_invoice_row(row: NewInvoiceRow, connection: &Connection) -> Result<InvoiceRow, Error> {
    let description = non_empty(&row.description, "row description")?;

    if i32::try_from(row.quantity).is_err() {
        return Err(Error::InvalidQuantity(row.quantity));
    }

    connection.execute(
        "INSERT INTO invoice_row (invoice_id, description, tax_rate_percent, quantity, unit_price_cents)
        VALUES (?1, ?2, ?3, ?4, ?5);",
        (
            row.invoice_id,
            description,
            row.tax_rate.as_percent(),
            i64::from(row.quantity),
            row.unit_price.as_cents(),
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(InvoiceRow {
        id,
        invoice_id: row.invoice_id,
        description: description.to_owned(),
        tax_rate: row.tax_rate,
        quantity: row.quantity,
        unit_price: row.unit_price,
    })
}

/// Retrieve all invoice rows ordered by ID.
pub fn get_all_invoice_rows(connection: &Connection) -> Result<Vec<InvoiceRow>, Error> {
    connection
        .prepare(
            "SELECT id, invoice_id, description, tax_rate_percent, quantity, unit_price_cents
            FROM invoice_row ORDER BY id ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// Initialize the invoice row table and indexes.
pub fn create_invoice_row_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS invoice_row (
            id INTEGER PRIMARY KEY,
            invoice_id INTEGER NOT NULL,
            description TEXT NOT NULL,
            tax_rate_percent INTEGER NOT NULL DEFAULT 0 CHECK (tax_rate_percent BETWEEN 0 AND 9999),
            quantity INTEGER NOT NULL CHECK (quantity >= 0),
            unit_price_cents INTEGER NOT NULL CHECK (unit_price_cents BETWEEN 0 AND 9999),
            FOREIGN KEY(invoice_id) REFERENCES invoice(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_invoice_row_invoice_id ON invoice_row(invoice_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<InvoiceRow, rusqlite::Error> {
    Ok(InvoiceRow {
        id: row.get(0)?,
        invoice_id: row.get(1)?,
        description: row.get(2)?,
        tax_rate: TaxRate::from_percent(row.get(3)?),
        quantity: row.get(4)?,
        unit_price: UnitPrice::from_cents(row.get(5)?),
    })
}

#[cfg(test)]
mod invoice_row_query_tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use crate::{
        Error,
        db::initialize,
        invoice::create_invoice,
        invoice_row::{NewInvoiceRow, create_invoice_row, get_all_invoice_rows},
        money::{TaxRate, UnitPrice},
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn vodka(invoice_id: i64) -> NewInvoiceRow {
        NewInvoiceRow {
            invoice_id,
            description: "Vodka".to_owned(),
            tax_rate: TaxRate::new(dec!(0.5)).unwrap(),
            quantity: 2,
            unit_price: UnitPrice::new(dec!(5)).unwrap(),
        }
    }

    #[test]
    fn create_invoice_row_succeeds() {
        let connection = get_test_db_connection();
        let invoice = create_invoice(None, TaxRate::DEFAULT_INVOICE_RATE, &connection).unwrap();

        let row = create_invoice_row(vodka(invoice.id), &connection)
            .expect("Could not create invoice row");

        assert_eq!(get_all_invoice_rows(&connection), Ok(vec![row]));
    }

    #[test]
    fn create_invoice_row_fails_on_missing_invoice() {
        let connection = get_test_db_connection();

        let result = create_invoice_row(vodka(404), &connection);

        assert_eq!(result, Err(Error::InvalidForeignKey));
    }

    #[test]
    fn create_invoice_row_fails_on_empty_description() {
        let connection = get_test_db_connection();
        let invoice = create_invoice(None, TaxRate::DEFAULT_INVOICE_RATE, &connection).unwrap();

        let result = create_invoice_row(
            NewInvoiceRow {
                description: "   ".to_owned(),
                ..vodka(invoice.id)
            },
            &connection,
        );

        assert_eq!(result, Err(Error::EmptyText("row description")));
    }

    #[test]
    fn create_invoice_row_fails_on_huge_quantity() {
        let connection = get_test_db_connection();
        let invoice = create_invoice(None, TaxRate::DEFAULT_INVOICE_RATE, &connection).unwrap();

        let result = create_invoice_row(
            NewInvoiceRow {
                quantity: u32::MAX,
                ..vodka(invoice.id)
            },
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidQuantity(u32::MAX)));
    }

    #[test]
    fn create_invoice_row_accepts_largest_values() {
        let connection = get_test_db_connection();
        let invoice = create_invoice(None, TaxRate::DEFAULT_INVOICE_RATE, &connection).unwrap();

        let row = create_invoice_row(
            NewInvoiceRow {
                tax_rate: TaxRate::new(dec!(99.99)).unwrap(),
                quantity: i32::MAX as u32,
                unit_price: UnitPrice::new(dec!(99.99)).unwrap(),
                ..vodka(invoice.id)
            },
            &connection,
        )
        .expect("Could not create invoice row");

        assert_eq!(get_all_invoice_rows(&connection), Ok(vec![row]));
    }

    #[test]
    fn rows_keep_their_decimal_values() {
        let connection = get_test_db_connection();
        let invoice = create_invoice(None, TaxRate::DEFAULT_INVOICE_RATE, &connection).unwrap();
        create_invoice_row(
            NewInvoiceRow {
                quantity: 100,
                unit_price: UnitPrice::new(dec!(0.2)).unwrap(),
                ..vodka(invoice.id)
            },
            &connection,
        )
        .unwrap();

        let rows = get_all_invoice_rows(&connection).expect("Could not get rows");

        assert_eq!(rows[0].unit_price.as_decimal(), dec!(0.20));
        assert_eq!(rows[0].tax_rate.as_decimal(), dec!(0.50));
        assert_eq!(rows[0].amount_without_tax(), dec!(20));
    }
}
