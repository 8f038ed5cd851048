//! Computes the aggregates inside SQLite.
//!
//! Every aggregate is a correlated subquery built from the fragments below.
//! Amounts never leave integer arithmetic: row amounts are computed at
//! [AMOUNT_SCALE](crate::money::AMOUNT_SCALE) (cents times percent) and only
//! the club level figures are rounded to cents, using round-half-to-even.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    money::{TaxRate, UnitPrice, amount_from_cents, amount_from_scaled},
    report::{
        CalculationError, ClubSummary, InvoiceRowSummary, InvoiceSummary, PartySummary, Report,
        VisitorToPartySummary,
    },
};

/// The amount of the invoice row `r` at scale 4, where `i` is its invoice.
///
/// A row tax rate of zero falls back to the invoice's default rate.
const ROW_AMOUNT: &str = "r.quantity * r.unit_price_cents
    * (100 + COALESCE(NULLIF(r.tax_rate_percent, 0), i.default_tax_rate_percent))";

/// The sum of the row amounts of the invoice `invoice_id` at scale 4.
fn invoice_total(invoice_id: &str) -> String {
    format!(
        "(SELECT COALESCE(SUM({ROW_AMOUNT}), 0)
        FROM invoice_row r INNER JOIN invoice i ON i.id = r.invoice_id
        WHERE r.invoice_id = {invoice_id})"
    )
}

/// The total of the invoice attached to the link `link`, NULL if there is none.
fn invoice_amount(link: &str) -> String {
    format!(
        "CASE WHEN {link}.invoice_id IS NULL THEN NULL ELSE {} END",
        invoice_total(&format!("{link}.invoice_id"))
    )
}

fn invoices_count(party_id: &str) -> String {
    format!(
        "(SELECT COUNT(*) FROM visitor_to_party l
        WHERE l.party_id = {party_id} AND l.invoice_id IS NOT NULL)"
    )
}

/// The unrounded income of the party `party_id` at scale 4.
fn party_income(party_id: &str) -> String {
    format!(
        "(SELECT COALESCE(SUM({}), 0) FROM visitor_to_party l
        WHERE l.party_id = {party_id} AND l.invoice_id IS NOT NULL)",
        invoice_total("l.invoice_id")
    )
}

/// `numerator / denominator` rounded half to even.
///
/// Both operands must be non-negative integers and `denominator` non-zero.
fn round_half_even_div(numerator: &str, denominator: &str) -> String {
    let quotient = format!("(({numerator}) / ({denominator}))");
    let twice_remainder = format!("(2 * (({numerator}) % ({denominator})))");

    format!(
        "({quotient} + CASE
            WHEN {twice_remainder} > ({denominator}) THEN 1
            WHEN {twice_remainder} = ({denominator}) THEN {quotient} % 2
            ELSE 0
        END)"
    )
}

/// A [Report] that lets the database compute the aggregates.
#[derive(Debug, Clone, Copy)]
pub struct SqlReport<'a> {
    connection: &'a Connection,
}

impl<'a> SqlReport<'a> {
    /// Create a report that queries `connection`.
    pub fn new(connection: &'a Connection) -> Self {
        Self { connection }
    }

    fn list<T>(
        &self,
        query: &str,
        limit: u32,
        map_row: impl FnMut(&Row) -> Result<T, rusqlite::Error>,
    ) -> Result<Vec<T>, Error> {
        self.connection
            .prepare(query)?
            .query_map(&[(":limit", &i64::from(limit))], map_row)?
            .map(|maybe_item| maybe_item.map_err(|error| error.into()))
            .collect()
    }
}

impl Report for SqlReport<'_> {
    fn invoice_rows(&self, limit: u32) -> Result<Vec<InvoiceRowSummary>, Error> {
        let query = format!(
            "SELECT r.id, r.invoice_id, r.description, r.tax_rate_percent, r.quantity,
                r.unit_price_cents, r.quantity * r.unit_price_cents, {ROW_AMOUNT}
            FROM invoice_row r INNER JOIN invoice i ON i.id = r.invoice_id
            ORDER BY r.id ASC LIMIT :limit;"
        );

        self.list(&query, limit, |row| {
            Ok(InvoiceRowSummary {
                id: row.get(0)?,
                invoice_id: row.get(1)?,
                description: row.get(2)?,
                tax_rate: TaxRate::from_percent(row.get(3)?),
                quantity: row.get(4)?,
                unit_price: UnitPrice::from_cents(row.get(5)?),
                amount_without_tax: amount_from_cents(row.get(6)?),
                amount: amount_from_scaled(row.get(7)?),
            })
        })
    }

    fn invoices(&self, limit: u32) -> Result<Vec<InvoiceSummary>, Error> {
        let query = format!(
            "SELECT inv.id,
                COALESCE(
                    NULLIF(inv.description, ''),
                    (SELECT r.description FROM invoice_row r
                    WHERE r.invoice_id = inv.id ORDER BY r.id ASC LIMIT 1)
                ),
                inv.default_tax_rate_percent,
                {}
            FROM invoice inv ORDER BY inv.id ASC LIMIT :limit;",
            invoice_total("inv.id")
        );

        self.list(&query, limit, |row| {
            Ok(InvoiceSummary {
                id: row.get(0)?,
                details: row.get(1)?,
                default_tax_rate: TaxRate::from_percent(row.get(2)?),
                total_amount: amount_from_scaled(row.get(3)?),
            })
        })
    }

    fn visitor_to_parties(&self, limit: u32) -> Result<Vec<VisitorToPartySummary>, Error> {
        let query = format!(
            "SELECT v.id, v.visitor_id, v.party_id, v.invoice_id, {}
            FROM visitor_to_party v ORDER BY v.id ASC LIMIT :limit;",
            invoice_amount("v")
        );

        self.list(&query, limit, |row| {
            Ok(VisitorToPartySummary {
                id: row.get(0)?,
                visitor_id: row.get(1)?,
                party_id: row.get(2)?,
                invoice_id: row.get(3)?,
                invoice_amount: row.get::<_, Option<i64>>(4)?.map(amount_from_scaled),
            })
        })
    }

    fn parties(&self, limit: u32) -> Result<Vec<PartySummary>, Error> {
        let query = format!(
            "SELECT p.id, p.name, p.club_id, {}, {}
            FROM party p ORDER BY p.id ASC LIMIT :limit;",
            invoices_count("p.id"),
            party_income("p.id")
        );

        self.list(&query, limit, |row| {
            Ok(PartySummary {
                id: row.get(0)?,
                name: row.get(1)?,
                club_id: row.get(2)?,
                invoices_count: row.get(3)?,
                total_party_income: amount_from_scaled(row.get(4)?),
            })
        })
    }

    fn clubs(&self, limit: u32) -> Result<Vec<ClubSummary>, Error> {
        let income = party_income("p.id");
        let query = format!(
            "SELECT id, name, parties_count, total_cents,
                CASE WHEN parties_count = 0 THEN NULL ELSE {average} END,
                first_party_name, first_party_income, last_party_name, last_party_income
            FROM (
                SELECT id, name, parties_count, {total} AS total_cents,
                    first_party_name, first_party_income, last_party_name, last_party_income
                FROM (
                    SELECT c.id AS id, c.name AS name,
                        (SELECT COUNT(*) FROM party p WHERE p.club_id = c.id) AS parties_count,
                        (SELECT COALESCE(SUM({income}), 0) FROM party p WHERE p.club_id = c.id)
                            AS raw_total,
                        (SELECT p.name FROM party p WHERE p.club_id = c.id
                            ORDER BY p.id ASC LIMIT 1) AS first_party_name,
                        (SELECT {income} FROM party p WHERE p.club_id = c.id
                            ORDER BY p.id ASC LIMIT 1) AS first_party_income,
                        (SELECT p.name FROM party p WHERE p.club_id = c.id
                            ORDER BY p.id DESC LIMIT 1) AS last_party_name,
                        (SELECT {income} FROM party p WHERE p.club_id = c.id
                            ORDER BY p.id DESC LIMIT 1) AS last_party_income
                    FROM club c ORDER BY c.id ASC LIMIT :limit
                )
            )
            ORDER BY id ASC;",
            average = round_half_even_div("total_cents", "parties_count"),
            total = round_half_even_div("raw_total", "100"),
        );

        self.list(&query, limit, |row| {
            let id = row.get(0)?;

            Ok(ClubSummary {
                id,
                name: row.get(1)?,
                parties_count: row.get(2)?,
                total_incomes: amount_from_cents(row.get(3)?),
                average_income_per_party: row
                    .get::<_, Option<i64>>(4)?
                    .map(amount_from_cents)
                    .ok_or(CalculationError::NoParties(id)),
                first_party_name: row.get(5)?,
                first_party_income: row.get::<_, Option<i64>>(6)?.map(amount_from_scaled),
                last_party_name: row.get(7)?,
                last_party_income: row.get::<_, Option<i64>>(8)?.map(amount_from_scaled),
            })
        })
    }
}

#[cfg(test)]
mod sql_fragment_tests {
    use rusqlite::Connection;

    use super::round_half_even_div;

    fn evaluate(numerator: i64, denominator: i64) -> i64 {
        let connection = Connection::open_in_memory().unwrap();
        let query = format!(
            "SELECT {};",
            round_half_even_div(&numerator.to_string(), &denominator.to_string())
        );

        connection.query_row(&query, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn exact_division_is_unchanged() {
        assert_eq!(evaluate(5250, 3), 1750);
    }

    #[test]
    fn rounds_to_nearest() {
        assert_eq!(evaluate(1000, 3), 333);
        assert_eq!(evaluate(2000, 3), 667);
    }

    #[test]
    fn midpoints_round_to_even() {
        assert_eq!(evaluate(125, 10), 12);
        assert_eq!(evaluate(135, 10), 14);
        assert_eq!(evaluate(5, 2), 2);
    }
}
