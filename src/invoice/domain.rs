//! Core invoice domain types and the invoice level formulas.

use rust_decimal::Decimal;

use crate::{
    invoice_row::InvoiceRow,
    money::{TaxRate, sum_amounts},
    report::CalculationError,
};

/// Database identifier for an invoice.
pub type InvoiceId = i64;

/// An invoice issued to a visitor at a party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    /// The ID of the invoice.
    pub id: InvoiceId,
    /// An optional free text description.
    pub description: Option<String>,
    /// The tax rate applied to rows that do not set their own rate.
    pub default_tax_rate: TaxRate,
}

impl Invoice {
    /// The text describing the invoice.
    ///
    /// This is the invoice's own description if it is set and not empty,
    /// otherwise the description of the first row. `rows` must be the rows of
    /// this invoice ordered by ID.
    pub fn details<'a>(&'a self, rows: &'a [InvoiceRow]) -> Option<&'a str> {
        self.description
            .as_deref()
            .filter(|description| !description.is_empty())
            .or_else(|| rows.first().map(|row| row.description.as_str()))
    }

    /// The sum of the taxed amounts of `rows`, zero if there are no rows.
    ///
    /// `rows` must be the rows of this invoice.
    ///
    /// # Errors
    /// Returns [CalculationError::AmountOverflow] if the total is too large to
    /// be stored.
    pub fn total_amount(&self, rows: &[InvoiceRow]) -> Result<Decimal, CalculationError> {
        sum_amounts(rows.iter().map(|row| row.amount(self.default_tax_rate)))
    }
}
