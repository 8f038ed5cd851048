//! Core invoice row domain types and the per-row formulas.

use rust_decimal::Decimal;

use crate::{
    invoice::InvoiceId,
    money::{TaxRate, UnitPrice},
};

/// Database identifier for an invoice row.
pub type InvoiceRowId = i64;

/// A line item on an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRow {
    /// The ID of the row.
    pub id: InvoiceRowId,
    /// The invoice the row belongs to.
    pub invoice_id: InvoiceId,
    /// What was sold.
    pub description: String,
    /// The row's own tax rate, zero means "use the invoice's default rate".
    pub tax_rate: TaxRate,
    /// How many units were sold.
    pub quantity: u32,
    /// The price of a single unit before tax.
    pub unit_price: UnitPrice,
}

impl InvoiceRow {
    /// The amount before tax: `quantity * unit_price`.
    pub fn amount_without_tax(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price.as_decimal()
    }

    /// The row's own tax rate, or `invoice_default` if the row's rate is zero.
    pub fn effective_tax_rate(&self, invoice_default: TaxRate) -> TaxRate {
        if self.tax_rate.is_zero() {
            invoice_default
        } else {
            self.tax_rate
        }
    }

    /// The amount including tax.
    ///
    /// `invoice_default` is the default tax rate of the row's invoice.
    pub fn amount(&self, invoice_default: TaxRate) -> Decimal {
        let tax_rate = self.effective_tax_rate(invoice_default).as_decimal();

        self.amount_without_tax() * (Decimal::ONE + tax_rate)
    }
}

/// The data needed to create an invoice row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoiceRow {
    /// The invoice the row belongs to.
    pub invoice_id: InvoiceId,
    /// What was sold.
    pub description: String,
    /// The row's own tax rate, [TaxRate::ZERO] to use the invoice's rate.
    pub tax_rate: TaxRate,
    /// How many units were sold.
    pub quantity: u32,
    /// The price of a single unit before tax.
    pub unit_price: UnitPrice,
}
