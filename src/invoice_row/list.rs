//! The invoice row listing endpoint.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    Error,
    invoice::InvoiceId,
    invoice_row::InvoiceRowId,
    money::format_money,
    report::{InvoiceRowSummary, ReportState},
};

/// The maximum number of rows returned by the invoice row listing.
pub const INVOICE_ROW_PAGE_SIZE: u32 = 50;

/// An invoice row as shown in the invoice row listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRowListItem {
    /// The ID of the row.
    pub id: InvoiceRowId,
    /// The ID of the invoice the row belongs to.
    pub invoice: InvoiceId,
    /// What was sold.
    pub description: String,
    /// The row's own tax rate, "0.00" if it uses the invoice's rate.
    pub tax_rate: String,
    /// How many units were sold.
    pub quantity: u32,
    /// The price of a single unit before tax.
    pub unit_price: String,
    /// The amount including tax.
    pub amount: String,
}

impl From<InvoiceRowSummary> for InvoiceRowListItem {
    fn from(summary: InvoiceRowSummary) -> Self {
        Self {
            id: summary.id,
            invoice: summary.invoice_id,
            description: summary.description,
            tax_rate: format_money(summary.tax_rate.as_decimal()),
            quantity: summary.quantity,
            unit_price: format_money(summary.unit_price.as_decimal()),
            amount: format_money(summary.amount),
        }
    }
}

/// A route handler that lists the first [INVOICE_ROW_PAGE_SIZE] invoice rows.
pub async fn get_invoice_row_list(
    State(state): State<ReportState>,
) -> Result<Json<Vec<InvoiceRowListItem>>, Error> {
    let rows = state
        .query(|report| report.invoice_rows(INVOICE_ROW_PAGE_SIZE))
        .inspect_err(|error| tracing::error!("could not list invoice rows: {error}"))?;

    Ok(Json(rows.into_iter().map(InvoiceRowListItem::from).collect()))
}
