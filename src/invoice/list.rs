//! The invoice listing endpoint.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    Error,
    invoice::InvoiceId,
    money::format_money,
    report::{InvoiceSummary, ReportState},
};

/// The maximum number of invoices returned by the invoice listing.
pub const INVOICE_PAGE_SIZE: u32 = 30;

/// An invoice as shown in the invoice listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceListItem {
    /// The ID of the invoice.
    pub id: InvoiceId,
    /// The description, or the first row's description.
    pub details: Option<String>,
    /// The tax rate applied to rows without their own rate.
    pub default_tax_rate: String,
    /// The sum of the row amounts.
    pub total_amount: String,
}

impl From<InvoiceSummary> for InvoiceListItem {
    fn from(summary: InvoiceSummary) -> Self {
        Self {
            id: summary.id,
            details: summary.details,
            default_tax_rate: format_money(summary.default_tax_rate.as_decimal()),
            total_amount: format_money(summary.total_amount),
        }
    }
}

/// A route handler that lists the first [INVOICE_PAGE_SIZE] invoices.
pub async fn get_invoice_list(
    State(state): State<ReportState>,
) -> Result<Json<Vec<InvoiceListItem>>, Error> {
    let invoices = state
        .query(|report| report.invoices(INVOICE_PAGE_SIZE))
        .inspect_err(|error| tracing::error!("could not list invoices: {error}"))?;

    Ok(Json(invoices.into_iter().map(InvoiceListItem::from).collect()))
}
