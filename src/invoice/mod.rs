//! Invoices and the invoice listing.

mod db;
mod domain;
mod list;

pub use db::{create_invoice, create_invoice_table, get_all_invoices, get_invoice};
pub use domain::{Invoice, InvoiceId};
pub use list::{INVOICE_PAGE_SIZE, InvoiceListItem, get_invoice_list};
