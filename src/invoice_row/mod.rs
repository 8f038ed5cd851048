//! Invoice line items and the invoice row listing.

mod db;
mod domain;
mod list;

pub use db::{create_invoice_row, create_invoice_row_table, get_all_invoice_rows};
pub use domain::{InvoiceRow, InvoiceRowId, NewInvoiceRow};
pub use list::{INVOICE_ROW_PAGE_SIZE, InvoiceRowListItem, get_invoice_row_list};
