//! Clubhouse is a reporting backend for club, party and invoice bookkeeping.
//!
//! Clubs host parties, visitors attend parties, and each attendance may carry
//! an invoice made of line items. This library serves read-only JSON listings
//! of those records together with derived financial aggregates (invoice
//! totals, party income, average income per club, ...).
//!
//! Every aggregate can be computed in two ways: by walking the records in
//! process ([report::InProcessReport]) or by letting SQLite compute it with
//! correlated subqueries ([report::SqlReport]). Both produce identical
//! results.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use tokio::signal;

mod app_state;
pub mod club;
mod db;
pub mod endpoints;
pub mod invoice;
pub mod invoice_row;
mod logging;
pub mod money;
mod not_found;
pub mod party;
pub mod report;
mod routing;
pub mod visitor;
pub mod visitor_to_party;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use report::{AggregationSource, CalculationError};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used for a name or description.
    ///
    /// The payload names the field that was empty.
    #[error("{0} cannot be empty")]
    EmptyText(&'static str),

    /// A tax rate had more than two decimal places or was outside of
    /// `0.00..=99.99`.
    #[error("{0} is not a valid tax rate, expected a value between 0.00 and 99.99")]
    InvalidTaxRate(Decimal),

    /// A unit price had more than two decimal places or was outside of
    /// `0.00..=99.99`.
    #[error("{0} is not a valid unit price, expected a value between 0.00 and 99.99")]
    InvalidUnitPrice(Decimal),

    /// A quantity was larger than the database can store.
    #[error("{0} is not a valid quantity")]
    InvalidQuantity(u32),

    /// The invoice is already attached to another visitor at a party.
    ///
    /// An invoice belongs to exactly one visitor-to-party link.
    #[error("the invoice is already linked to a visitor at a party")]
    DuplicateInvoiceLink,

    /// A query was given an ID that does not refer to an existing record.
    #[error("a referenced record does not exist")]
    InvalidForeignKey,

    /// An aggregate could not be computed from the stored records.
    #[error(transparent)]
    Calculation(#[from] CalculationError),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 787 => {
                Error::InvalidForeignKey
            }
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067
                    && desc.ends_with("visitor_to_party.invoice_id") =>
            {
                Error::DuplicateInvoiceLink
            }
            // SUM() fails with this message once a total leaves the i64 range.
            rusqlite::Error::SqliteFailure(_, Some(ref message)) if message == "integer overflow" => {
                Error::Calculation(CalculationError::AmountOverflow)
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyText(_)
            | Error::InvalidTaxRate(_)
            | Error::InvalidUnitPrice(_)
            | Error::InvalidQuantity(_)
            | Error::DuplicateInvoiceLink
            | Error::InvalidForeignKey => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Calculation(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // Server side failures are only described in the logs.
        let message = if status_code.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
            "Sorry, something went wrong. Try again later or check the server logs".to_owned()
        } else {
            self.to_string()
        };

        error_response(status_code, &message)
    }
}

/// Build the JSON error body shared by all failing responses.
pub(crate) fn error_response(status_code: StatusCode, message: &str) -> Response {
    (
        status_code,
        Json(serde_json::json!({
            "error": {
                "code": status_code.as_u16(),
                "message": message,
            }
        })),
    )
        .into_response()
}
