//! Derived financial aggregates for the listings.
//!
//! Every aggregate has two implementations behind the [Report] trait:
//!
//! - [InProcessReport] loads the records into a [Ledger] and walks it.
//! - [SqlReport] lets SQLite compute the aggregates with correlated
//!   subqueries in scaled integer arithmetic.
//!
//! Both implementations must return identical summaries for any valid data.

mod ledger;
mod sql;
mod summary;


use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{AppState, Error, club::ClubId};

pub use ledger::{InProcessReport, Ledger};
pub use sql::SqlReport;
pub use summary::{
    ClubSummary, InvoiceRowSummary, InvoiceSummary, PartySummary, VisitorToPartySummary,
};

/// An aggregate that cannot be computed from the stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CalculationError {
    /// The average income per party was requested for a club without parties.
    #[error("division by zero: club {0} has no parties to average income over")]
    NoParties(ClubId),

    /// A total exceeded the largest amount a 64-bit integer holds at four
    /// decimal places.
    #[error("an amount exceeds the largest storable total")]
    AmountOverflow,
}

/// Read-only listings of the records with their derived aggregates.
///
/// Each listing returns at most `limit` records ordered by ID.
pub trait Report {
    /// List invoice rows with their amounts.
    fn invoice_rows(&self, limit: u32) -> Result<Vec<InvoiceRowSummary>, Error>;

    /// List invoices with their details and totals.
    fn invoices(&self, limit: u32) -> Result<Vec<InvoiceSummary>, Error>;

    /// List visitor-to-party links with the amounts of their invoices.
    fn visitor_to_parties(&self, limit: u32) -> Result<Vec<VisitorToPartySummary>, Error>;

    /// List parties with their invoice counts and income.
    fn parties(&self, limit: u32) -> Result<Vec<PartySummary>, Error>;

    /// List clubs with their party statistics.
    fn clubs(&self, limit: u32) -> Result<Vec<ClubSummary>, Error>;
}

/// Where the aggregates served by the listings are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AggregationSource {
    /// Let the database compute the aggregates.
    #[default]
    Database,
    /// Load the records and compute the aggregates in the server process.
    InProcess,
}

impl AggregationSource {
    /// Create the [Report] implementation for this source.
    ///
    /// # Errors
    /// Returns an error if [AggregationSource::InProcess] cannot load the records.
    pub fn report(self, connection: &Connection) -> Result<Box<dyn Report + '_>, Error> {
        match self {
            AggregationSource::Database => Ok(Box::new(SqlReport::new(connection))),
            AggregationSource::InProcess => Ok(Box::new(InProcessReport::load(connection)?)),
        }
    }
}

/// The state needed by the listing endpoints.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where the aggregates are computed.
    pub aggregation: AggregationSource,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            aggregation: state.aggregation,
        }
    }
}

impl ReportState {
    /// Run `query` against the report for the configured aggregation source.
    pub(crate) fn query<T>(
        &self,
        query: impl FnOnce(&dyn Report) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let connection = self
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let report = self.aggregation.report(&connection)?;

        query(report.as_ref())
    }
}
