//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, report::AggregationSource};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// Where the aggregates served by the listings are computed.
    pub aggregation: AggregationSource,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, aggregation: AggregationSource) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            aggregation,
        })
    }
}

#[cfg(test)]
mod app_state_tests {
    use rusqlite::Connection;

    use crate::{AggregationSource, AppState, club::get_all_clubs};

    #[test]
    fn new_initializes_the_database() {
        let connection = Connection::open_in_memory().unwrap();

        let state = AppState::new(connection, AggregationSource::InProcess)
            .expect("Could not create app state");

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_all_clubs(&connection), Ok(vec![]));
        assert_eq!(state.aggregation, AggregationSource::InProcess);
    }
}
