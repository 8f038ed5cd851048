//! Application router configuration.

use axum::{Router, routing::get};

use crate::{
    AppState, club::get_club_list, endpoints, invoice::get_invoice_list,
    invoice_row::get_invoice_row_list, not_found::get_404_not_found, party::get_party_list,
    visitor_to_party::get_visitor_to_party_list,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::CLUB_LIST, get(get_club_list))
        .route(endpoints::PARTY_LIST, get(get_party_list))
        .route(endpoints::INVOICE_LIST, get(get_invoice_list))
        .route(endpoints::INVOICE_ROW_LIST, get(get_invoice_row_list))
        .route(
            endpoints::VISITOR_TO_PARTY_LIST,
            get(get_visitor_to_party_list),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;

    use crate::{
        AggregationSource, endpoints,
        test_utils::{get_test_connection, test_server},
    };

    #[tokio::test]
    async fn every_list_responds_on_empty_database() {
        let server = test_server(get_test_connection(), AggregationSource::Database);

        for endpoint in [
            endpoints::CLUB_LIST,
            endpoints::PARTY_LIST,
            endpoints::INVOICE_LIST,
            endpoints::INVOICE_ROW_LIST,
            endpoints::VISITOR_TO_PARTY_LIST,
        ] {
            let response = server.get(endpoint).await;

            response.assert_status_ok();
            assert_eq!(response.json::<serde_json::Value>(), serde_json::json!([]));
        }
    }

    #[tokio::test]
    async fn lists_are_read_only() {
        let server = test_server(get_test_connection(), AggregationSource::Database);

        let response = server.post(endpoints::CLUB_LIST).await;

        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }
}
