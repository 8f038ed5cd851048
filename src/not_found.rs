use axum::{http::StatusCode, response::Response};

use crate::error_response;

pub async fn get_404_not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "the requested resource could not be found",
    )
}

#[cfg(test)]
mod not_found_tests {
    use axum::http::StatusCode;

    use crate::{
        AggregationSource,
        test_utils::{get_test_connection, test_server},
    };

    #[tokio::test]
    async fn unknown_route_returns_json_404() {
        let server = test_server(get_test_connection(), AggregationSource::Database);

        let response = server.get("/dashboard/list/nope").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<serde_json::Value>(),
            serde_json::json!({
                "error": {
                    "code": 404,
                    "message": "the requested resource could not be found",
                }
            })
        );
    }
}
