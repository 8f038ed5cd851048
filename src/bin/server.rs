use std::{
    fs::OpenOptions,
    net::SocketAddr,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use clubhouse_rs::{
    AggregationSource, AppState, build_router, graceful_shutdown, logging_middleware,
};

/// The JSON reporting server for clubhouse_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "CLUBHOUSE_DB_PATH")]
    db_path: PathBuf,

    /// The port to serve the API from.
    #[arg(short, long, env = "CLUBHOUSE_PORT", default_value_t = 3000)]
    port: u16,

    /// Where the aggregates in the listings are computed.
    #[arg(long, env = "CLUBHOUSE_AGGREGATION", value_enum, default_value_t)]
    aggregation: AggregationSource,

    /// File path for the debug log.
    #[arg(long, env = "CLUBHOUSE_LOG_PATH", default_value = "debug.log")]
    log_path: PathBuf,
}

/// A failure that stops the server from starting.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("could not open the log file: {0}")]
    LogFile(std::io::Error),

    #[error("could not open the database: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("could not initialize the app: {0}")]
    App(#[from] clubhouse_rs::Error),

    #[error("the server stopped unexpectedly: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_path) {
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }

    match serve(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(args: Args) -> Result<(), StartupError> {
    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let connection = Connection::open(&args.db_path)?;
    let state = AppState::new(connection, args.aggregation)?;

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!(
        "HTTP server listening on {addr}, computing aggregates with {:?}",
        args.aggregation
    );
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .map_err(StartupError::Serve)
}

fn setup_logging(log_path: &Path) -> Result<(), StartupError> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(StartupError::LogFile)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(tracing_layer)
}
