use std::{error::Error, fs::OpenOptions, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use finance_dashboard::{
    AppState, BreakdownStyle, DEFAULT_PAGE_VIEW_CAPACITY, DashboardConfig, StoreConfig,
    build_router, graceful_shutdown, logging_middleware,
};

/// The web server for the finance dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The URL of the hosted transactions database, e.g. "https://abc.supabase.co".
    #[arg(long, env = "SUPABASE_URL")]
    store_url: Option<String>,

    /// The anonymous access key for the hosted transactions database.
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    store_key: Option<String>,

    /// File path to a local SQLite database to use instead of the hosted one.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// The port to serve the dashboard from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// How the spending breakdown is drawn.
    #[arg(long, value_enum, default_value_t = BreakdownStyle::Donut)]
    breakdown: BreakdownStyle,

    /// How many seconds to wait for the store to confirm a category change.
    #[arg(long, default_value_t = 10)]
    update_timeout_secs: u64,

    /// How many rendered pages keep their editable table state.
    #[arg(long, default_value_t = DEFAULT_PAGE_VIEW_CAPACITY)]
    page_view_capacity: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging()?;

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let store_config = StoreConfig::from_parts(
        args.store_url.as_deref(),
        args.store_key.as_deref(),
        args.db_path,
    );
    match &store_config {
        StoreConfig::Hosted { url, .. } => tracing::info!("Reading transactions from {url}"),
        StoreConfig::Sqlite(path) => tracing::info!("Reading transactions from {path:#?}"),
        StoreConfig::Pending => tracing::warn!(
            "The store URL or key is missing, the dashboard will ask for the connection settings"
        ),
    }
    let store = store_config.connect()?;

    let app_state = AppState::new(
        store,
        DashboardConfig {
            breakdown: args.breakdown,
            update_timeout: Duration::from_secs(args.update_timeout_secs),
            page_view_capacity: args.page_view_capacity,
        },
    );

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(app_state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

fn setup_logging() -> Result<(), Box<dyn Error>> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")?;

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
        .try_init()?;

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

    router.layer(tracing_layer)
}
