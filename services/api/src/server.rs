use crate::cli::ServeArgs;
use crate::infra::{build_catalog, resolve_seed_path, AppState, SeedFile};
use crate::routes::with_catalog_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hotel_catalog::config::AppConfig;
use hotel_catalog::error::AppError;
use hotel_catalog::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    let seed_path = resolve_seed_path(&mut config, args.seed.take())?;

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let seed = match seed_path.as_deref() {
        Some(path) => {
            info!(path = %path.display(), "loading catalog seed");
            SeedFile::load(Some(path))?
        }
        None => {
            warn!("CATALOG_SEED_PATH not set; serving demo records");
            SeedFile::load(None)?
        }
    };
    let hotels = seed.catalog.hotels.len();
    let sessions = seed.sessions.len();
    let (service, identity) = build_catalog(seed)?;

    let app = with_catalog_routes(service, identity)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, hotels, sessions, "hotel catalog ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(readiness_flag))
        .await?;
    Ok(())
}

async fn shutdown_signal(readiness: Arc<AtomicBool>) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    readiness.store(false, Ordering::Release);
    info!("shutdown signal received; draining connections");
}
