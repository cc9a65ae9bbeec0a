use crate::cli::ServeArgs;
use crate::infra::{cors_layer, initialized_cohort, load_analytics, AppState};
use crate::routes::with_cohort_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cohort_risk::config::AppConfig;
use cohort_risk::error::AppError;
use cohort_risk::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let cohort_service = Arc::new(initialized_cohort(&config.cohort)?);
    let analytics = load_analytics(&config.analytics)?.map(Arc::new);
    if let Some(engine) = analytics.as_ref() {
        info!(students = engine.students().len(), "psychometric analytics enabled");
    }

    let app = with_cohort_routes(cohort_service, analytics)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "cohort risk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
