use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryReportRepository, InMemoryReviewRepository, LoggingNotifier};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use tradeshub::config::AppConfig;
use tradeshub::error::AppError;
use tradeshub::telemetry;
use tradeshub::workflows::reports::BadPayerReportService;
use tradeshub::workflows::reviews::ReviewService;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(config.environment, &config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let report_service = Arc::new(BadPayerReportService::new(
        Arc::new(InMemoryReportRepository::default()),
        Arc::new(LoggingNotifier::default()),
        config.reports.policy(),
    ));
    let review_service = Arc::new(ReviewService::new(Arc::new(
        InMemoryReviewRepository::default(),
    )));

    let app = with_workflow_routes(report_service, review_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        min_description_chars = config.reports.min_description_chars,
        "tradeshub api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
