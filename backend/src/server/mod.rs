//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, signing_secret};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use sweetshop::Trace;
#[cfg(debug_assertions)]
use sweetshop::doc::ApiDoc;
use sweetshop::inbound::http::configure_api;
use sweetshop::inbound::http::health::{HealthState, banner, health, live, ready};
use sweetshop::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure_api)
        .service(banner)
        .service(health)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Prometheus middleware exposing request metrics on `/metrics`.
#[cfg(feature = "metrics")]
fn build_metrics() -> std::io::Result<actix_web_prom::PrometheusMetrics> {
    actix_web_prom::PrometheusMetricsBuilder::new("sweetshop")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))
}

/// Resolve on SIGINT or, on Unix, SIGTERM. Never resolves if no handler can
/// be installed, so a failed registration cannot trigger a drain.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => {
                        if let Err(err) = result {
                            warn!(error = %err, "SIGINT handler failed");
                            std::future::pending::<()>().await;
                        }
                    }
                    _ = terminate.recv() => {}
                }
                return;
            }
            Err(err) => warn!(error = %err, "SIGTERM handler unavailable"),
        }
    }
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "SIGINT handler failed");
        std::future::pending::<()>().await;
    }
}

/// Fail liveness once `signal` resolves, then stop the server gracefully so
/// in-flight requests finish while probes report the drain.
async fn drain_on(
    signal: impl Future<Output = ()>,
    health_state: web::Data<HealthState>,
    handle: ServerHandle,
) {
    signal.await;
    info!("shutdown requested; draining");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] with binding, token, and store settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when building state, binding the socket, or
/// starting the server fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config).await?);
    let bind_addr = config.bind_addr;
    #[cfg(feature = "metrics")]
    let prometheus = build_metrics()?;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .disable_signals()
    .bind(bind_addr)?
    .run();

    actix_web::rt::spawn(drain_on(
        shutdown_signal(),
        health_state.clone(),
        server.handle(),
    ));
    health_state.mark_ready();
    Ok(server)
}
