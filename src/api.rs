mod v0;

use crate::domain::LocalAccount;
use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::IpAddr;
use tokio::{
    net::TcpListener,
    signal::unix::{signal, SignalKind},
    sync::watch,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Span};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    addr: IpAddr,
    port: u16,
}

#[derive(Debug, OpenApi)]
#[openapi()]
pub struct ApiDoc;

/// Serve the account API until SIGTERM arrives or a client requests shutdown.
/// Either way the server drains in-flight requests before returning, so an
/// admitted mutation is always applied before the process exits.
pub async fn serve(config: Config, account: LocalAccount) -> Result<()> {
    let Config { addr, port } = config;

    let shutdown_requested = account.shutdown_requested();
    let app_state = AppState { account };

    let mut api_doc = ApiDoc::openapi();
    api_doc.merge(v0::ApiDoc::openapi());

    let app = Router::new()
        .route("/", get(ready))
        .nest("/v0", v0::app())
        .merge(SwaggerUi::new("/api-doc").url("/openapi.json", api_doc))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(CorsLayer::permissive()),
        );

    let listener = TcpListener::bind((addr, port))
        .await
        .context("bind TcpListener")?;
    info!(%addr, port, "listening");
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal(shutdown_requested))
        .await
        .context("run server")
}

#[derive(Clone)]
struct AppState {
    account: LocalAccount,
}

async fn ready() -> StatusCode {
    StatusCode::OK
}

async fn shutdown_signal(mut shutdown_requested: watch::Receiver<bool>) {
    let mut sigterm = signal(SignalKind::terminate()).expect("install SIGTERM handler");
    tokio::select! {
        _ = sigterm.recv() => info!("SIGTERM received"),
        _ = shutdown_requested.changed() => info!("shutdown requested by client"),
    }
}

fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    info_span!("incoming request", path, ?headers)
}
