use crate::{
    cmd::Settings,
    modules::handlers::{
        liveness, readiness,
        student::{list_students, student_heatmap, student_stats},
    },
};
use anyhow::{Context, Result};
use axum::{extract::Extension, routing, Router, Server};
use cf_coach_libs::store::RosterStore;
use clap::Args;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::CorsLayer;

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    port: Option<u16>,
}

pub async fn run(args: ServerArgs) -> Result<()> {
    let settings = Settings::from_env()?;
    let store = settings.store();

    store.list().await.with_context(|| {
        let message = format!("roster {} is not readable", store.path().display());
        tracing::error!(message);
        message
    })?;

    let app = create_router(store);
    let port = match args.port {
        Some(port) => port,
        None => {
            tracing::warn!("API server will be launched at default port number 8000");
            8000u16
        }
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server start at port {}", port);
    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    Ok(())
}

fn create_router(store: RosterStore) -> Router {
    Router::new()
        .route("/api/students", routing::get(list_students))
        .route("/api/students/:handle/stats", routing::get(student_stats))
        .route("/api/students/:handle/heatmap", routing::get(student_heatmap))
        .route("/api/liveness", routing::get(liveness))
        .route("/api/readiness", routing::get(readiness))
        .layer(Extension(Arc::new(store)))
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler.");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("SIGINT signal received, starting graceful shutdown.");
}
