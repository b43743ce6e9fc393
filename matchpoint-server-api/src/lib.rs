use log::info;
use matchpoint_server_domain::app::AppState;

pub mod error;
pub mod jwt;
pub mod routes;

pub async fn run(
    app_state: AppState,
    addr: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
) {
    let router = routes::build_router(app_state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind HTTP listener");
    info!("HTTP API listening on {}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .expect("HTTP server failed");
}
