use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::server::constants::API_PREFIX;
use crate::server::handlers::{groups, messages, users};
use crate::server::shutdown_signal;
use crate::server::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/users", post(users::create_user))
        .route("/users/:id", get(users::get_user))
        .route("/groups", post(groups::create_group))
        .route(
            "/groups/users",
            post(groups::add_group_user).delete(groups::remove_group_user),
        )
        .route("/groups/:id", get(groups::get_group))
        .route("/groups/:id/users", get(groups::list_group_users))
        .route(
            "/groups/:id/users/history",
            get(groups::list_group_user_history),
        )
        .route("/groups/:id/messages", get(messages::list_group_messages))
        .route(
            "/messages",
            post(messages::send_message)
                .put(messages::edit_message)
                .delete(messages::delete_message),
        )
        .route("/messages/:id/history", get(messages::list_message_history));

    Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = state.config.server.address.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("starting server on: {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

pub async fn health(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.db_connection.is_healthy().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
