use crate::{handlers, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Submission endpoint the web page posts its collection to
        .route("/", post(handlers::submit_collection))
        .route("/recommend", post(handlers::recommend))
        .route("/cards/named", get(handlers::lookup_card))
        // Session-scoped collections
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/{id}/cards", post(handlers::add_card))
        .route("/sessions/{id}/cards/{name}", delete(handlers::remove_card))
        .route("/sessions/{id}/recommend", post(handlers::recommend_session))
        .with_state(state)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
}
