use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod bookings;
pub mod error;
pub mod state;
pub mod translate;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // Any origin is allowed; narrow this before exposing the service publicly.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    Router::new()
        .merge(bookings::routes())
        .merge(translate::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
