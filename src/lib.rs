use axum::{http::Method, middleware::from_fn, routing::get, Router};
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};

pub mod api;
pub mod config;
pub mod core;
pub mod docs;
pub mod error;
pub mod infrastructure;
pub mod middleware;
pub mod server;
pub mod state;

pub use server::{run_server, serve, ServerHandle};
pub use state::AppState;

use crate::middleware::validation::validate_json_middleware;

pub fn app(state: AppState) -> Router {
    let health_router = Router::new()
        .route("/health/live", get(api::health::live))
        .route("/health/ready", get(api::health::ready));

    let posts_router = Router::new()
        .route("/posts", get(api::posts::list_posts).post(api::posts::create_post))
        .route(
            "/posts/:id",
            get(api::posts::get_post)
                .put(api::posts::update_post)
                .delete(api::posts::delete_post),
        )
        .layer(from_fn(validate_json_middleware));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health_router)
        .merge(posts_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
