pub mod health;

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};
use crate::recommendation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/students/:student_id/recommendations",
            get(handlers::handle_recommend_for_student),
        )
        .route(
            "/api/v1/students/:student_id/recommendations/goals/:career_goal_id",
            get(handlers::handle_recommend_for_goal),
        )
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
