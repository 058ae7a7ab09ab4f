use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session and setup
        .route("/session", get(handlers::get_session))
        .route("/session/coding-stage", post(handlers::set_coding_stage))
        .route("/session/setup", post(handlers::begin_session))
        // Answer capture
        .route("/session/recording/start", post(handlers::start_recording))
        .route("/session/recording/stop", post(handlers::stop_recording))
        .route(
            "/session/responses/:question_id/audio",
            get(handlers::get_response_audio),
        )
        // Navigation and submission
        .route("/session/next", post(handlers::next_question))
        .route("/session/previous", post(handlers::previous_question))
        .route("/session/submit", post(handlers::submit_answers))
        // Coding challenge
        .route("/session/coding/prompt", get(handlers::get_coding_prompt))
        .route(
            "/session/coding/prompt/refetch",
            post(handlers::refetch_coding_prompt),
        )
        .route("/session/coding/submit", post(handlers::submit_code))
        // Results
        .route("/session/results", get(handlers::get_results))
        .route("/session/restart", post(handlers::restart_session))
        // Browser front-ends run on another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
