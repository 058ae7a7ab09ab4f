//! HTTP API for driving an interview session from a front-end
//!
//! This module provides a REST API over the single session of the process:
//! - GET /session - Session snapshot
//! - POST /session/setup - Complete setup and start questioning
//! - POST /session/recording/{start,stop} - Capture the current answer
//! - POST /session/{next,previous,submit} - Navigate and submit
//! - GET|POST /session/coding/... - Coding challenge
//! - GET /session/results, POST /session/restart - Results and restart
//! - GET /health - Health check
//!
//! Mutating calls answer `409` while another call is still in flight; reads
//! wait for it to finish.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
