use crate::error::InterviewError;
use crate::session::InterviewSession;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single interview session served by this process
    pub session: Arc<Mutex<InterviewSession>>,
}

impl AppState {
    pub fn new(session: InterviewSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Exclusive access to the session, or `Busy` while another call holds it
    pub fn session(&self) -> Result<MutexGuard<'_, InterviewSession>, InterviewError> {
        self.session.try_lock().map_err(|_| InterviewError::Busy)
    }

    /// Access for read-only routes, waiting for any in-flight call to finish
    pub async fn read(&self) -> MutexGuard<'_, InterviewSession> {
        self.session.lock().await
    }
}
