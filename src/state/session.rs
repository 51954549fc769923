/// Session expiry
///
/// Any request answered with 401 ends the session. The first one to
/// notice sends the user to the login page; later ones stay silent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag set once the server rejected our session.
#[derive(Debug, Clone, Default)]
pub struct SessionGuard {
    expired: Arc<AtomicBool>,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the session as expired. Returns true only for the first caller,
    /// which is the one that performs the redirect.
    pub fn expire(&self) -> bool {
        !self.expired.swap(true, Ordering::SeqCst)
    }

    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::SeqCst)
    }
}
