//! The session gate.
//!
//! The identity provider is opaque to the listing. All it sees is a
//! [`SessionSignal`] published on a `watch` channel, moving from `Pending` to
//! `Present` or `Absent`. While the signal is not `Present` no listing fetch is
//! issued; on `Absent` the listing asks its [`Navigator`] to send the user to
//! authentication.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionSignal {
    /// No session: the user must authenticate.
    Absent,
    /// The session is still being restored.
    #[default]
    Pending,
    Present,
}

impl SessionSignal {
    pub fn allows_fetch(self) -> bool {
        self == SessionSignal::Present
    }
}

/// Creates the channel the identity layer publishes the session on.
pub fn session_channel(
    initial: SessionSignal,
) -> (watch::Sender<SessionSignal>, watch::Receiver<SessionSignal>) {
    watch::channel(initial)
}

/// Page routing, as far as the listing needs it.
pub trait Navigator: Send + Sync + 'static {
    fn redirect_to_auth(&self);
}

/// Logs the redirect and does nothing else.
#[derive(Debug, Clone, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn redirect_to_auth(&self) {
        info!("Session absent, redirecting to authentication");
    }
}

/// Counts redirects. Clones share the count.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    redirects: Arc<AtomicUsize>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_auth(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}
