use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::storage::CredentialStore;

/// Where the app lands on launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Loading,
    ToAuthentication,
    ToHome,
}

impl Route {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Route::Loading)
    }
}

/// Only presence is checked; an expired token still routes home and the
/// first authenticated call reports it.
pub fn decide(token: Option<&str>) -> Route {
    match token {
        Some(token) if !token.trim().is_empty() => Route::ToHome,
        _ => Route::ToAuthentication,
    }
}

/// One-shot launch decision published on a watch channel.
pub struct StartupRouter {
    state: watch::Receiver<Route>,
}

impl StartupRouter {
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(800);

    /// Start resolving on the current tokio runtime.
    pub fn spawn(credentials: Arc<CredentialStore>, settle_delay: Duration) -> Self {
        let (tx, rx) = watch::channel(Route::Loading);

        tokio::spawn(async move {
            let token = credentials.get();
            tokio::time::sleep(settle_delay).await;

            let route = decide(token.as_deref());
            tracing::info!(?route, "Startup route resolved");
            tx.send_replace(route);
        });

        Self { state: rx }
    }

    pub fn current(&self) -> Route {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.state.clone()
    }

    /// Wait for the terminal route.
    pub async fn resolved(&self) -> Route {
        match self.state.clone().wait_for(|route| route.is_terminal()).await {
            Ok(route) => *route,
            // The resolver is gone without deciding; nothing to go home with.
            Err(_) => Route::ToAuthentication,
        }
    }
}
