//! Session manager.
//!
//! Holds the current [`SessionState`] behind a watch channel so observers
//! (the cart store) can follow sign-in/sign-out transitions. The active
//! session is persisted to a single JSON document, which is how successive
//! CLI invocations share it; sign-out removes the document.

use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use tokio::sync::watch;
use tracing::{info, warn};

use crate::session::{
    errors::SessionError,
    models::{Session, SessionState},
};

#[derive(Debug)]
struct ManagerInner {
    state: watch::Sender<SessionState>,
    path: Option<PathBuf>,
}

/// Owner of the current session state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionManager {
    inner: Arc<ManagerInner>,
}

impl SessionManager {
    /// A manager with no persistence, starting anonymous.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(SessionState::Anonymous, None)
    }

    /// Open a manager over a persisted session document. A missing document
    /// starts anonymous; an undecodable one is discarded with a warning and
    /// the customer signs in again rather than inheriting corrupt state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] when the document exists but cannot be
    /// read.
    pub async fn open(path: PathBuf) -> Result<Self, SessionError> {
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Session>(&bytes) {
                Ok(session) => SessionState::Authenticated(session),
                Err(error) => {
                    warn!(%error, "discarding undecodable session document");
                    SessionState::Anonymous
                }
            },
            Err(error) if error.kind() == ErrorKind::NotFound => SessionState::Anonymous,
            Err(error) => return Err(error.into()),
        };

        Ok(Self::new(state, Some(path)))
    }

    fn new(state: SessionState, path: Option<PathBuf>) -> Self {
        let (sender, _) = watch::channel(state);

        Self {
            inner: Arc::new(ManagerInner {
                state: sender,
                path,
            }),
        }
    }

    /// Install an authenticated session, persisting it before it becomes
    /// visible to observers.
    ///
    /// # Errors
    ///
    /// Returns an error when the session document cannot be written; the
    /// current state is left unchanged then.
    pub async fn sign_in(&self, session: Session) -> Result<(), SessionError> {
        if let Some(path) = &self.inner.path {
            let payload = serde_json::to_vec(&session)?;
            tokio::fs::write(path, payload).await?;
        }

        info!(customer = %session.customer, email = %session.email, "signed in");
        self.inner
            .state
            .send_replace(SessionState::Authenticated(session));

        Ok(())
    }

    /// Drop the current session, removing the persisted document. Signing
    /// out while anonymous is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when removing the session document fails.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        if let Some(path) = &self.inner.path
            && let Err(error) = tokio::fs::remove_file(path).await
            && error.kind() != ErrorKind::NotFound
        {
            return Err(error.into());
        }

        if self.current().is_authenticated() {
            info!("signed out");
        }
        self.inner.state.send_replace(SessionState::Anonymous);

        Ok(())
    }

    /// The current session state.
    #[must_use]
    pub fn current(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to session-state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }
}
