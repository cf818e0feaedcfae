//! Service container for dependency injection
//!
//! Wires the store service to the HTTP backend and the session file.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::application::services::StoreService;
use crate::application::ApplicationError;
use crate::config::Settings;
use crate::infrastructure::http::HttpBackend;
use crate::infrastructure::session::FileSessionStore;
use crate::infrastructure::traits::{Backend, SessionStore};
use crate::infrastructure::InfraResult;

/// Container holding the settings and the I/O implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// REST backend
    pub backend: Arc<dyn Backend>,

    /// Persisted login session
    pub sessions: Arc<dyn SessionStore>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        debug!(
            "wiring backend {} (timeout {}s), session {}",
            settings.api_url,
            settings.timeout_secs,
            settings.session_file.display()
        );
        let backend = HttpBackend::new(
            settings.api_url.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
        .map_err(ApplicationError::from)?;
        let sessions = Arc::new(FileSessionStore::new(settings.session_file.clone()));
        Ok(Self::with_deps(settings, Arc::new(backend), sessions))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        backend: Arc<dyn Backend>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            backend,
            sessions,
        }
    }

    /// A store over this container's backend, with the persisted session restored.
    pub fn store(&self) -> StoreService {
        StoreService::new(Arc::clone(&self.backend), Arc::clone(&self.sessions))
    }
}
