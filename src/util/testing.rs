//! Test support: logging setup and in-process doubles for the I/O traits.

use std::collections::VecDeque;
use std::env;
use std::io;
use std::sync::{Mutex, MutexGuard, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{ApiReply, ApiRequest, Session};
use crate::infrastructure::traits::{ApiError, Backend, SessionStore};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let noisy_modules = ["hyper", "rustls", "reqwest::connect"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::ENTER)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Backend that answers from a queue of prepared results and records every call.
///
/// An exhausted queue answers with a transport error.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<ApiReply, ApiError>>>,
    calls: Mutex<Vec<(ApiRequest, Option<String>)>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn reply(self, reply: ApiReply) -> Self {
        lock(&self.replies).push_back(Ok(reply));
        self
    }

    /// Queue a failure.
    pub fn fail(self, error: ApiError) -> Self {
        lock(&self.replies).push_back(Err(error));
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.calls).iter().map(|(r, _)| r.clone()).collect()
    }

    /// Bearer tokens sent with each request, in order.
    pub fn tokens(&self) -> Vec<Option<String>> {
        lock(&self.calls).iter().map(|(_, t)| t.clone()).collect()
    }
}

impl Backend for ScriptedBackend {
    fn execute(&self, request: &ApiRequest, token: Option<&str>) -> Result<ApiReply, ApiError> {
        lock(&self.calls).push((request.clone(), token.map(str::to_string)));
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted reply".into())))
    }
}

/// Session store kept in memory.
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    pub fn current(&self) -> Option<Session> {
        lock(&self.session).clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> io::Result<Option<Session>> {
        Ok(lock(&self.session).clone())
    }

    fn save(&self, session: &Session) -> io::Result<()> {
        *lock(&self.session) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *lock(&self.session) = None;
        Ok(())
    }
}
