//! Store service
//!
//! Owns the client state and runs the effects produced by `reduce` against the
//! backend and the session store.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::state::{reduce, AppState, Effect, Event};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    ApiReply, Link, LinkForm, LoginForm, Mechanic, MechanicForm, MechanicId, RegisterForm,
    Registered, Session, TreeNode, User, VerifyForm,
};
use crate::infrastructure::traits::{ApiError, Backend, SessionStore};

/// Service that drives `AppState` through user intents.
pub struct StoreService {
    state: AppState,
    backend: Arc<dyn Backend>,
    sessions: Arc<dyn SessionStore>,
    /// Backend failure of the last dispatch, if any.
    last_failure: Option<ApiError>,
}

impl StoreService {
    /// Create a store and restore a persisted session if one exists.
    ///
    /// An unreadable session file is logged and treated as logged out.
    pub fn new(backend: Arc<dyn Backend>, sessions: Arc<dyn SessionStore>) -> Self {
        let mut store = Self {
            state: AppState::default(),
            backend,
            sessions,
            last_failure: None,
        };
        match store.sessions.load() {
            Ok(Some(session)) => {
                debug!("restored session for {}", session.user.email);
                store.state = reduce(store.state.clone(), Event::RestoreSession(session)).state;
            }
            Ok(None) => debug!("no stored session"),
            Err(e) => warn!("ignoring unreadable session: {}", e),
        }
        store
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply `event` and run effects until none remain.
    ///
    /// Returns the replies received while doing so. Backend failures are not
    /// errors here: they land in `state().error`. Only session storage failures
    /// propagate.
    #[instrument(level = "debug", skip(self, event))]
    pub fn dispatch(&mut self, event: Event) -> ApplicationResult<Vec<ApiReply>> {
        let mut pending = vec![event];
        let mut replies = Vec::new();
        self.last_failure = None;

        while let Some(event) = pending.pop() {
            let transition = reduce(std::mem::take(&mut self.state), event);
            self.state = transition.state;

            for effect in transition.effects {
                match effect {
                    Effect::Send(request) => {
                        if request.is_mutation() {
                            info!("{} -> {}", request.name(), request.path());
                        }
                        match self.backend.execute(&request, self.state.token()) {
                            Ok(reply) => {
                                replies.push(reply.clone());
                                pending.push(Event::Resolved(reply));
                            }
                            Err(e) => {
                                warn!("{} failed: {}", request.name(), e);
                                pending.push(Event::Failed {
                                    request,
                                    message: e.to_string(),
                                });
                                self.last_failure = Some(e);
                            }
                        }
                    }
                    Effect::PersistSession(session) => {
                        self.sessions.save(&session).map_err(|source| {
                            ApplicationError::Session {
                                context: "save session".into(),
                                source,
                            }
                        })?;
                    }
                    Effect::ClearSession => {
                        self.sessions
                            .clear()
                            .map_err(|source| ApplicationError::Session {
                                context: "clear session".into(),
                                source,
                            })?;
                    }
                }
            }
        }
        Ok(replies)
    }

    /// Dispatch `event` and pick the reply the caller cares about.
    fn run<T>(
        &mut self,
        event: Event,
        pick: impl Fn(ApiReply) -> Option<T>,
    ) -> ApplicationResult<T> {
        let replies = self.dispatch(event)?;
        replies
            .into_iter()
            .find_map(pick)
            .ok_or_else(|| self.failure())
    }

    fn failure(&self) -> ApplicationError {
        ApplicationError::ActionFailed {
            message: self
                .state
                .error
                .clone()
                .unwrap_or_else(|| "request produced no result".into()),
            cause: self.last_failure.clone(),
        }
    }

    pub fn fetch_mechanics(&mut self) -> ApplicationResult<&[Mechanic]> {
        self.run(Event::FetchMechanics, |r| match r {
            ApiReply::Mechanics(_) => Some(()),
            _ => None,
        })?;
        Ok(self.state.mechanics.as_slice())
    }

    pub fn fetch_links(&mut self) -> ApplicationResult<&[Link]> {
        self.run(Event::FetchLinks, |r| match r {
            ApiReply::Links(_) => Some(()),
            _ => None,
        })?;
        Ok(self.state.links.as_slice())
    }

    pub fn fetch_tree(&mut self, id: MechanicId) -> ApplicationResult<TreeNode> {
        self.run(Event::FetchTree(id), |r| match r {
            ApiReply::Tree(tree) => Some(tree),
            _ => None,
        })
    }

    pub fn create_mechanic(&mut self, form: MechanicForm) -> ApplicationResult<Mechanic> {
        self.run(Event::SubmitMechanic(form), |r| match r {
            ApiReply::MechanicCreated(m) => Some(m),
            _ => None,
        })
    }

    pub fn create_link(&mut self, form: LinkForm) -> ApplicationResult<Link> {
        self.run(Event::SubmitLink(form), |r| match r {
            ApiReply::LinkCreated(l) => Some(l),
            _ => None,
        })
    }

    pub fn login(&mut self, form: LoginForm) -> ApplicationResult<Session> {
        self.run(Event::Login(form), |r| match r {
            ApiReply::LoggedIn(s) => Some(s),
            _ => None,
        })
    }

    pub fn register(&mut self, form: RegisterForm) -> ApplicationResult<Registered> {
        self.run(Event::Register(form), |r| match r {
            ApiReply::Registered(reg) => Some(reg),
            _ => None,
        })
    }

    pub fn verify_email(&mut self, form: VerifyForm) -> ApplicationResult<User> {
        self.run(Event::VerifyEmail(form), |r| match r {
            ApiReply::Verified(u) => Some(u),
            _ => None,
        })
    }

    pub fn logout(&mut self) -> ApplicationResult<()> {
        self.dispatch(Event::Logout)?;
        Ok(())
    }

    pub fn select(&mut self, id: Option<MechanicId>) -> ApplicationResult<()> {
        self.dispatch(Event::Select(id))?;
        Ok(())
    }

    /// Current session, or `NotAuthenticated` when logged out.
    pub fn require_session(&self) -> ApplicationResult<&Session> {
        self.state
            .session
            .as_ref()
            .ok_or(ApplicationError::NotAuthenticated)
    }
}
