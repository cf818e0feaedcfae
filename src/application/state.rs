//! Client state and its transition function.
//!
//! `reduce` is pure: it takes the current state and one event and returns the
//! next state plus the effects (backend calls, session writes) to run. The
//! `StoreService` interprets effects and feeds their results back as events.

use tracing::debug;

use crate::domain::{
    ApiReply, ApiRequest, DomainError, Link, LinkForm, LoginForm, Mechanic, MechanicForm,
    MechanicId, RegisterForm, Session, TreeNode, VerifyForm,
};

/// Everything the client knows. Cached copies only; the backend owns the data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub mechanics: Vec<Mechanic>,
    pub links: Vec<Link>,
    pub selected: Option<MechanicId>,
    pub tree: Option<TreeNode>,
    pub session: Option<Session>,
    pub is_loading: bool,
    /// Last failure, human readable.
    pub error: Option<String>,
    /// Last informational message (registration, verification).
    pub notice: Option<String>,
}

impl AppState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.access_token.as_str())
    }

    pub fn mechanic(&self, id: MechanicId) -> Option<&Mechanic> {
        self.mechanics.iter().find(|m| m.id == id)
    }

    pub fn selected_mechanic(&self) -> Option<&Mechanic> {
        self.selected.and_then(|id| self.mechanic(id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    FetchMechanics,
    FetchLinks,
    FetchTree(MechanicId),
    Select(Option<MechanicId>),
    SubmitMechanic(MechanicForm),
    SubmitLink(LinkForm),
    Login(LoginForm),
    Register(RegisterForm),
    VerifyEmail(VerifyForm),
    Logout,
    RestoreSession(Session),
    /// A request completed successfully.
    Resolved(ApiReply),
    /// A request failed; `message` is the cause.
    Failed {
        request: ApiRequest,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Send(ApiRequest),
    PersistSession(Session),
    ClearSession,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: AppState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn idle(state: AppState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn send(mut state: AppState, request: ApiRequest) -> Self {
        state.is_loading = true;
        Self {
            state,
            effects: vec![Effect::Send(request)],
        }
    }

    fn rejected(mut state: AppState, err: DomainError) -> Self {
        debug!("validation failed: {}", err);
        state.error = Some(err.to_string());
        Self::idle(state)
    }
}

/// Apply `event` to `state`.
pub fn reduce(mut state: AppState, event: Event) -> Transition {
    if is_user_intent(&event) {
        state.error = None;
        state.notice = None;
    }

    match event {
        Event::FetchMechanics => Transition::send(state, ApiRequest::ListMechanics),
        Event::FetchLinks => Transition::send(state, ApiRequest::ListLinks),
        Event::FetchTree(id) => Transition::send(state, ApiRequest::FetchTree(id)),
        Event::Select(id) => {
            state.selected = id;
            Transition::idle(state)
        }
        Event::SubmitMechanic(form) => match form.validate() {
            Ok(payload) => Transition::send(state, ApiRequest::CreateMechanic(payload)),
            Err(e) => Transition::rejected(state, e),
        },
        Event::SubmitLink(mut form) => {
            form.source = form.source.or(state.selected);
            match form.validate() {
                Ok(payload) => Transition::send(state, ApiRequest::CreateLink(payload)),
                Err(e) => Transition::rejected(state, e),
            }
        }
        Event::Login(form) => match form.validate() {
            Ok(creds) => Transition::send(state, ApiRequest::Login(creds)),
            Err(e) => Transition::rejected(state, e),
        },
        Event::Register(form) => match form.validate() {
            Ok(reg) => Transition::send(state, ApiRequest::Register(reg)),
            Err(e) => Transition::rejected(state, e),
        },
        Event::VerifyEmail(form) => match form.validate() {
            Ok(token) => Transition::send(state, ApiRequest::VerifyEmail(token)),
            Err(e) => Transition::rejected(state, e),
        },
        Event::Logout => {
            state.session = None;
            Transition {
                state,
                effects: vec![Effect::ClearSession],
            }
        }
        Event::RestoreSession(session) => {
            state.session = Some(session);
            Transition::idle(state)
        }
        Event::Resolved(reply) => resolve(state, reply),
        Event::Failed { request, message } => {
            state.is_loading = false;
            state.error = Some(format!("{}: {}", request.failure_message(), message));
            Transition::idle(state)
        }
    }
}

fn is_user_intent(event: &Event) -> bool {
    !matches!(
        event,
        Event::Resolved(_) | Event::Failed { .. } | Event::RestoreSession(_)
    )
}

fn resolve(mut state: AppState, reply: ApiReply) -> Transition {
    state.is_loading = false;
    let mut effects = Vec::new();
    match reply {
        ApiReply::Mechanics(mechanics) => state.mechanics = mechanics,
        ApiReply::Links(links) => state.links = links,
        ApiReply::Tree(tree) => state.tree = Some(tree),
        ApiReply::MechanicCreated(mechanic) => state.mechanics.push(mechanic),
        ApiReply::LinkCreated(link) => state.links.push(link),
        ApiReply::LoggedIn(session) => {
            effects.push(Effect::PersistSession(session.clone()));
            state.session = Some(session);
        }
        ApiReply::Registered(registered) => {
            state.notice = Some(format!(
                "{} Check {} for the verification link.",
                registered.message, registered.email
            ));
        }
        ApiReply::Verified(user) => {
            state.notice = Some(format!(
                "Email {} verified. You can now log in.",
                user.email
            ));
        }
    }
    Transition { state, effects }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LinkKind, NewLink, User};

    fn mech(id: MechanicId, name: &str) -> Mechanic {
        Mechanic {
            id,
            name: name.into(),
            description: None,
            year: Some(1990),
        }
    }

    fn session() -> Session {
        Session {
            access_token: "tok".into(),
            user: User {
                id: 1,
                email: "a@b.co".into(),
                username: "ab".into(),
                is_verified: true,
            },
        }
    }

    #[test]
    fn given_fetch_when_reducing_then_sets_loading_and_sends() {
        let t = reduce(AppState::default(), Event::FetchMechanics);
        assert!(t.state.is_loading);
        assert_eq!(t.effects, vec![Effect::Send(ApiRequest::ListMechanics)]);
    }

    #[test]
    fn given_mechanics_reply_when_resolving_then_replaces_list() {
        let state = reduce(AppState::default(), Event::FetchMechanics).state;
        let t = reduce(
            state,
            Event::Resolved(ApiReply::Mechanics(vec![mech(1, "Jump")])),
        );
        assert!(!t.state.is_loading);
        assert_eq!(t.state.mechanics.len(), 1);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn given_link_without_source_when_selection_exists_then_uses_selection() {
        let state = reduce(AppState::default(), Event::Select(Some(7))).state;
        let t = reduce(
            state,
            Event::SubmitLink(LinkForm::new(None, Some(9), LinkKind::Replaces)),
        );
        assert_eq!(
            t.effects,
            vec![Effect::Send(ApiRequest::CreateLink(NewLink {
                from_id: 7,
                to_id: 9,
                kind: LinkKind::Replaces,
            }))]
        );
    }

    #[test]
    fn given_link_without_target_when_submitting_then_no_effects() {
        let mut state = AppState::default();
        state.links.push(Link {
            id: 1,
            from_id: 1,
            to_id: 2,
            kind: LinkKind::EvolvesTo,
        });
        let before = state.links.clone();
        let t = reduce(
            state,
            Event::SubmitLink(LinkForm::new(Some(1), None, LinkKind::EvolvesTo)),
        );
        assert!(t.effects.is_empty());
        assert!(!t.state.is_loading);
        assert_eq!(t.state.links, before);
    }

    #[test]
    fn given_failure_when_reducing_then_keeps_data_and_records_message() {
        let mut state = AppState::default();
        state.mechanics.push(mech(1, "Jump"));
        let t = reduce(
            state,
            Event::Failed {
                request: ApiRequest::ListMechanics,
                message: "network error: refused".into(),
            },
        );
        assert_eq!(t.state.mechanics.len(), 1);
        assert_eq!(
            t.state.error.as_deref(),
            Some("Failed to load mechanics: network error: refused")
        );
    }

    #[test]
    fn given_previous_error_when_new_intent_then_error_cleared() {
        let state = AppState {
            error: Some("old".into()),
            ..AppState::default()
        };
        let t = reduce(state, Event::FetchLinks);
        assert_eq!(t.state.error, None);
    }

    #[test]
    fn given_login_reply_when_resolving_then_persists_session() {
        let t = reduce(
            AppState::default(),
            Event::Resolved(ApiReply::LoggedIn(session())),
        );
        assert!(t.state.is_authenticated());
        assert_eq!(t.effects, vec![Effect::PersistSession(session())]);
    }

    #[test]
    fn given_session_when_logging_out_then_clears_and_emits_effect() {
        let state = reduce(AppState::default(), Event::RestoreSession(session())).state;
        assert_eq!(state.token(), Some("tok"));
        let t = reduce(state, Event::Logout);
        assert!(!t.state.is_authenticated());
        assert_eq!(t.effects, vec![Effect::ClearSession]);
    }

    #[test]
    fn given_selection_when_looking_up_then_returns_cached_mechanic() {
        let mut state = AppState::default();
        state.mechanics.push(mech(3, "Dash"));
        let state = reduce(state, Event::Select(Some(3))).state;
        assert_eq!(state.selected_mechanic().map(|m| m.name.as_str()), Some("Dash"));
    }
}
