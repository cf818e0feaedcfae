//! Backend REST contract: requests the client can issue and the replies they decode to.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{
    Credentials, DomainError, DomainResult, EmailToken, Link, Mechanic, MechanicId, NewLink,
    NewMechanic, Registration, Session, TreeNode, User,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One backend call. Paths are relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    ListMechanics,
    ListLinks,
    FetchTree(MechanicId),
    CreateMechanic(NewMechanic),
    CreateLink(NewLink),
    Login(Credentials),
    Register(Registration),
    VerifyEmail(EmailToken),
}

/// Confirmation returned by `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Registered {
    pub message: String,
    pub email: String,
}

/// Decoded success body, one variant per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiReply {
    Mechanics(Vec<Mechanic>),
    Links(Vec<Link>),
    Tree(TreeNode),
    MechanicCreated(Mechanic),
    LinkCreated(Link),
    LoggedIn(Session),
    Registered(Registered),
    Verified(User),
}

impl ApiRequest {
    pub fn method(&self) -> Method {
        match self {
            ApiRequest::ListMechanics | ApiRequest::ListLinks | ApiRequest::FetchTree(_) => {
                Method::Get
            }
            _ => Method::Post,
        }
    }

    /// True for requests that create something on the backend.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            ApiRequest::CreateMechanic(_) | ApiRequest::CreateLink(_) | ApiRequest::Register(_)
        )
    }

    pub fn path(&self) -> String {
        match self {
            ApiRequest::ListMechanics | ApiRequest::CreateMechanic(_) => "mechanics/".into(),
            ApiRequest::ListLinks | ApiRequest::CreateLink(_) => "mechanics/links".into(),
            ApiRequest::FetchTree(id) => format!("mechanics/{id}/tree"),
            ApiRequest::Login(_) => "auth/login".into(),
            ApiRequest::Register(_) => "auth/register".into(),
            ApiRequest::VerifyEmail(_) => "auth/verify-email".into(),
        }
    }

    /// JSON body for POST requests.
    pub fn body(&self) -> Option<Value> {
        let body = match self {
            ApiRequest::CreateMechanic(m) => serde_json::to_value(m),
            ApiRequest::CreateLink(l) => serde_json::to_value(l),
            ApiRequest::Login(c) => serde_json::to_value(c),
            ApiRequest::Register(r) => serde_json::to_value(r),
            ApiRequest::VerifyEmail(t) => serde_json::to_value(t),
            _ => return None,
        };
        body.ok()
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ApiRequest::ListMechanics => "list_mechanics",
            ApiRequest::ListLinks => "list_links",
            ApiRequest::FetchTree(_) => "fetch_tree",
            ApiRequest::CreateMechanic(_) => "create_mechanic",
            ApiRequest::CreateLink(_) => "create_link",
            ApiRequest::Login(_) => "login",
            ApiRequest::Register(_) => "register",
            ApiRequest::VerifyEmail(_) => "verify_email",
        }
    }

    /// Message shown to the user when the request fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            ApiRequest::ListMechanics => "Failed to load mechanics",
            ApiRequest::ListLinks => "Failed to load links",
            ApiRequest::FetchTree(_) => "Failed to load tree",
            ApiRequest::CreateMechanic(_) => "Failed to create mechanic",
            ApiRequest::CreateLink(_) => "Failed to create link",
            ApiRequest::Login(_) => "Login failed",
            ApiRequest::Register(_) => "Registration failed",
            ApiRequest::VerifyEmail(_) => "Verification failed",
        }
    }

    /// Decode a success body into the reply this request expects.
    pub fn parse_reply(&self, body: Value) -> DomainResult<ApiReply> {
        let reply = match self {
            ApiRequest::ListMechanics => ApiReply::Mechanics(decode(body)?),
            ApiRequest::ListLinks => ApiReply::Links(decode(body)?),
            ApiRequest::FetchTree(_) => ApiReply::Tree(TreeNode::from_value(body)?),
            ApiRequest::CreateMechanic(_) => ApiReply::MechanicCreated(decode(body)?),
            ApiRequest::CreateLink(_) => ApiReply::LinkCreated(decode(body)?),
            ApiRequest::Login(_) => ApiReply::LoggedIn(decode(body)?),
            ApiRequest::Register(_) => ApiReply::Registered(decode(body)?),
            ApiRequest::VerifyEmail(_) => ApiReply::Verified(decode(body)?),
        };
        Ok(reply)
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> DomainResult<T> {
    serde_json::from_value(body).map_err(|e| DomainError::UnexpectedBody(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LinkKind;
    use serde_json::json;

    #[test]
    fn given_create_link_when_building_body_then_uses_wire_field_names() {
        let req = ApiRequest::CreateLink(NewLink {
            from_id: 1,
            to_id: 2,
            kind: LinkKind::CombinesWith,
        });
        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.path(), "mechanics/links");
        assert_eq!(
            req.body().unwrap(),
            json!({"from_id": 1, "to_id": 2, "type": "combines_with"})
        );
    }

    #[test]
    fn given_tree_request_when_building_path_then_embeds_id() {
        let req = ApiRequest::FetchTree(17);
        assert_eq!(req.method(), Method::Get);
        assert_eq!(req.path(), "mechanics/17/tree");
        assert!(req.body().is_none());
    }

    #[test]
    fn given_login_reply_when_parsing_then_ignores_token_type() {
        let req = ApiRequest::Login(Credentials {
            email: "a@b.co".into(),
            password: "x".into(),
        });
        let reply = req
            .parse_reply(json!({
                "access_token": "tok",
                "token_type": "bearer",
                "user": {"id": 1, "email": "a@b.co", "username": "ab", "is_verified": true}
            }))
            .unwrap();
        let ApiReply::LoggedIn(session) = reply else {
            panic!("expected session");
        };
        assert_eq!(session.access_token, "tok");
        assert_eq!(session.user.username, "ab");
    }

    #[test]
    fn given_wrong_shape_when_parsing_then_reports_unexpected_body() {
        let err = ApiRequest::ListLinks
            .parse_reply(json!({"detail": "nope"}))
            .unwrap_err();
        assert!(matches!(err, DomainError::UnexpectedBody(_)));
    }
}
