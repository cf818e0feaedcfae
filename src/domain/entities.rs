//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Backend-assigned identifier of a mechanic.
pub type MechanicId = i64;

/// Backend-assigned identifier of a link.
pub type LinkId = i64;

/// A game mechanic as cached from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mechanic {
    pub id: MechanicId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl Mechanic {
    /// Description or empty string when the backend sent none.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Mechanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} ({})", self.name, year),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Payload for `POST /mechanics/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMechanic {
    pub name: String,
    pub description: Option<String>,
    pub year: Option<i32>,
}

/// Relationship carried by a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    #[default]
    EvolvesTo,
    Extends,
    Replaces,
    CombinesWith,
}

impl LinkKind {
    pub const ALL: [LinkKind; 4] = [
        LinkKind::EvolvesTo,
        LinkKind::Extends,
        LinkKind::Replaces,
        LinkKind::CombinesWith,
    ];

    /// Wire name, e.g. `evolves_to`.
    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::EvolvesTo => "evolves_to",
            LinkKind::Extends => "extends",
            LinkKind::Replaces => "replaces",
            LinkKind::CombinesWith => "combines_with",
        }
    }

    /// Human label used on rendered edges.
    pub fn label(self) -> &'static str {
        match self {
            LinkKind::EvolvesTo => "evolves to",
            LinkKind::Extends => "extends",
            LinkKind::Replaces => "replaces",
            LinkKind::CombinesWith => "combines with",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        LinkKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownLinkKind(s.to_string()))
    }
}

/// Directed, typed edge between two mechanics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub from_id: MechanicId,
    pub to_id: MechanicId,
    #[serde(rename = "type")]
    pub kind: LinkKind,
}

/// Payload for `POST /mechanics/links`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLink {
    pub from_id: MechanicId,
    pub to_id: MechanicId,
    #[serde(rename = "type")]
    pub kind: LinkKind,
}

/// Authenticated user record as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub is_verified: bool,
}

/// Bearer token plus the user it belongs to. Persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_wire_names_when_parsing_link_kind_then_roundtrips() {
        for kind in LinkKind::ALL {
            assert_eq!(kind.as_str().parse::<LinkKind>().unwrap(), kind);
        }
    }

    #[test]
    fn given_human_spelling_when_parsing_link_kind_then_normalizes() {
        assert_eq!(
            "Combines With".parse::<LinkKind>().unwrap(),
            LinkKind::CombinesWith
        );
        assert_eq!("evolves-to".parse::<LinkKind>().unwrap(), LinkKind::EvolvesTo);
    }

    #[test]
    fn given_unknown_kind_when_parsing_then_errors() {
        let err = "inherits".parse::<LinkKind>().unwrap_err();
        assert_eq!(err, DomainError::UnknownLinkKind("inherits".into()));
    }

    #[test]
    fn given_link_json_when_deserializing_then_reads_type_field() {
        let link: Link =
            serde_json::from_str(r#"{"id":3,"from_id":1,"to_id":2,"type":"replaces"}"#).unwrap();
        assert_eq!(link.kind, LinkKind::Replaces);
    }

    #[test]
    fn given_mechanic_with_nulls_when_deserializing_then_fields_are_none() {
        let m: Mechanic =
            serde_json::from_str(r#"{"id":1,"name":"Jump","description":null,"year":null}"#)
                .unwrap();
        assert_eq!(m.description, None);
        assert_eq!(m.year, None);
        assert_eq!(m.to_string(), "Jump");
    }
}
