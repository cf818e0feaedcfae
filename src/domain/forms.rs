//! Structured form records with their validation rules.
//!
//! Each form validates into the payload the backend expects. Validation runs
//! before anything is sent.

use std::sync::OnceLock;

use chrono::Datelike;
use regex::Regex;
use serde::Serialize;

use crate::domain::{DomainError, DomainResult, LinkKind, MechanicId, NewLink, NewMechanic};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 255;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Current calendar year, the default for new mechanics.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Create-mechanic form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MechanicForm {
    pub name: String,
    pub description: String,
    pub year: Option<i32>,
}

impl Default for MechanicForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            year: Some(current_year()),
        }
    }
}

impl MechanicForm {
    pub fn new(name: impl Into<String>, description: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            year,
        }
    }

    /// Name is required. The description is sent trimmed, empty when blank.
    pub fn validate(&self) -> DomainResult<NewMechanic> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::EmptyName);
        }
        Ok(NewMechanic {
            name: name.to_string(),
            description: Some(self.description.trim().to_string()),
            year: self.year,
        })
    }
}

/// Create-link form. The source usually comes from the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkForm {
    pub source: Option<MechanicId>,
    pub target: Option<MechanicId>,
    pub kind: LinkKind,
}

impl LinkForm {
    pub fn new(source: Option<MechanicId>, target: Option<MechanicId>, kind: LinkKind) -> Self {
        Self {
            source,
            target,
            kind,
        }
    }

    pub fn validate(&self) -> DomainResult<NewLink> {
        let from_id = self.source.ok_or(DomainError::MissingSource)?;
        let to_id = self.target.ok_or(DomainError::MissingTarget)?;
        if from_id == to_id {
            return Err(DomainError::SelfLink(from_id));
        }
        Ok(NewLink {
            from_id,
            to_id,
            kind: self.kind,
        })
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/verify-email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailToken {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> DomainResult<Credentials> {
        let email = validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(DomainError::EmptyField { field: "password" });
        }
        Ok(Credentials {
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> DomainResult<Registration> {
        let username = self.username.trim();
        let len = username.chars().count();
        if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
            return Err(DomainError::UsernameLength);
        }
        let email = validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(Registration {
            username: username.to_string(),
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerifyForm {
    pub token: String,
}

impl VerifyForm {
    pub fn validate(&self) -> DomainResult<EmailToken> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(DomainError::EmptyField { field: "token" });
        }
        Ok(EmailToken {
            token: token.to_string(),
        })
    }
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
}

fn validate_email(raw: &str) -> DomainResult<String> {
    let email = raw.trim();
    let valid = match email_regex() {
        Some(re) => re.is_match(email),
        None => email.matches('@').count() == 1,
    };
    if valid {
        Ok(email.to_string())
    } else {
        Err(DomainError::InvalidEmail(email.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_blank_name_when_validating_mechanic_then_rejects() {
        let form = MechanicForm::new("   ", "desc", Some(1990));
        assert_eq!(form.validate().unwrap_err(), DomainError::EmptyName);
    }

    #[test]
    fn given_blank_description_when_validating_mechanic_then_sends_empty_string() {
        let form = MechanicForm::new(" Double Jump ", "  ", Some(1985));
        let payload = form.validate().unwrap();
        assert_eq!(payload.name, "Double Jump");
        assert_eq!(payload.description.as_deref(), Some(""));
        assert_eq!(payload.year, Some(1985));
    }

    #[test]
    fn given_default_form_when_created_then_year_is_current() {
        assert_eq!(MechanicForm::default().year, Some(current_year()));
    }

    #[rstest]
    #[case(None, Some(2), DomainError::MissingSource)]
    #[case(Some(1), None, DomainError::MissingTarget)]
    #[case(Some(4), Some(4), DomainError::SelfLink(4))]
    fn given_incomplete_link_form_when_validating_then_rejects(
        #[case] source: Option<MechanicId>,
        #[case] target: Option<MechanicId>,
        #[case] expected: DomainError,
    ) {
        let form = LinkForm::new(source, target, LinkKind::Extends);
        assert_eq!(form.validate().unwrap_err(), expected);
    }

    #[rstest]
    #[case("a@b.co", true)]
    #[case("  player@example.org ", true)]
    #[case("no-at-sign", false)]
    #[case("two@@example.org", false)]
    #[case("a@b", false)]
    fn given_email_when_validating_login_then_checks_shape(#[case] email: &str, #[case] ok: bool) {
        let form = LoginForm {
            email: email.into(),
            password: "secret".into(),
        };
        assert_eq!(form.validate().is_ok(), ok);
    }

    #[test]
    fn given_short_password_when_registering_then_rejects() {
        let form = RegisterForm {
            username: "mario".into(),
            email: "mario@example.org".into(),
            password: "12345".into(),
        };
        assert_eq!(
            form.validate().unwrap_err(),
            DomainError::PasswordTooShort { min: 6 }
        );
    }

    #[test]
    fn given_short_username_when_registering_then_rejects() {
        let form = RegisterForm {
            username: "mo".into(),
            email: "mo@example.org".into(),
            password: "123456".into(),
        };
        assert_eq!(form.validate().unwrap_err(), DomainError::UsernameLength);
    }

    #[test]
    fn given_blank_token_when_verifying_then_rejects() {
        let form = VerifyForm { token: " ".into() };
        assert_eq!(
            form.validate().unwrap_err(),
            DomainError::EmptyField { field: "token" }
        );
    }
}
