//! Domain layer: entities, forms, the backend contract and tree layout
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod api;
pub mod entities;
pub mod error;
pub mod forms;
pub mod layout;
pub mod tree;

pub use api::{ApiReply, ApiRequest, Method, Registered};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use forms::{
    Credentials, EmailToken, LinkForm, LoginForm, MechanicForm, RegisterForm, Registration,
    VerifyForm,
};
pub use layout::{layout_tree, Point, Spacing, TreeLayout};
pub use tree::{ChildTarget, TreeChild, TreeNode};
