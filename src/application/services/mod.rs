//! Application services
//!
//! Concrete services that orchestrate domain logic. They depend on I/O boundary
//! traits (Backend, SessionStore) but are themselves concrete structs.

mod store;

pub use store::StoreService;
