//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Login resolves an account across employees and clients, verifies the
//! bcrypt hash and issues an HS256 token. The same service turns a bearer
//! token back into a [`domain::Principal`].

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthConfig, AuthService};
