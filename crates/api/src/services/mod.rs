//! Application services composed by the route handlers.

pub mod auth;

pub use auth::{AuthError, AuthService, LoginResult, RegisterInput};
