//! Middleware for the EkoTregu marketplace backend

pub mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
