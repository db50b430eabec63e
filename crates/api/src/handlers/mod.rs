//! Request handlers, one submodule per resource.
//!
//! Handlers validate input, delegate to the repositories in `protolab_db`
//! and map errors via [`AppError`](crate::error::AppError).

pub mod analytics;
pub mod assistant;
pub mod auth;
pub mod contact;
pub mod internship;
pub mod project;
pub mod service_request;
