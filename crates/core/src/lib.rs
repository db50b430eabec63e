//! Domain rules for the Protolab backend.
//!
//! This crate has no I/O. It holds the status vocabularies, validation
//! helpers, lifecycle records, attachment rules and pagination math shared
//! by the database and HTTP layers.

pub mod analytics;
pub mod attachment;
pub mod contact;
pub mod error;
pub mod internship;
pub mod lifecycle;
pub mod pagination;
pub mod project;
pub mod roles;
pub mod service_request;
pub mod types;
pub mod validation;
