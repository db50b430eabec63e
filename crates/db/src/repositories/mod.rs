//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod analytics_repo;
pub mod contact_repo;
pub mod internship_repo;
pub mod project_repo;
pub mod service_request_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepo;
pub use contact_repo::ContactRepo;
pub use internship_repo::InternshipRepo;
pub use project_repo::ProjectRepo;
pub use service_request_repo::ServiceRequestRepo;
pub use user_repo::UserRepo;
