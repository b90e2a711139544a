pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod lab;
pub mod repository;
pub mod router;
pub mod service;

pub use db::ConnectionProvider;
pub use error::LabError;
pub use repository::{SecureUserRepository, VulnerableUserRepository};
pub use service::{SecureUserService, UserService, VulnerableUserService};
