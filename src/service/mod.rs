//! Service facades over the two repositories.
//!
//! [`UserService`] is the operation set both facades expose. Callers pick an
//! implementation; nothing dispatches between them at runtime.

pub mod secure;
pub mod vulnerable;

pub use secure::SecureUserService;
pub use vulnerable::VulnerableUserService;

use crate::error::LabError;
use std::future::Future;

pub trait UserService: Clone + Send + Sync + 'static {
    /// Usernames matching `id`, comma-joined; `None` when nothing matched.
    fn get_user_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<String>, LabError>> + Send;

    /// Insert a user and return the engine-assigned id.
    fn create_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> impl Future<Output = Result<i64, LabError>> + Send;

    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<bool, LabError>> + Send;

    /// Email(s) of the user stored under `user_id`.
    fn get_user_profile(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<String>, LabError>> + Send;

    fn check_user_exists(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<bool, LabError>> + Send;

    /// Email for `user_id`, or `"User not found"`.
    fn get_user_email(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<String, LabError>> + Send;

    /// Comma-joined matches, or `"No users found"`.
    fn search_user_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<String, LabError>> + Send;

    fn get_user_password(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<String>, LabError>> + Send;
}
