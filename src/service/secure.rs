use crate::db::ConnectionProvider;
use crate::error::LabError;
use crate::repository::SecureUserRepository;
use crate::service::UserService;

/// Pass-through over [`SecureUserRepository`]. The profile id is handed over
/// as text; the repository's binder decides whether it is an integer.
#[derive(Debug, Clone)]
pub struct SecureUserService {
    repository: SecureUserRepository,
}

impl SecureUserService {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self {
            repository: SecureUserRepository::new(provider),
        }
    }
}

impl UserService for SecureUserService {
    async fn get_user_by_id(&self, id: &str) -> Result<Option<String>, LabError> {
        self.repository.get_user_by_id(id).await
    }

    async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<i64, LabError> {
        self.repository.create_user(username, password, email).await
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<bool, LabError> {
        self.repository.authenticate(username, password).await
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<Option<String>, LabError> {
        self.repository.get_user_profile(user_id).await
    }

    async fn check_user_exists(&self, username: &str) -> Result<bool, LabError> {
        self.repository.check_user_exists(username).await
    }

    async fn get_user_email(&self, user_id: &str) -> Result<String, LabError> {
        self.repository.get_user_email(user_id).await
    }

    async fn search_user_by_name(&self, name: &str) -> Result<String, LabError> {
        self.repository.search_user_by_name(name).await
    }

    async fn get_user_password(&self, user_id: &str) -> Result<Option<String>, LabError> {
        self.repository.get_user_password(user_id).await
    }
}
