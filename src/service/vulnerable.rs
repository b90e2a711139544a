use crate::db::ConnectionProvider;
use crate::error::LabError;
use crate::repository::VulnerableUserRepository;
use crate::service::UserService;

/// Pass-through over [`VulnerableUserRepository`].
#[derive(Debug, Clone)]
pub struct VulnerableUserService {
    repository: VulnerableUserRepository,
}

impl VulnerableUserService {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self {
            repository: VulnerableUserRepository::new(provider),
        }
    }
}

impl UserService for VulnerableUserService {
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

    /// The id is parsed here, so the only injectable input left is the
    /// username stored earlier.
    async fn get_user_profile(&self, user_id: &str) -> Result<Option<String>, LabError> {
        let user_id: i64 = user_id.parse()?;
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
