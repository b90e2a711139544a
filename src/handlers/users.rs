//! `/api/users` handlers, generic over the facade so the vulnerable and
//! secure trees share one set of routes.

use crate::error::LabError;
use crate::repository::USER_NOT_FOUND;
use crate::service::UserService;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub username: String,
}

pub fn user_routes<S: UserService>() -> Router<S> {
    Router::new()
        .route("/", post(create_user::<S>))
        .route("/login", post(login::<S>))
        .route("/search", get(search_users::<S>))
        .route("/profile/{user_id}", get(user_profile::<S>))
        .route("/exists/{username}", get(user_exists::<S>))
        .route("/email/{user_id}", get(user_email::<S>))
        .route("/password/{user_id}", get(user_password::<S>))
        .route("/{id}", get(get_user::<S>))
}

/// GET /{id}
pub async fn get_user<S: UserService>(
    State(service): State<S>,
    Path(id): Path<String>,
) -> Result<String, LabError> {
    let users = service.get_user_by_id(&id).await?;
    Ok(users.unwrap_or_else(|| USER_NOT_FOUND.to_string()))
}

/// POST / (form: username, password, email)
pub async fn create_user<S: UserService>(
    State(service): State<S>,
    Form(form): Form<CreateUserForm>,
) -> Result<String, LabError> {
    let id = service
        .create_user(&form.username, &form.password, &form.email)
        .await?;
    Ok(format!("User created with ID: {id}"))
}

/// POST /login (form: username, password)
pub async fn login<S: UserService>(
    State(service): State<S>,
    Form(form): Form<LoginForm>,
) -> Result<String, LabError> {
    let ok = service.authenticate(&form.username, &form.password).await?;
    Ok(if ok { "Login successful" } else { "Login failed" }.to_string())
}

/// GET /profile/{user_id}
pub async fn user_profile<S: UserService>(
    State(service): State<S>,
    Path(user_id): Path<String>,
) -> Result<String, LabError> {
    let profile = service.get_user_profile(&user_id).await?;
    Ok(profile.unwrap_or_else(|| USER_NOT_FOUND.to_string()))
}

/// GET /exists/{username}
pub async fn user_exists<S: UserService>(
    State(service): State<S>,
    Path(username): Path<String>,
) -> Result<String, LabError> {
    let exists = service.check_user_exists(&username).await?;
    Ok(if exists { "User exists" } else { USER_NOT_FOUND }.to_string())
}

/// GET /email/{user_id}
pub async fn user_email<S: UserService>(
    State(service): State<S>,
    Path(user_id): Path<String>,
) -> Result<String, LabError> {
    service.get_user_email(&user_id).await
}

/// GET /search?username=
pub async fn search_users<S: UserService>(
    State(service): State<S>,
    Query(query): Query<SearchQuery>,
) -> Result<String, LabError> {
    service.search_user_by_name(&query.username).await
}

/// GET /password/{user_id}
pub async fn user_password<S: UserService>(
    State(service): State<S>,
    Path(user_id): Path<String>,
) -> Result<String, LabError> {
    let password = service.get_user_password(&user_id).await?;
    Ok(password.unwrap_or_else(|| USER_NOT_FOUND.to_string()))
}
