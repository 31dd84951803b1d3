use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct SignUpModel {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
}

#[derive(Deserialize, Validate)]
pub struct SignInModel {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct RefreshTokenModel {
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    pub refresh: String,
}

#[derive(Deserialize, Validate)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub struct InsertUser {
    pub email: String,
    pub hash_password: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct SignUpResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserResponse,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserSearchResult {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}
