use uuid::Uuid;

use crate::{
    api::error,
    modules::user::model::{InsertUser, UserSearchResult},
    modules::user::schema::{ProfileEntity, UserEntity},
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;

    async fn find_by_email(&self, email: &str)
    -> Result<Option<UserEntity>, error::SystemError>;

    async fn find_profile(&self, id: &Uuid)
    -> Result<Option<ProfileEntity>, error::SystemError>;

    /// Cheap existence guard used by the friend-request preconditions.
    async fn profile_exists(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    /// Creates the account row and its profile in one transaction.
    async fn create(&self, user: &InsertUser) -> Result<Uuid, error::SystemError>;

    /// Search profiles by exact email (case-insensitive) or partial name,
    /// excluding the searching user.
    async fn search(
        &self,
        query: &str,
        exclude: &Uuid,
    ) -> Result<Vec<UserSearchResult>, error::SystemError>;
}
