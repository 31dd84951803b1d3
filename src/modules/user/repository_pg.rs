use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, UserSearchResult},
        repository::UserRepository,
        schema::{ProfileEntity, UserEntity},
    },
};

#[derive(Clone)]
pub struct UserRepositoryPg {
    pool: sqlx::PgPool,
}

impl UserRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(
            "SELECT * FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_profile(
        &self,
        id: &Uuid,
    ) -> Result<Option<ProfileEntity>, error::SystemError> {
        let profile =
            sqlx::query_as::<_, ProfileEntity>("SELECT * FROM profiles WHERE user_id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    async fn profile_exists(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM profiles WHERE user_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn create(&self, user: &InsertUser) -> Result<Uuid, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));

        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO users (id, email, hash_password) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&user.email)
            .bind(&user.hash_password)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO profiles (user_id, name) VALUES ($1, $2)")
            .bind(id)
            .bind(&user.name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(id)
    }

    async fn search(
        &self,
        query: &str,
        exclude: &Uuid,
    ) -> Result<Vec<UserSearchResult>, error::SystemError> {
        let results = sqlx::query_as::<_, UserSearchResult>(
            r#"
            SELECT
                p.user_id AS id,
                u.email,
                p.name
            FROM profiles p
            JOIN users u
                ON u.id = p.user_id
            WHERE (lower(u.email) = lower($1) OR p.name ILIKE '%' || $1 || '%')
              AND p.user_id <> $2
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(query)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }
}
