use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        model::IncomingRequestRow,
        repository::FriendRequestRepository,
        schema::{FriendRequestEntity, RequestStatus},
    },
};

#[derive(Clone)]
pub struct FriendRequestRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRequestRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for FriendRequestRepositoryPg {
    async fn request_exists(
        &self,
        from: &Uuid,
        to: &Uuid,
        status: RequestStatus,
    ) -> Result<bool, error::SystemError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM friend_requests
                WHERE from_profile_id = $1
                  AND to_profile_id = $2
                  AND status = $3
            )
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn count_sent_since(
        &self,
        from: &Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, error::SystemError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM friend_requests WHERE from_profile_id = $1 AND created_at >= $2",
        )
        .bind(from)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn create_request(
        &self,
        from: &Uuid,
        to: &Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));

        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            INSERT INTO friend_requests (id, from_profile_id, to_profile_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(request)
    }

    async fn find_pending_for_recipient(
        &self,
        request_id: &Uuid,
        recipient_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            "SELECT * FROM friend_requests WHERE id = $1 AND to_profile_id = $2 AND status = $3",
        )
        .bind(request_id)
        .bind(recipient_id)
        .bind(RequestStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn resolve_request(
        &self,
        request_id: &Uuid,
        recipient_id: &Uuid,
        status: RequestStatus,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let pending = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            SELECT * FROM friend_requests
            WHERE id = $1 AND to_profile_id = $2 AND status = $3
            FOR UPDATE
            "#,
        )
        .bind(request_id)
        .bind(recipient_id)
        .bind(RequestStatus::Pending)
        .fetch_optional(&mut *tx)
        .await?;

        if pending.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let updated = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            UPDATE friend_requests
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(updated))
    }

    async fn find_incoming(
        &self,
        recipient_id: &Uuid,
        status: RequestStatus,
    ) -> Result<Vec<IncomingRequestRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, IncomingRequestRow>(
            r#"
            SELECT
                fr.id,
                p.user_id AS from_id,
                u.email,
                p.name,
                fr.status,
                fr.created_at,
                fr.updated_at
            FROM friend_requests fr
            JOIN profiles p
                ON p.user_id = fr.from_profile_id
            JOIN users u
                ON u.id = p.user_id
            WHERE fr.to_profile_id = $1
              AND fr.status = $2
            ORDER BY fr.created_at DESC
            "#,
        )
        .bind(recipient_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
