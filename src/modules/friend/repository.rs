use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::model::IncomingRequestRow;
use crate::modules::friend::schema::{FriendRequestEntity, RequestStatus};

/// Durable store for friend requests. The (from, to) directed pair is unique
/// across all statuses; `create_request` surfaces a violation as
/// `SystemError::Conflict` for the service to translate.
#[async_trait::async_trait]
pub trait FriendRequestRepository {
    async fn request_exists(
        &self,
        from: &Uuid,
        to: &Uuid,
        status: RequestStatus,
    ) -> Result<bool, error::SystemError>;

    /// Number of requests created by `from` at or after `since`, any status.
    async fn count_sent_since(
        &self,
        from: &Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, error::SystemError>;

    async fn create_request(
        &self,
        from: &Uuid,
        to: &Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError>;

    async fn find_pending_for_recipient(
        &self,
        request_id: &Uuid,
        recipient_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    /// Moves a pending request to a terminal status in one transaction,
    /// refreshing `updated_at`. Returns `None` when no pending row matches
    /// (unknown id, wrong recipient, or already resolved).
    async fn resolve_request(
        &self,
        request_id: &Uuid,
        recipient_id: &Uuid,
        status: RequestStatus,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    /// Incoming requests for a recipient with the given status, joined with
    /// the sender's profile, newest-created first.
    async fn find_incoming(
        &self,
        recipient_id: &Uuid,
        status: RequestStatus,
    ) -> Result<Vec<IncomingRequestRow>, error::SystemError>;
}
