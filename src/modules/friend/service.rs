use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            error::FriendRequestError,
            model::{IncomingRequestResponse, RespondAction},
            repository::FriendRequestRepository,
            schema::{FriendRequestEntity, RequestStatus},
        },
        user::repository::UserRepository,
    },
    utils::Clock,
};

const RATE_LIMIT_MAX_REQUESTS: i64 = 3;
const RATE_LIMIT_WINDOW_SECS: i64 = 60;

#[derive(Clone)]
pub struct FriendRequestService<R, U>
where
    R: FriendRequestRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    repo: Arc<R>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<R, U> FriendRequestService<R, U>
where
    R: FriendRequestRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(repo: Arc<R>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        FriendRequestService { repo, users, clock }
    }

    /// Creates a pending request from `actor_id` to `target_id`. Precondition
    /// checks run in a fixed order and short-circuit on the first failure.
    pub async fn send_request(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<FriendRequestEntity, FriendRequestError> {
        if target_id == actor_id {
            return Err(FriendRequestError::SelfRequest);
        }

        if !self.users.profile_exists(&target_id).await? {
            return Err(FriendRequestError::InvalidTarget);
        }

        let (pending, accepted) = tokio::try_join!(
            self.repo.request_exists(&actor_id, &target_id, RequestStatus::Pending),
            self.repo.request_exists(&actor_id, &target_id, RequestStatus::Accepted),
        )?;

        if pending {
            return Err(FriendRequestError::DuplicatePending);
        }

        if accepted {
            return Err(FriendRequestError::AlreadyFriends);
        }

        // Trailing window measured from the moment of the call, not a fixed
        // clock bucket.
        let since = self.clock.now() - Duration::seconds(RATE_LIMIT_WINDOW_SECS);
        if self.repo.count_sent_since(&actor_id, since).await? >= RATE_LIMIT_MAX_REQUESTS {
            return Err(FriendRequestError::RateLimited);
        }

        match self.repo.create_request(&actor_id, &target_id).await {
            Ok(request) => Ok(request),
            // Lost race with a concurrent send, or a directed pair whose
            // unique row is parked in a terminal status.
            Err(error::SystemError::Conflict(_)) => Err(FriendRequestError::DuplicatePending),
            Err(err) => Err(err.into()),
        }
    }

    /// Resolves a pending request addressed to `actor_id`. Unknown id, wrong
    /// recipient and already-resolved all surface as the same `NotFound`.
    pub async fn respond(
        &self,
        actor_id: Uuid,
        request_id: Uuid,
        action: &str,
    ) -> Result<FriendRequestEntity, FriendRequestError> {
        self.repo
            .find_pending_for_recipient(&request_id, &actor_id)
            .await?
            .ok_or(FriendRequestError::NotFound)?;

        let action =
            action.parse::<RespondAction>().map_err(|_| FriendRequestError::InvalidAction)?;

        self.repo
            .resolve_request(&request_id, &actor_id, action.into())
            .await?
            .ok_or(FriendRequestError::NotFound)
    }

    pub async fn list_incoming(
        &self,
        actor_id: Uuid,
        status: RequestStatus,
    ) -> Result<Vec<IncomingRequestResponse>, FriendRequestError> {
        let rows = self.repo.find_incoming(&actor_id, status).await?;
        Ok(rows.into_iter().map(IncomingRequestResponse::from).collect())
    }
}
