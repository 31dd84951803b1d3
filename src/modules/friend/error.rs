use crate::api::error;

/// Business-rule failures of the friend-request workflow. Every variant maps
/// to HTTP 400 with a stable code; `System` carries infrastructure failures
/// through unchanged.
#[derive(thiserror::Error, Debug)]
pub enum FriendRequestError {
    #[error("You cannot send a friend request to yourself")]
    SelfRequest,
    #[error("No user exists with this id")]
    InvalidTarget,
    #[error("Friend request already sent")]
    DuplicatePending,
    #[error("Already in friend list")]
    AlreadyFriends,
    #[error("You cannot send more than 3 friend requests in a minute")]
    RateLimited,
    #[error("No pending friend request found")]
    NotFound,
    #[error("Invalid action")]
    InvalidAction,
    #[error(transparent)]
    System(#[from] error::SystemError),
}

impl FriendRequestError {
    pub fn code(&self) -> &'static str {
        match self {
            FriendRequestError::SelfRequest => "self_request",
            FriendRequestError::InvalidTarget => "invalid_target",
            FriendRequestError::DuplicatePending => "duplicate_pending",
            FriendRequestError::AlreadyFriends => "already_friends",
            FriendRequestError::RateLimited => "rate_limited",
            FriendRequestError::NotFound => "not_found",
            FriendRequestError::InvalidAction => "invalid_action",
            FriendRequestError::System(_) => "internal_error",
        }
    }
}

impl From<FriendRequestError> for error::Error {
    fn from(value: FriendRequestError) -> Self {
        match value {
            FriendRequestError::System(err) => err.into(),
            other => error::Error::bad_request(other.code(), other.to_string()),
        }
    }
}
