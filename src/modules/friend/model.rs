use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::modules::friend::schema::RequestStatus;

#[derive(Deserialize, Validate)]
pub struct SendRequestBody {
    pub to_user_id: Uuid,
}

#[derive(Deserialize, Validate)]
pub struct RespondBody {
    #[validate(length(min = 1, message = "Action cannot be empty"))]
    pub action: String,
}

/// Status filter for incoming listings. Required: there is no "all" mode.
#[derive(Deserialize, Validate)]
pub struct StatusQuery {
    pub status: RequestStatus,
}

/// Resolution of a pending request. Wire values match the status they
/// produce: "accepted" and "rejected".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespondAction {
    Accept,
    Reject,
}

impl FromStr for RespondAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(RespondAction::Accept),
            "rejected" => Ok(RespondAction::Reject),
            _ => Err(()),
        }
    }
}

impl From<RespondAction> for RequestStatus {
    fn from(action: RespondAction) -> Self {
        match action {
            RespondAction::Accept => RequestStatus::Accepted,
            RespondAction::Reject => RequestStatus::Rejected,
        }
    }
}

/// Join row backing the incoming listing: the request plus the sender's
/// profile identity.
#[derive(Debug, Clone, FromRow)]
pub struct IncomingRequestRow {
    pub id: Uuid,
    pub from_id: Uuid,
    pub email: String,
    pub name: String,
    pub status: RequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequesterInfo {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// What a recipient sees when listing requests: only the other party is
/// exposed, the recipient's own id is implicit.
#[derive(Debug, Clone, Serialize)]
pub struct IncomingRequestResponse {
    pub id: Uuid,
    pub from: RequesterInfo,
    pub status: RequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<IncomingRequestRow> for IncomingRequestResponse {
    fn from(row: IncomingRequestRow) -> Self {
        IncomingRequestResponse {
            id: row.id,
            from: RequesterInfo { id: row.from_id, email: row.email, name: row.name },
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respond_action_parses_wire_values() {
        assert_eq!("accepted".parse::<RespondAction>(), Ok(RespondAction::Accept));
        assert_eq!("rejected".parse::<RespondAction>(), Ok(RespondAction::Reject));
        assert!("accept".parse::<RespondAction>().is_err());
        assert!("blocked".parse::<RespondAction>().is_err());
        assert!("".parse::<RespondAction>().is_err());
    }

    #[test]
    fn respond_action_maps_to_terminal_status() {
        assert_eq!(RequestStatus::from(RespondAction::Accept), RequestStatus::Accepted);
        assert_eq!(RequestStatus::from(RespondAction::Reject), RequestStatus::Rejected);
    }

    #[test]
    fn request_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RequestStatus::Pending).unwrap(), r#""pending""#);
        let status: RequestStatus = serde_json::from_str(r#""rejected""#).unwrap();
        assert_eq!(status, RequestStatus::Rejected);
    }
}
