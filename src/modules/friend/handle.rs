use actix_web::{HttpRequest, get, patch, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::{
            model::{IncomingRequestResponse, RespondBody, SendRequestBody, StatusQuery},
            repository_pg::FriendRequestRepositoryPg,
            schema::FriendRequestEntity,
            service::FriendRequestService,
        },
        user::repository_pg::UserRepositoryPg,
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type FriendRequestSvc = FriendRequestService<FriendRequestRepositoryPg, UserRepositoryPg>;

#[post("")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendRequestSvc>,
    body: ValidatedJson<SendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestEntity>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let request = friend_service.send_request(actor_id, body.0.to_user_id).await?;

    Ok(success::Success::created(Some(request)).message("Friend request sent successfully"))
}

#[get("")]
pub async fn list_friend_requests(
    friend_service: web::Data<FriendRequestSvc>,
    query: ValidatedQuery<StatusQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<IncomingRequestResponse>>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let requests = friend_service.list_incoming(actor_id, query.0.status).await?;

    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[patch("/{request_id}")]
pub async fn respond_friend_request(
    friend_service: web::Data<FriendRequestSvc>,
    request_id: web::Path<Uuid>,
    body: ValidatedJson<RespondBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestEntity>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let request = friend_service.respond(actor_id, *request_id, &body.0.action).await?;

    Ok(success::Success::ok(Some(request)).message("Friend request updated successfully"))
}
