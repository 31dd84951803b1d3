use actix_web::{HttpRequest, get, post, web};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::user::{model, service::UserService},
    utils::{ValidatedJson, ValidatedQuery},
};

#[post("/signup")]
pub async fn sign_up(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignUpModel>,
) -> Result<success::Success<model::SignUpResponse>, error::Error> {
    let user_id = user_service.sign_up(user_data.0).await?;
    Ok(success::Success::created(Some(model::SignUpResponse { id: user_id }))
        .message("User created successfully"))
}

#[post("/login")]
pub async fn sign_in(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignInModel>,
) -> Result<success::Success<model::SignInResponse>, error::Error> {
    let response = user_service.sign_in(user_data.0).await?;
    Ok(success::Success::ok(Some(response)).message("Login successful"))
}

#[post("/refresh")]
pub async fn refresh(
    user_service: web::Data<UserService>,
    body: ValidatedJson<model::RefreshTokenModel>,
) -> Result<success::Success<model::RefreshResponse>, error::Error> {
    let access = user_service.refresh(&body.0.refresh).await?;
    Ok(success::Success::ok(Some(model::RefreshResponse { access }))
        .message("Refresh successful"))
}

#[get("/search")]
pub async fn search_users(
    user_service: web::Data<UserService>,
    query: ValidatedQuery<model::SearchQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<model::UserSearchResult>>, error::Error> {
    let actor_id = get_claims(&req)?.sub;
    let q = query.0.q.unwrap_or_default();
    let results = user_service.search(actor_id, &q).await?;
    Ok(success::Success::ok(Some(results)).message("Users retrieved successfully"))
}
