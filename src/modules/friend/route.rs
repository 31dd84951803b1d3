use crate::modules::friend::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friend-requests")
            .service(send_friend_request)
            .service(list_friend_requests)
            .service(respond_friend_request),
    );
}
