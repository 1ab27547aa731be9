use actix_web::web;

use super::handlers::rest::auth::{user_login, user_logout};

pub fn auth_config(config: &mut web::ServiceConfig) {
    config
        .service(web::resource("/auth/login").route(web::post().to(user_login)))
        .service(web::resource("/auth/logout").route(web::post().to(user_logout)));
}
