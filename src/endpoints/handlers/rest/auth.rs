use actix_web::{
    web::{Data, Json},
    HttpRequest, HttpResponse,
};
use log::warn;
use r2d2::Pool;
use redis::Client;

use crate::{
    config::Env,
    endpoints::handlers::fetch_handler::{header_value, session_from_request},
    models::{
        auth::{LoginInfo, Session},
        StatusMessage,
    },
    repos::{
        api::{
            user::{login, logout},
            ApiClient, ApiError,
        },
        store::session::SessionRepo,
    },
};

fn error_response(err: ApiError) -> HttpResponse {
    HttpResponse::build(err.http_status()).json(StatusMessage {
        message: err.to_string(),
    })
}

/// Logs in upstream and remembers who the token belongs to
///
/// POST /auth/login
pub async fn user_login(
    req: HttpRequest,
    pool: Data<Pool<Client>>,
    api: Data<ApiClient>,
    env: Data<Env>,
    credentials: Json<LoginInfo>,
) -> HttpResponse {
    let session = Session::new(None, header_value(&req, api.tenant_header()));

    let token_info = match login(&api, &session, &credentials).await {
        Ok(token_info) => token_info,
        Err(err) => return error_response(err),
    };

    let repo = SessionRepo { pool };
    if let Err(err) = repo.save(&token_info.token, &token_info.user, env.session_ttl_secs) {
        return error_response(err);
    }

    HttpResponse::Ok().json(token_info)
}

/// Drops the local session even when the upstream logout fails, the token
/// expires there on its own
///
/// POST /auth/logout
pub async fn user_logout(
    req: HttpRequest,
    pool: Data<Pool<Client>>,
    api: Data<ApiClient>,
) -> HttpResponse {
    let session = session_from_request(&req, &api, &pool);
    let Some(token) = session.token.clone() else {
        return error_response(ApiError::Unauthenticated);
    };

    if let Err(err) = logout(&api, &session).await {
        warn!("upstream logout failed: {err}");
    }

    match (SessionRepo { pool }).delete(&token) {
        Ok(()) => HttpResponse::Ok().json(StatusMessage {
            message: "Sesión cerrada".to_owned(),
        }),
        Err(err) => error_response(err),
    }
}
