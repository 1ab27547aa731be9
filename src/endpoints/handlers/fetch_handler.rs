use actix_web::{http::header::AUTHORIZATION, web::Data, HttpRequest};
use log::warn;
use r2d2::Pool;
use redis::Client;

use crate::{
    models::auth::{parse_token_header, Session},
    repos::{api::ApiClient, store::session::SessionRepo},
};

pub fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Builds the caller's session from its headers. An unknown or expired token
/// still travels upstream, the backend has the last word on it.
pub fn session_from_request(req: &HttpRequest, api: &ApiClient, pool: &Data<Pool<Client>>) -> Session {
    let token = header_value(req, AUTHORIZATION.as_str()).and_then(|value| parse_token_header(&value));
    let tenant = header_value(req, api.tenant_header());
    let session = Session::new(token, tenant);

    let Some(token) = session.token.clone() else {
        return session;
    };

    let repo = SessionRepo { pool: pool.clone() };
    match repo.load(&token) {
        Ok(Some(user)) => session.with_user(user),
        Ok(None) => session,
        Err(err) => {
            warn!("couldn't load the session: {err}");
            session
        }
    }
}
