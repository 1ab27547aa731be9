use actix_web::{web, HttpResponse};

use crate::models::GeneralInfo;

pub mod auth_endpoints;
pub mod graphql_endpoints;

pub mod handlers;

pub fn health_config(config: &mut web::ServiceConfig) {
    config.service(web::resource("/health").route(web::get().to(general_endpoint_info)));
}

async fn general_endpoint_info() -> HttpResponse {
    HttpResponse::Ok().json(GeneralInfo {
        api_version: format!("v {}", env!("CARGO_PKG_VERSION")),
    })
}
