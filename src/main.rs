use std::{io, time::Duration};

use actix_cors::Cors;
use actix_web::{web::Data, App, HttpServer};
use credito_api::config::Env;
use credito_api::endpoints::{
    auth_endpoints::auth_config,
    graphql_endpoints::graphql_config,
    handlers::configs::connection_pool::get_pool_connection,
    health_config,
};
use credito_api::repos::api::ApiClient;
use log::info;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Cargar variables de entorno desde .env
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Env::env_init()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;

    let pool = get_pool_connection(&config.redis_url)
        .map_err(|err| io::Error::new(io::ErrorKind::ConnectionRefused, err.to_string()))?;
    let api = ApiClient::new(
        &config.backend_url,
        &config.tenant_header,
        Duration::from_secs(config.request_timeout_secs),
    )
    .map_err(io::Error::other)?;

    let host = config.host.to_owned();
    let port = config.port;
    info!("serving on {host}:{port}, upstream {}", config.backend_url);

    let pool = Data::new(pool);
    let api = Data::new(api);
    let env = Data::new(config);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(pool.clone())
            .app_data(api.clone())
            .app_data(env.clone())
            .configure(graphql_config)
            .configure(health_config)
            .configure(auth_config)
            .wrap(cors)
    })
    .bind((host, port))?
    .run()
    .await
}
