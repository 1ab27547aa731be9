// This tests assume that a redis with RedisJSON is running, REDIS_URL may point to it
use actix_web::web::Data;
use chrono::Utc;
use r2d2::Pool;
use redis::Client;

use credito_api::{
    endpoints::handlers::configs::connection_pool::get_pool_connection,
    lifecycle::wizard::WizardStep,
    models::auth::{Role, SessionUser},
    repos::{
        api::{billing::SubscriptionCache, ApiError},
        store::{billing_cache::RedisSubscriptionCache, session::SessionRepo, wizard::WizardRepo},
    },
};

fn test_pool() -> Data<Pool<Client>> {
    dotenv::dotenv().ok();
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
    Data::new(get_pool_connection(&redis_url).expect("No se pudo conectar a Redis"))
}

/// Unique per test run so parallel tests don't step on each other
fn unique_token(label: &str) -> String {
    let now = Utc::now();
    format!("{label}_{}_{}", now.timestamp(), now.timestamp_subsec_nanos())
}

#[test]
#[ignore = "requires a running redis with RedisJSON"]
fn session_round_trip() {
    let repo = SessionRepo { pool: test_pool() };
    let token = unique_token("sesion");
    let user = SessionUser {
        id: 7,
        username: "analista".to_owned(),
        role: Role::Gerente,
        tenant: Some("empresa-1".to_owned()),
    };

    repo.save(&token, &user, 60).expect("No se pudo guardar la sesión");
    assert_eq!(repo.load(&token).unwrap(), Some(user));

    repo.delete(&token).unwrap();
    assert_eq!(repo.load(&token).unwrap(), None);
}

#[test]
#[ignore = "requires a running redis with RedisJSON"]
fn wizard_drafts_belong_to_their_session() {
    let pool = test_pool();
    let repo = WizardRepo {
        pool: pool.clone(),
        ttl_secs: 60,
    };
    let token = unique_token("wizard");
    let other_token = unique_token("otro");

    let (id, mut wizard) = repo.create(&token).unwrap();
    wizard.set_values(
        [("nombre".to_owned(), "Ana".to_owned())]
            .into_iter()
            .collect(),
    );
    repo.save(&token, &id, &wizard).unwrap();

    let loaded = repo.load(&token, &id).unwrap();
    assert_eq!(loaded, wizard);
    assert_eq!(loaded.current(), WizardStep::Solicitud);
    assert_eq!(repo.list(&token).unwrap().len(), 1);

    assert!(matches!(
        repo.load(&other_token, &id),
        Err(ApiError::NotFound { .. })
    ));

    // logging out drops the drafts too
    SessionRepo { pool }.delete(&token).unwrap();
    assert!(repo.list(&token).unwrap().is_empty());
}

#[test]
#[ignore = "requires a running redis with RedisJSON"]
fn subscription_cache_is_per_tenant() {
    let cache = RedisSubscriptionCache {
        pool: test_pool(),
        ttl_secs: 60,
    };
    let tenant = unique_token("empresa");
    let subscription = serde_json::from_value(serde_json::json!({
        "id": 1,
        "plan": "Básico",
        "estado": "ACTIVA",
        "fecha_inicio": "2024-01-01",
        "monto": 99.0
    }))
    .unwrap();

    assert_eq!(cache.load(&tenant).unwrap(), None);
    cache.save(&tenant, &subscription).unwrap();
    assert_eq!(cache.load(&tenant).unwrap(), Some(subscription));
    assert_eq!(cache.load(&unique_token("otra")).unwrap(), None);
}
