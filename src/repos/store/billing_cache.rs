use actix_web::web::Data;
use r2d2::Pool;
use redis::Client;

use crate::{
    models::billing::Subscription,
    repos::{
        api::{billing::SubscriptionCache, ApiError},
        store::utils::{get_json_model, set_json_model, store_error},
    },
};

pub struct RedisSubscriptionCache {
    pub pool: Data<Pool<Client>>,
    pub ttl_secs: u64,
}

fn subscription_key(tenant: &str) -> String {
    format!("tenants:{tenant}:subscription")
}

impl SubscriptionCache for RedisSubscriptionCache {
    fn load(&self, tenant: &str) -> Result<Option<Subscription>, ApiError> {
        let mut con = self.pool.get().map_err(store_error)?;
        get_json_model(&mut con, &subscription_key(tenant))
    }

    fn save(&self, tenant: &str, subscription: &Subscription) -> Result<(), ApiError> {
        let mut con = self.pool.get().map_err(store_error)?;
        set_json_model(
            &mut con,
            &subscription_key(tenant),
            subscription,
            Some(self.ttl_secs),
        )
    }
}
