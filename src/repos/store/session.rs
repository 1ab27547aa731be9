use actix_web::web::Data;
use r2d2::Pool;
use redis::{Client, Commands};

use crate::{
    models::auth::SessionUser,
    repos::{
        api::ApiError,
        store::utils::{
            delete_keys_by_pattern, get_json_model, hashing_composite_key, set_json_model,
            store_error,
        },
    },
};

/// Redis key prefix for everything belonging to one token. The raw token never
/// shows up in a key, only its hash.
pub fn session_key(token: &str) -> String {
    format!("sessions:{}", hashing_composite_key(&[token]))
}

pub struct SessionRepo {
    pub pool: Data<Pool<Client>>,
}

impl SessionRepo {
    pub fn save(&self, token: &str, user: &SessionUser, ttl_secs: u64) -> Result<(), ApiError> {
        let mut con = self.pool.get().map_err(store_error)?;
        set_json_model(&mut con, &format!("{}:user", session_key(token)), user, Some(ttl_secs))
    }

    pub fn load(&self, token: &str) -> Result<Option<SessionUser>, ApiError> {
        let mut con = self.pool.get().map_err(store_error)?;
        get_json_model(&mut con, &format!("{}:user", session_key(token)))
    }

    /// Drops the identity and every wizard draft of the session
    pub fn delete(&self, token: &str) -> Result<(), ApiError> {
        let mut con = self.pool.get().map_err(store_error)?;
        let prefix = session_key(token);

        con.del::<String, ()>(format!("{prefix}:user"))
            .map_err(store_error)?;
        delete_keys_by_pattern(&mut con, format!("{prefix}:wizards:*")).map_err(store_error)?;
        Ok(())
    }
}
