use actix_web::web::Data;
use chrono::Utc;
use r2d2::Pool;
use redis::{Client, Commands};

use crate::{
    lifecycle::wizard::Wizard,
    repos::{
        api::ApiError,
        store::{
            session::session_key,
            utils::{get_json_model, hashing_composite_key, keys_by_pattern, set_json_model, store_error},
        },
    },
};

/// Wizard drafts of one session, so a half filled application survives
/// between requests
pub struct WizardRepo {
    pub pool: Data<Pool<Client>>,
    pub ttl_secs: u64,
}

fn wizard_key(token: &str, wizard_id: &str) -> String {
    format!("{}:wizards:{}", session_key(token), wizard_id)
}

impl WizardRepo {
    pub fn create(&self, token: &str) -> Result<(String, Wizard), ApiError> {
        let now = Utc::now();
        let unique = format!("{}_{}", now.timestamp(), now.timestamp_subsec_nanos());
        let mut wizard_id = hashing_composite_key(&[token, &unique]);
        wizard_id.truncate(16);

        let wizard = Wizard::new();
        self.save(token, &wizard_id, &wizard)?;
        Ok((wizard_id, wizard))
    }

    pub fn load(&self, token: &str, wizard_id: &str) -> Result<Wizard, ApiError> {
        let mut con = self.pool.get().map_err(store_error)?;

        get_json_model::<Wizard>(&mut con, &wizard_key(token, wizard_id))?.ok_or_else(|| {
            ApiError::NotFound {
                body: Some(format!("No existe la solicitud en curso {wizard_id}")),
            }
        })
    }

    /// Every save pushes the expiry forward
    pub fn save(&self, token: &str, wizard_id: &str, wizard: &Wizard) -> Result<(), ApiError> {
        let mut con = self.pool.get().map_err(store_error)?;
        set_json_model(
            &mut con,
            &wizard_key(token, wizard_id),
            wizard,
            Some(self.ttl_secs),
        )
    }

    pub fn list(&self, token: &str) -> Result<Vec<(String, Wizard)>, ApiError> {
        let mut con = self.pool.get().map_err(store_error)?;
        let prefix = wizard_key(token, "");
        let keys = keys_by_pattern(&mut con, format!("{prefix}*"))?;

        let mut wizards = Vec::new();
        for key in keys {
            if let Some(wizard) = get_json_model::<Wizard>(&mut con, &key)? {
                let wizard_id = key.trim_start_matches(&prefix).to_owned();
                wizards.push((wizard_id, wizard));
            }
        }
        Ok(wizards)
    }

    pub fn delete(&self, token: &str, wizard_id: &str) -> Result<(), ApiError> {
        let mut con = self.pool.get().map_err(store_error)?;
        con.del::<String, ()>(wizard_key(token, wizard_id))
            .map_err(store_error)
    }
}
