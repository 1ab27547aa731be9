#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::Mutex,
    time::Duration,
};

use credito_api::{
    models::{
        auth::{Role, Session, SessionUser},
        billing::Subscription,
    },
    repos::api::{billing::SubscriptionCache, ApiClient, ApiError},
};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TOKEN: &str = "token-de-prueba";
pub const TENANT: &str = "empresa-1";
pub const TENANT_HEADER: &str = "X-Tenant-ID";
pub const USER_ID: i32 = 7;

/// Session of a logged in user of `TENANT` with the given role
pub fn session_as(role: Role) -> Session {
    Session::new(Some(TOKEN.to_owned()), Some(TENANT.to_owned())).with_user(SessionUser {
        id: USER_ID,
        username: "analista".to_owned(),
        role,
        tenant: Some(TENANT.to_owned()),
    })
}

pub fn api_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), TENANT_HEADER, Duration::from_secs(5))
        .expect("No se pudo crear el cliente http")
}

pub fn credit_json(id: i32, state: &str, phase: &str) -> Value {
    json!({
        "id": id,
        "monto": "15000.00",
        "estado": state,
        "fase_actual": phase,
        "cliente": 3,
        "fecha_creacion": "2024-03-01T14:30:00Z"
    })
}

pub fn pending_payment_json(id: i32, scheduled: &str) -> Value {
    json!({
        "id": id,
        "credito": 11,
        "numero_cuota": 4,
        "monto_programado": scheduled,
        "monto_pagado": null,
        "fecha_vencimiento": "2024-06-30",
        "fecha_pago": null,
        "estado": "PENDIENTE",
        "metodo_pago": null,
        "dias_mora": 0,
        "interes_mora": "0.00"
    })
}

pub fn subscription() -> Subscription {
    serde_json::from_value(json!({
        "id": 1,
        "plan": "Profesional",
        "estado": "ACTIVA",
        "fecha_inicio": "2024-01-01",
        "fecha_fin": "2024-12-31",
        "monto": "499.00"
    }))
    .expect("Suscripción de prueba inválida")
}

/// Subscription cache kept in memory, stands in for redis
#[derive(Default)]
pub struct MemoryCache {
    pub entries: Mutex<HashMap<String, Subscription>>,
}

impl SubscriptionCache for MemoryCache {
    fn load(&self, tenant: &str) -> Result<Option<Subscription>, ApiError> {
        Ok(self.entries.lock().unwrap().get(tenant).cloned())
    }

    fn save(&self, tenant: &str, subscription: &Subscription) -> Result<(), ApiError> {
        self.entries
            .lock()
            .unwrap()
            .insert(tenant.to_owned(), subscription.clone());
        Ok(())
    }
}
