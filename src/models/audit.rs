use chrono::{DateTime, Utc};
use juniper::GraphQLInputObject;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::payload;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct AuditEntry {
    pub id: i32,
    #[serde(rename = "usuario")]
    pub user: String,
    #[serde(rename = "accion")]
    pub action: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "objeto_id", default)]
    pub object_id: Option<String>,
    #[serde(rename = "fecha")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "cambios", default, deserialize_with = "payload::deserialize")]
    pub changes: Map<String, Value>,
}

#[derive(Clone, GraphQLInputObject, Debug, Default)]
pub struct AuditFilters {
    pub user: Option<String>,
    pub model: Option<String>,
    pub page: Option<i32>,
}

impl AuditFilters {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(user) = &self.user {
            query.push(("usuario".to_owned(), user.to_owned()));
        }
        if let Some(model) = &self.model {
            query.push(("modelo".to_owned(), model.to_owned()));
        }
        if let Some(page) = self.page {
            query.push(("page".to_owned(), page.to_string()));
        }
        query
    }
}
