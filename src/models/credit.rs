use chrono::{DateTime, Utc};
use juniper::{GraphQLEnum, GraphQLInputObject, GraphQLObject};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{amount, payload};

// Wire values are kept exactly as the upstream spells them, typo included
#[derive(Clone, Copy, Serialize, Deserialize, GraphQLEnum, Debug, PartialEq, Eq)]
pub enum CreditState {
    #[serde(rename = "SOLICITADO")]
    Solicitado,
    #[serde(rename = "Pendiente")]
    Pendiente,
    #[serde(rename = "Aprobado")]
    Aprobado,
    #[serde(rename = "DESENBOLSADO")]
    Desembolsado,
    #[serde(rename = "Rechazado")]
    Rechazado,
    #[serde(rename = "FINALIZADO")]
    Finalizado,
}

impl CreditState {
    /// No further transitions happen once a credit is closed or rejected
    pub fn is_terminal(&self) -> bool {
        matches!(self, CreditState::Finalizado | CreditState::Rechazado)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CreditState::Solicitado => "SOLICITADO",
            CreditState::Pendiente => "Pendiente",
            CreditState::Aprobado => "Aprobado",
            CreditState::Desembolsado => "DESENBOLSADO",
            CreditState::Rechazado => "Rechazado",
            CreditState::Finalizado => "FINALIZADO",
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Credit {
    pub id: i32,
    #[serde(rename = "monto", deserialize_with = "amount::deserialize")]
    pub amount: f64,
    #[serde(rename = "estado")]
    pub state: CreditState,
    /// Kept raw, the registry decides what an unknown phase looks like
    #[serde(rename = "fase_actual")]
    pub phase: String,
    #[serde(rename = "cliente")]
    pub client_id: i32,
    #[serde(rename = "fecha_creacion", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for both create and partial update, absent fields are not sent
#[derive(Clone, Serialize, Deserialize, GraphQLInputObject, Debug, Default, PartialEq)]
pub struct CreditInput {
    #[serde(rename = "monto", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub state: Option<CreditState>,
    #[serde(rename = "fase_actual", skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(rename = "cliente", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i32>,
}

#[derive(Clone, GraphQLInputObject, Debug, Default)]
pub struct CreditFilters {
    pub state: Option<CreditState>,
    pub phase: Option<String>,
    pub client_id: Option<i32>,
    pub page: Option<i32>,
}

impl CreditFilters {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(state) = &self.state {
            query.push(("estado".to_owned(), state.as_str().to_owned()));
        }
        if let Some(phase) = &self.phase {
            query.push(("fase_actual".to_owned(), phase.to_owned()));
        }
        if let Some(client_id) = self.client_id {
            query.push(("cliente".to_owned(), client_id.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page".to_owned(), page.to_string()));
        }
        query
    }
}

/// One row of a credit's phase history. Append-only on the upstream side.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct PhaseTransitionEvent {
    pub id: i32,
    #[serde(rename = "fase_anterior", default)]
    pub previous_phase: Option<String>,
    #[serde(rename = "fase_nueva")]
    pub new_phase: String,
    #[serde(rename = "fecha")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "usuario")]
    pub user: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "datos", default, deserialize_with = "payload::deserialize")]
    pub payload: Map<String, Value>,
}

#[derive(Clone, Serialize, Deserialize, GraphQLObject, Debug, PartialEq)]
pub struct Guarantor {
    pub id: i32,
    #[serde(rename = "credito")]
    pub credit_id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub surname: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "relacion")]
    pub relationship: String,
}

#[derive(Clone, Serialize, Deserialize, GraphQLInputObject, Debug, PartialEq)]
pub struct GuarantorInput {
    #[serde(rename = "credito")]
    pub credit_id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub surname: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "relacion")]
    pub relationship: String,
}
