use chrono::NaiveDate;
use juniper::{GraphQLInputObject, GraphQLObject};
use serde::{Deserialize, Serialize};

use crate::models::amount;

// Fields are in english on our side, the serde names follow the upstream

#[derive(Clone, Serialize, Deserialize, GraphQLObject, Debug, PartialEq)]
pub struct Client {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub surname: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    /// ISO date, passed as a string to avoid a date scalar on the schema
    #[serde(rename = "fecha_registro", default)]
    pub registered_on: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, GraphQLInputObject, Debug, Default, PartialEq)]
pub struct ClientInput {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "apellido", skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "fecha_registro", skip_serializing_if = "Option::is_none")]
    pub registered_on: Option<String>,
}

impl ClientInput {
    pub fn registered_today(mut self, today: NaiveDate) -> Self {
        self.registered_on = Some(today.format("%Y-%m-%d").to_string());
        self
    }
}

#[derive(Clone, Serialize, Deserialize, GraphQLObject, Debug, PartialEq)]
pub struct Documentation {
    pub id: i32,
    #[serde(rename = "cliente")]
    pub client_id: i32,
    #[serde(rename = "tipo_documento")]
    pub document_type: String,
    #[serde(rename = "numero_documento")]
    pub document_number: String,
    /// Bucket path of the scanned document, if uploaded
    #[serde(rename = "archivo", default)]
    pub file: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, GraphQLInputObject, Debug, PartialEq)]
pub struct DocumentationInput {
    #[serde(rename = "cliente")]
    pub client_id: i32,
    #[serde(rename = "tipo_documento")]
    pub document_type: String,
    #[serde(rename = "numero_documento")]
    pub document_number: String,
    #[serde(rename = "archivo", skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, GraphQLObject, Debug, PartialEq)]
pub struct Employment {
    pub id: i32,
    #[serde(rename = "cliente")]
    pub client_id: i32,
    #[serde(rename = "empresa")]
    pub employer: String,
    #[serde(rename = "cargo")]
    pub position: String,
    #[serde(rename = "ingreso_mensual", deserialize_with = "amount::deserialize")]
    pub monthly_income: f64,
    #[serde(rename = "antiguedad_meses", default)]
    pub months_employed: Option<i32>,
}

#[derive(Clone, Serialize, Deserialize, GraphQLInputObject, Debug, PartialEq)]
pub struct EmploymentInput {
    #[serde(rename = "cliente")]
    pub client_id: i32,
    #[serde(rename = "empresa")]
    pub employer: String,
    #[serde(rename = "cargo")]
    pub position: String,
    #[serde(rename = "ingreso_mensual")]
    pub monthly_income: f64,
    #[serde(rename = "antiguedad_meses", skip_serializing_if = "Option::is_none")]
    pub months_employed: Option<i32>,
}

#[derive(Clone, Serialize, Deserialize, GraphQLObject, Debug, PartialEq)]
pub struct Domicile {
    pub id: i32,
    #[serde(rename = "cliente")]
    pub client_id: i32,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "tipo_vivienda", default)]
    pub housing_type: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, GraphQLInputObject, Debug, PartialEq)]
pub struct DomicileInput {
    #[serde(rename = "cliente")]
    pub client_id: i32,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "tipo_vivienda", skip_serializing_if = "Option::is_none")]
    pub housing_type: Option<String>,
}
