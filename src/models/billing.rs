use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::amount;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Subscription {
    pub id: i32,
    pub plan: String,
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "fecha_inicio")]
    pub starts_on: NaiveDate,
    #[serde(rename = "fecha_fin", default)]
    pub ends_on: Option<NaiveDate>,
    #[serde(rename = "monto", deserialize_with = "amount::deserialize")]
    pub amount: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Invoice {
    pub id: i32,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "monto", deserialize_with = "amount::deserialize")]
    pub amount: f64,
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "fecha_emision")]
    pub issued_on: NaiveDate,
}
