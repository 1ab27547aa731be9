use chrono::{DateTime, NaiveDate, Utc};
use juniper::{GraphQLEnum, GraphQLInputObject};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::amount::{self, to_cents};

#[derive(Clone, Copy, Serialize, Deserialize, GraphQLEnum, Debug, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pendiente,
    Procesando,
    Completado,
    Fallido,
    Cancelado,
    Reembolsado,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pendiente => "PENDIENTE",
            PaymentStatus::Procesando => "PROCESANDO",
            PaymentStatus::Completado => "COMPLETADO",
            PaymentStatus::Fallido => "FALLIDO",
            PaymentStatus::Cancelado => "CANCELADO",
            PaymentStatus::Reembolsado => "REEMBOLSADO",
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, GraphQLEnum, Debug, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Efectivo,
    Transferencia,
    Tarjeta,
    Cheque,
}

/// One scheduled installment of a disbursed credit
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Payment {
    pub id: i32,
    #[serde(rename = "credito")]
    pub credit_id: i32,
    #[serde(rename = "numero_cuota")]
    pub sequence: i32,
    #[serde(rename = "monto_programado", deserialize_with = "amount::deserialize")]
    pub scheduled_amount: f64,
    #[serde(
        rename = "monto_pagado",
        default,
        deserialize_with = "amount::deserialize_option"
    )]
    pub paid_amount: Option<f64>,
    #[serde(rename = "fecha_vencimiento")]
    pub due_date: NaiveDate,
    #[serde(rename = "fecha_pago", default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(rename = "estado")]
    pub status: PaymentStatus,
    #[serde(rename = "metodo_pago", default)]
    pub method: Option<PaymentMethod>,
    #[serde(rename = "referencia_transaccion", default)]
    pub transaction_reference: Option<String>,
    #[serde(rename = "dias_mora", default)]
    pub days_overdue: i32,
    #[serde(
        rename = "interes_mora",
        default,
        deserialize_with = "amount::deserialize_option"
    )]
    pub overdue_interest: Option<f64>,
}

/// Why an installment can't be settled, decided before talking to the upstream
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentRejection {
    #[error("La cuota {sequence} no está pendiente (estado {status})")]
    NotPending { sequence: i32, status: &'static str },
    #[error("El monto a pagar debe ser mayor a cero")]
    NonPositiveAmount,
    #[error("El monto {offered:.2} no cubre el total adeudado de {due:.2}")]
    Insufficient { due: f64, offered: f64 },
}

/// PATCH body that moves an installment to its terminal paid state
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct InstallmentSettlement {
    #[serde(rename = "estado")]
    pub status: PaymentStatus,
    #[serde(rename = "monto_pagado")]
    pub paid_amount: f64,
    #[serde(rename = "fecha_pago")]
    pub paid_at: DateTime<Utc>,
    #[serde(rename = "metodo_pago")]
    pub method: PaymentMethod,
    #[serde(rename = "referencia_transaccion", skip_serializing_if = "Option::is_none")]
    pub transaction_reference: Option<String>,
}

impl Payment {
    pub fn amount_due(&self) -> f64 {
        self.scheduled_amount + self.overdue_interest.unwrap_or(0.)
    }

    /// paid date and method only exist on completed installments
    pub fn is_consistent(&self) -> bool {
        let settled_fields = self.paid_at.is_some() || self.method.is_some();
        match self.status {
            PaymentStatus::Completado => self.paid_at.is_some() && self.method.is_some(),
            _ => !settled_fields,
        }
    }

    pub fn settle(
        &self,
        amount: f64,
        method: PaymentMethod,
        transaction_reference: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<InstallmentSettlement, PaymentRejection> {
        if self.status != PaymentStatus::Pendiente {
            return Err(PaymentRejection::NotPending {
                sequence: self.sequence,
                status: self.status.as_str(),
            });
        }

        if to_cents(amount) <= 0 {
            return Err(PaymentRejection::NonPositiveAmount);
        }

        let due = self.amount_due();
        if to_cents(amount) < to_cents(due) {
            return Err(PaymentRejection::Insufficient {
                due,
                offered: amount,
            });
        }

        Ok(InstallmentSettlement {
            status: PaymentStatus::Completado,
            paid_amount: amount,
            paid_at: now,
            method,
            transaction_reference,
        })
    }
}

#[derive(Clone, GraphQLInputObject, Debug)]
pub struct InstallmentPaymentInput {
    pub payment_id: i32,
    pub amount: f64,
    pub method: PaymentMethod,
    /// Reference handed back by the card gateway or the bank, if any
    pub transaction_reference: Option<String>,
}

#[derive(Clone, GraphQLInputObject, Debug, Default)]
pub struct PaymentFilters {
    pub credit_id: Option<i32>,
    pub status: Option<PaymentStatus>,
    pub page: Option<i32>,
}

impl PaymentFilters {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(credit_id) = self.credit_id {
            query.push(("credito".to_owned(), credit_id.to_string()));
        }
        if let Some(status) = &self.status {
            query.push(("estado".to_owned(), status.as_str().to_owned()));
        }
        if let Some(page) = self.page {
            query.push(("page".to_owned(), page.to_string()));
        }
        query
    }
}
