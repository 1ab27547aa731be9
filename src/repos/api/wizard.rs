use async_trait::async_trait;
use chrono::Utc;

use crate::{
    lifecycle::wizard::{
        parse_amount, StepContext, StepFailure, StepOutcome, StepPersister, StepValues,
        WizardStep,
    },
    models::{
        client::{ClientInput, DocumentationInput, DomicileInput, EmploymentInput},
        credit::{CreditInput, CreditState, GuarantorInput},
    },
    repos::api::{client::ClientService, credit::CreditService, ApiError},
};

/// Phase a credit is left in once the applicant sends it for review
pub const SUBMITTED_PHASE: &str = "FASE_6";

/// Saves each onboarding step through the upstream services. A step that was
/// already saved once is updated, so resubmitting never duplicates records.
pub struct CreditWizardPersister {
    pub credits: CreditService,
    pub clients: ClientService,
}

fn field(values: &StepValues, key: &str) -> String {
    values
        .get(key)
        .map(|value| value.trim().to_owned())
        .unwrap_or_default()
}

fn optional_field(values: &StepValues, key: &str) -> Option<String> {
    Some(field(values, key)).filter(|value| !value.is_empty())
}

fn amount(values: &StepValues, key: &str) -> Result<f64, ApiError> {
    parse_amount(values, key)
        .ok_or_else(|| ApiError::Validation(format!("El campo {key} no es un monto válido")))
}

fn require(id: Option<i32>, what: &str) -> Result<i32, ApiError> {
    id.ok_or_else(|| {
        ApiError::Validation(format!(
            "Primero complete la solicitud, falta el {what}"
        ))
    })
}

impl CreditWizardPersister {
    /// Creates the client and then the credit. When only the client got
    /// stored, its id comes back with the error.
    async fn save_application(
        &self,
        context: &StepContext<'_>,
    ) -> Result<StepOutcome, StepFailure<ApiError>> {
        let values = context.values;
        let monto = amount(values, "monto")?;
        let client_input = ClientInput {
            name: Some(field(values, "nombre")),
            surname: Some(field(values, "apellido")),
            phone: Some(field(values, "telefono")),
            registered_on: None,
        };

        let client = match context.client_id {
            Some(client_id) => self.clients.update(client_id, &client_input).await?,
            None => {
                let client_input = client_input.registered_today(Utc::now().date_naive());
                self.clients.create(&client_input).await?
            }
        };

        let saved = StepOutcome {
            client_id: Some(client.id),
            ..StepOutcome::default()
        };

        let credit = match context.credit_id {
            Some(credit_id) => {
                let input = CreditInput {
                    amount: Some(monto),
                    ..CreditInput::default()
                };
                self.credits.update(credit_id, &input).await
            }
            None => {
                let input = CreditInput {
                    amount: Some(monto),
                    state: Some(CreditState::Solicitado),
                    phase: Some("FASE_1".to_owned()),
                    client_id: Some(client.id),
                };
                self.credits.create(&input).await
            }
        }
        .map_err(|error| StepFailure { error, saved })?;

        Ok(StepOutcome {
            client_id: Some(client.id),
            credit_id: Some(credit.id),
            record_id: Some(credit.id),
        })
    }

    async fn save_documentation(&self, context: &StepContext<'_>) -> Result<i32, ApiError> {
        let input = DocumentationInput {
            client_id: require(context.client_id, "cliente")?,
            document_type: field(context.values, "tipo_documento"),
            document_number: field(context.values, "numero_documento"),
            file: optional_field(context.values, "archivo"),
        };

        let record = match context.record_id {
            Some(id) => self.clients.update_documentation(id, &input).await?,
            None => self.clients.create_documentation(&input).await?,
        };
        Ok(record.id)
    }

    async fn save_employment(&self, context: &StepContext<'_>) -> Result<i32, ApiError> {
        let months_employed = optional_field(context.values, "antiguedad_meses")
            .map(|months| {
                months.parse::<i32>().map_err(|_| {
                    ApiError::Validation("La antigüedad debe ser un número de meses".to_owned())
                })
            })
            .transpose()?;

        let input = EmploymentInput {
            client_id: require(context.client_id, "cliente")?,
            employer: field(context.values, "empresa"),
            position: field(context.values, "cargo"),
            monthly_income: amount(context.values, "ingreso_mensual")?,
            months_employed,
        };

        let record = match context.record_id {
            Some(id) => self.clients.update_employment(id, &input).await?,
            None => self.clients.create_employment(&input).await?,
        };
        Ok(record.id)
    }

    async fn save_domicile(&self, context: &StepContext<'_>) -> Result<i32, ApiError> {
        let input = DomicileInput {
            client_id: require(context.client_id, "cliente")?,
            address: field(context.values, "direccion"),
            city: field(context.values, "ciudad"),
            housing_type: optional_field(context.values, "tipo_vivienda"),
        };

        let record = match context.record_id {
            Some(id) => self.clients.update_domicile(id, &input).await?,
            None => self.clients.create_domicile(&input).await?,
        };
        Ok(record.id)
    }

    async fn save_guarantor(&self, context: &StepContext<'_>) -> Result<i32, ApiError> {
        let input = GuarantorInput {
            credit_id: require(context.credit_id, "crédito")?,
            name: field(context.values, "nombre"),
            surname: field(context.values, "apellido"),
            phone: field(context.values, "telefono"),
            relationship: field(context.values, "relacion"),
        };

        let record = match context.record_id {
            Some(id) => self.credits.update_guarantor(id, &input).await?,
            None => self.credits.create_guarantor(&input).await?,
        };
        Ok(record.id)
    }
}

#[async_trait]
impl StepPersister for CreditWizardPersister {
    type Error = ApiError;

    async fn persist(
        &self,
        context: StepContext<'_>,
    ) -> Result<StepOutcome, StepFailure<ApiError>> {
        let record_id = match context.step {
            WizardStep::Solicitud => return self.save_application(&context).await,
            WizardStep::Documentacion => self.save_documentation(&context).await?,
            WizardStep::Laboral => self.save_employment(&context).await?,
            WizardStep::Domicilio => self.save_domicile(&context).await?,
            WizardStep::Garante => self.save_guarantor(&context).await?,
            WizardStep::Revision => return Ok(StepOutcome::default()),
        };

        Ok(StepOutcome {
            record_id: Some(record_id),
            ..StepOutcome::default()
        })
    }

    async fn complete(&self, _client_id: Option<i32>, credit_id: Option<i32>) -> Result<(), ApiError> {
        let credit_id = require(credit_id, "crédito")?;
        let input = CreditInput {
            state: Some(CreditState::Pendiente),
            phase: Some(SUBMITTED_PHASE.to_owned()),
            ..CreditInput::default()
        };

        self.credits.update(credit_id, &input).await?;
        Ok(())
    }
}
