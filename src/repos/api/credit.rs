use log::info;

use crate::{
    lifecycle::phases::is_known_phase,
    models::{
        auth::Session,
        credit::{
            Credit, CreditFilters, CreditInput, CreditState, Guarantor, GuarantorInput,
            PhaseTransitionEvent,
        },
        pagination::Paginated,
    },
    policy::{authorize, Capability},
    repos::api::{ApiClient, ApiError, Resource},
};

pub const CREDITS_PATH: &str = "/api/Creditos/creditos/";
pub const GUARANTORS_PATH: &str = "/api/Creditos/garantes/";

pub struct CreditService {
    pub api: ApiClient,
    pub session: Session,
}

impl CreditService {
    fn credits(&self) -> Resource<'_, Credit> {
        Resource::new(&self.api, &self.session, CREDITS_PATH)
    }

    fn guarantors(&self) -> Resource<'_, Guarantor> {
        Resource::new(&self.api, &self.session, GUARANTORS_PATH)
    }

    pub async fn list(&self, filters: &CreditFilters) -> Result<Paginated<Credit>, ApiError> {
        authorize(&self.session, Capability::ViewCredits)?;
        self.credits().list(&filters.to_query()).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Credit, ApiError> {
        authorize(&self.session, Capability::ViewCredits)?;
        self.credits().get(id).await
    }

    pub async fn create(&self, input: &CreditInput) -> Result<Credit, ApiError> {
        authorize(&self.session, Capability::ManageCredits)?;
        check_phase(input)?;
        self.credits().create(input).await
    }

    /// Approving or rejecting needs more than plain edit rights
    pub async fn update(&self, id: i32, input: &CreditInput) -> Result<Credit, ApiError> {
        authorize(&self.session, Capability::ManageCredits)?;
        if matches!(
            input.state,
            Some(CreditState::Aprobado | CreditState::Rechazado | CreditState::Desembolsado)
        ) {
            authorize(&self.session, Capability::ApproveCredits)?;
        }
        check_phase(input)?;

        let credit = self.credits().update(id, input).await?;
        if let Some(state) = &input.state {
            info!("credit {id} moved to {}", state.as_str());
        }
        Ok(credit)
    }

    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        authorize(&self.session, Capability::ManageCredits)?;
        self.credits().delete(id).await
    }

    /// Every phase transition of one credit, in whatever order the upstream keeps them
    pub async fn history(&self, id: i32) -> Result<Vec<PhaseTransitionEvent>, ApiError> {
        authorize(&self.session, Capability::ViewCredits)?;
        let path = format!("{}historial/", self.credits().detail_path(id));
        self.api
            .list_all::<PhaseTransitionEvent>(&self.session, &path, &[])
            .await
    }

    pub async fn guarantors_of(&self, credit_id: i32) -> Result<Vec<Guarantor>, ApiError> {
        authorize(&self.session, Capability::ViewCredits)?;
        let query = [("credito".to_owned(), credit_id.to_string())];
        self.guarantors().list_all(&query).await
    }

    pub async fn create_guarantor(&self, input: &GuarantorInput) -> Result<Guarantor, ApiError> {
        authorize(&self.session, Capability::ManageCredits)?;
        self.guarantors().create(input).await
    }

    pub async fn update_guarantor(
        &self,
        id: i32,
        input: &GuarantorInput,
    ) -> Result<Guarantor, ApiError> {
        authorize(&self.session, Capability::ManageCredits)?;
        self.guarantors().update(id, input).await
    }
}

fn check_phase(input: &CreditInput) -> Result<(), ApiError> {
    match &input.phase {
        Some(phase) if !is_known_phase(phase) => Err(ApiError::Validation(format!(
            "La fase {phase} no existe"
        ))),
        _ => Ok(()),
    }
}
