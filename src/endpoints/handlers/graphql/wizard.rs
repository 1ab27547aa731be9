use log::{info, warn};

use crate::{
    endpoints::handlers::configs::schema::GeneralContext,
    lifecycle::wizard::{Progress, StepValues, WizardError, WizardStep},
    models::graphql::{KeyValueInput, WizardView},
    policy::{authorize, Capability},
    repos::api::ApiError,
};

fn rejected(err: WizardError) -> ApiError {
    ApiError::Validation(err.to_string())
}

pub struct WizardQuery;

#[juniper::graphql_object(
    Context = GeneralContext,
)]
impl WizardQuery {
    pub fn wizard(context: &GeneralContext, id: String) -> Result<WizardView, ApiError> {
        let token = context.token()?;
        let wizard = context.wizard_repo().load(token, &id)?;
        Ok(WizardView::new(&id, &wizard))
    }

    /// Unfinished applications of the current session
    pub fn wizards(context: &GeneralContext) -> Result<Vec<WizardView>, ApiError> {
        let token = context.token()?;
        let wizards = context.wizard_repo().list(token)?;

        Ok(wizards
            .iter()
            .map(|(id, wizard)| WizardView::new(id, wizard))
            .collect())
    }
}

pub struct WizardMutation;

#[juniper::graphql_object(
    Context = GeneralContext,
)]
impl WizardMutation {
    pub fn start_wizard(context: &GeneralContext) -> Result<WizardView, ApiError> {
        authorize(&context.session, Capability::ManageCredits)?;
        let token = context.token()?;

        let (id, wizard) = context.wizard_repo().create(token)?;
        Ok(WizardView::new(&id, &wizard))
    }

    /// Merges form values into the draft of the current step
    pub fn set_wizard_values(
        context: &GeneralContext,
        id: String,
        values: Vec<KeyValueInput>,
    ) -> Result<WizardView, ApiError> {
        let token = context.token()?;
        let repo = context.wizard_repo();
        let mut wizard = repo.load(token, &id)?;

        let values: StepValues = values
            .into_iter()
            .map(|KeyValueInput { key, value }| (key, value))
            .collect();
        wizard.set_values(values);

        repo.save(token, &id, &wizard)?;
        Ok(WizardView::new(&id, &wizard))
    }

    /// Saves the current step upstream and moves on. A failed save is not an
    /// error here: the wizard stays put and shows it in `lastError`.
    pub async fn submit_wizard_step(
        context: &GeneralContext,
        id: String,
    ) -> Result<WizardView, ApiError> {
        authorize(&context.session, Capability::ManageCredits)?;
        let token = context.token()?;
        let repo = context.wizard_repo();
        let mut wizard = repo.load(token, &id)?;

        match wizard.submit_step(&context.wizard_persister()).await {
            Ok(Progress::Finished) => info!(
                "application {id} sent for review, credit {:?}",
                wizard.credit_id()
            ),
            Ok(Progress::Advanced(step)) => info!("application {id} moved to {}", step.key()),
            Err(WizardError::AlreadySubmitted) => {
                return Err(rejected(WizardError::AlreadySubmitted))
            }
            Err(err) => warn!("application {id} stayed on {}: {err}", wizard.current().key()),
        }

        repo.save(token, &id, &wizard)?;
        Ok(WizardView::new(&id, &wizard))
    }

    pub fn previous_wizard_step(
        context: &GeneralContext,
        id: String,
    ) -> Result<WizardView, ApiError> {
        let token = context.token()?;
        let repo = context.wizard_repo();
        let mut wizard = repo.load(token, &id)?;

        wizard.previous();
        repo.save(token, &id, &wizard)?;
        Ok(WizardView::new(&id, &wizard))
    }

    /// Only to the current step or one before it
    pub fn jump_wizard_step(
        context: &GeneralContext,
        id: String,
        step: WizardStep,
    ) -> Result<WizardView, ApiError> {
        let token = context.token()?;
        let repo = context.wizard_repo();
        let mut wizard = repo.load(token, &id)?;

        wizard.jump_to(step).map_err(rejected)?;
        repo.save(token, &id, &wizard)?;
        Ok(WizardView::new(&id, &wizard))
    }

    /// Throws the draft away, whatever was already saved upstream stays
    pub fn discard_wizard(context: &GeneralContext, id: String) -> Result<bool, ApiError> {
        let token = context.token()?;
        context.wizard_repo().delete(token, &id)?;
        Ok(true)
    }
}
