use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

use async_trait::async_trait;
use juniper::GraphQLEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Form values of one step, keyed by the upstream field name
pub type StepValues = BTreeMap<String, String>;

#[derive(
    Clone, Copy, Serialize, Deserialize, GraphQLEnum, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum WizardStep {
    Solicitud,
    Documentacion,
    Laboral,
    Domicilio,
    Garante,
    Revision,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Solicitud,
        WizardStep::Documentacion,
        WizardStep::Laboral,
        WizardStep::Domicilio,
        WizardStep::Garante,
        WizardStep::Revision,
    ];

    /// 1-based, as shown on the step indicators
    pub fn index(&self) -> usize {
        match self {
            WizardStep::Solicitud => 1,
            WizardStep::Documentacion => 2,
            WizardStep::Laboral => 3,
            WizardStep::Domicilio => 4,
            WizardStep::Garante => 5,
            WizardStep::Revision => 6,
        }
    }

    pub fn from_index(index: usize) -> Option<WizardStep> {
        WizardStep::ALL.get(index.checked_sub(1)?).copied()
    }

    pub fn following(&self) -> Option<WizardStep> {
        WizardStep::from_index(self.index() + 1)
    }

    pub fn preceding(&self) -> Option<WizardStep> {
        WizardStep::from_index(self.index() - 1)
    }

    /// Stable key used when drafts are serialized
    pub fn key(&self) -> &'static str {
        match self {
            WizardStep::Solicitud => "solicitud",
            WizardStep::Documentacion => "documentacion",
            WizardStep::Laboral => "laboral",
            WizardStep::Domicilio => "domicilio",
            WizardStep::Garante => "garante",
            WizardStep::Revision => "revision",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Solicitud => "Solicitud",
            WizardStep::Documentacion => "Documentación",
            WizardStep::Laboral => "Laboral",
            WizardStep::Domicilio => "Domicilio",
            WizardStep::Garante => "Garante",
            WizardStep::Revision => "Revisión",
        }
    }

    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            WizardStep::Solicitud => &["nombre", "apellido", "telefono", "monto"],
            WizardStep::Documentacion => &["tipo_documento", "numero_documento"],
            WizardStep::Laboral => &["empresa", "cargo", "ingreso_mensual"],
            WizardStep::Domicilio => &["direccion", "ciudad"],
            WizardStep::Garante => &["nombre", "apellido", "telefono", "relacion"],
            WizardStep::Revision => &[],
        }
    }

    fn amount_fields(&self) -> &'static [&'static str] {
        match self {
            WizardStep::Solicitud => &["monto"],
            WizardStep::Laboral => &["ingreso_mensual"],
            _ => &[],
        }
    }

    /// Checks done before anything is sent upstream
    pub fn validate(&self, values: &StepValues) -> Result<(), WizardError> {
        for field in self.required_fields() {
            let filled = values
                .get(*field)
                .map(|value| !value.trim().is_empty())
                .unwrap_or(false);
            if !filled {
                return Err(WizardError::MissingField { field: *field });
            }
        }

        for field in self.amount_fields() {
            if parse_amount(values, field).is_none() {
                return Err(WizardError::InvalidAmount { field: *field });
            }
        }

        Ok(())
    }
}

/// Positive decimal read from a form value
pub fn parse_amount(values: &StepValues, field: &str) -> Option<f64> {
    values
        .get(field)
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|amount| amount.is_finite() && *amount > 0.)
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WizardError {
    #[error("Falta completar el campo {field}")]
    MissingField { field: &'static str },
    #[error("El campo {field} debe ser un número mayor a cero")]
    InvalidAmount { field: &'static str },
    #[error("No se puede saltar al paso {target}, el paso actual es {current}")]
    ForwardJump { current: usize, target: usize },
    #[error("La solicitud ya fue enviada")]
    AlreadySubmitted,
    #[error("{0}")]
    Persistence(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    Advanced(WizardStep),
    /// `next` was called on the last step
    Finished,
}

/// What a persister gets to work with for one step
#[derive(Clone, Debug)]
pub struct StepContext<'a> {
    pub step: WizardStep,
    pub values: &'a StepValues,
    pub client_id: Option<i32>,
    pub credit_id: Option<i32>,
    /// Set when this step was already saved once, so it gets updated instead
    pub record_id: Option<i32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutcome {
    pub client_id: Option<i32>,
    pub credit_id: Option<i32>,
    pub record_id: Option<i32>,
}

/// A step that failed after part of it was already stored upstream. `saved`
/// holds the ids of what did get stored, so a retry updates instead of creating.
#[derive(Clone, Debug, PartialEq)]
pub struct StepFailure<E> {
    pub error: E,
    pub saved: StepOutcome,
}

impl<E> From<E> for StepFailure<E> {
    fn from(error: E) -> Self {
        StepFailure {
            error,
            saved: StepOutcome::default(),
        }
    }
}

#[async_trait]
pub trait StepPersister {
    type Error: Display + Send;

    async fn persist(
        &self,
        context: StepContext<'_>,
    ) -> Result<StepOutcome, StepFailure<Self::Error>>;

    /// Called once the review step is submitted
    async fn complete(&self, client_id: Option<i32>, credit_id: Option<i32>)
        -> Result<(), Self::Error>;
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Wizard {
    current: WizardStep,
    completed: BTreeSet<WizardStep>,
    values: BTreeMap<String, StepValues>,
    records: BTreeMap<String, i32>,
    client_id: Option<i32>,
    credit_id: Option<i32>,
    last_error: Option<String>,
    submitted: bool,
}

impl Default for Wizard {
    fn default() -> Self {
        Wizard {
            current: WizardStep::Solicitud,
            completed: BTreeSet::new(),
            values: BTreeMap::new(),
            records: BTreeMap::new(),
            client_id: None,
            credit_id: None,
            last_error: None,
            submitted: false,
        }
    }
}

impl Wizard {
    pub fn new() -> Wizard {
        Wizard::default()
    }

    pub fn current(&self) -> WizardStep {
        self.current
    }

    pub fn step_index(&self) -> usize {
        self.current.index()
    }

    pub fn is_completed(&self, step: WizardStep) -> bool {
        self.completed.contains(&step)
    }

    pub fn values(&self, step: WizardStep) -> Option<&StepValues> {
        self.values.get(step.key())
    }

    pub fn current_values(&self) -> Option<&StepValues> {
        self.values(self.current)
    }

    pub fn client_id(&self) -> Option<i32> {
        self.client_id
    }

    pub fn credit_id(&self) -> Option<i32> {
        self.credit_id
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Merges form values into the current step's draft
    pub fn set_values(&mut self, values: StepValues) {
        self.values
            .entry(self.current.key().to_owned())
            .or_default()
            .extend(values);
    }

    pub fn next(&mut self) -> Progress {
        match self.current.following() {
            Some(step) => {
                self.current = step;
                Progress::Advanced(step)
            }
            None => Progress::Finished,
        }
    }

    /// No-op on the first step
    pub fn previous(&mut self) -> WizardStep {
        if let Some(step) = self.current.preceding() {
            self.current = step;
        }
        self.current
    }

    /// Only backwards, or onto the current step
    pub fn jump_to(&mut self, target: WizardStep) -> Result<WizardStep, WizardError> {
        if target > self.current {
            return Err(WizardError::ForwardJump {
                current: self.current.index(),
                target: target.index(),
            });
        }

        self.current = target;
        Ok(self.current)
    }

    /// Validates and saves the current step. On failure the error is kept on
    /// the wizard and neither the step nor the entered values change.
    pub async fn submit_step<P>(&mut self, persister: &P) -> Result<Progress, WizardError>
    where
        P: StepPersister + Sync,
    {
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }

        let step = self.current;
        let values = self.values.get(step.key()).cloned().unwrap_or_default();

        if let Err(err) = step.validate(&values) {
            self.last_error = Some(err.to_string());
            return Err(err);
        }

        if step == WizardStep::Revision {
            if let Err(err) = persister.complete(self.client_id, self.credit_id).await {
                return Err(self.fail(err));
            }

            self.completed.insert(step);
            self.last_error = None;
            self.submitted = true;
            return Ok(self.next());
        }

        let context = StepContext {
            step,
            values: &values,
            client_id: self.client_id,
            credit_id: self.credit_id,
            record_id: self.records.get(step.key()).copied(),
        };

        let outcome = match persister.persist(context).await {
            Ok(outcome) => outcome,
            Err(StepFailure { error, saved }) => {
                self.keep(step, saved);
                return Err(self.fail(error));
            }
        };

        self.keep(step, outcome);
        self.completed.insert(step);
        self.last_error = None;
        Ok(self.next())
    }

    fn keep(&mut self, step: WizardStep, outcome: StepOutcome) {
        if outcome.client_id.is_some() {
            self.client_id = outcome.client_id;
        }
        if outcome.credit_id.is_some() {
            self.credit_id = outcome.credit_id;
        }
        if let Some(record_id) = outcome.record_id {
            self.records.insert(step.key().to_owned(), record_id);
        }
    }

    fn fail(&mut self, err: impl Display) -> WizardError {
        let message = err.to_string();
        self.last_error = Some(message.to_owned());
        WizardError::Persistence(message)
    }
}
