use juniper::{GraphQLInputObject, GraphQLObject};
use serde_json::{Map, Value};

use crate::{
    lifecycle::{
        phases::{phase_metadata, Phase},
        timeline::{TimelineBody, TimelineRow, TimelineView},
        wizard::{Wizard, WizardStep},
    },
    models::{
        audit::AuditEntry,
        auth::User,
        billing::{Invoice, Subscription},
        client::Client,
        credit::{Credit, CreditState},
        pagination::Paginated,
        payload,
        payment::{Payment, PaymentMethod, PaymentStatus},
        GraphQLMappable,
    },
    repos::api::billing::CurrentSubscription,
};

#[derive(Clone, GraphQLObject, Debug, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

#[derive(Clone, GraphQLInputObject, Debug)]
pub struct KeyValueInput {
    pub key: String,
    pub value: String,
}

fn key_values(map: &Map<String, Value>) -> Vec<KeyValue> {
    map.iter()
        .map(|(key, value)| KeyValue {
            key: key.to_owned(),
            value: payload::display_value(value),
        })
        .collect()
}

#[derive(Clone, GraphQLObject, Debug)]
pub struct CreditView {
    pub id: i32,
    pub amount: f64,
    pub state: CreditState,
    pub phase: Phase,
    pub client_id: i32,
    pub created_at: Option<String>,
    pub is_terminal: bool,
}

impl GraphQLMappable<CreditView> for Credit {
    fn to_graphql_type(&self) -> CreditView {
        CreditView {
            id: self.id,
            amount: self.amount,
            state: self.state,
            phase: phase_metadata(&self.phase).into(),
            client_id: self.client_id,
            created_at: self.created_at.map(|date| date.to_rfc3339()),
            is_terminal: self.state.is_terminal(),
        }
    }
}

#[derive(Clone, GraphQLObject, Debug)]
pub struct PaymentView {
    pub id: i32,
    pub credit_id: i32,
    pub sequence: i32,
    pub scheduled_amount: f64,
    pub paid_amount: Option<f64>,
    /// Scheduled amount plus overdue interest
    pub amount_due: f64,
    pub due_date: String,
    pub paid_at: Option<String>,
    pub status: PaymentStatus,
    pub method: Option<PaymentMethod>,
    pub transaction_reference: Option<String>,
    pub days_overdue: i32,
    pub overdue_interest: f64,
}

impl GraphQLMappable<PaymentView> for Payment {
    fn to_graphql_type(&self) -> PaymentView {
        PaymentView {
            id: self.id,
            credit_id: self.credit_id,
            sequence: self.sequence,
            scheduled_amount: self.scheduled_amount,
            paid_amount: self.paid_amount,
            amount_due: self.amount_due(),
            due_date: self.due_date.format("%Y-%m-%d").to_string(),
            paid_at: self.paid_at.map(|date| date.to_rfc3339()),
            status: self.status,
            method: self.method,
            transaction_reference: self.transaction_reference.clone(),
            days_overdue: self.days_overdue,
            overdue_interest: self.overdue_interest.unwrap_or(0.),
        }
    }
}

#[derive(Clone, GraphQLObject, Debug)]
pub struct AuditEntryView {
    pub id: i32,
    pub user: String,
    pub action: String,
    pub model: String,
    pub object_id: Option<String>,
    pub timestamp: String,
    pub changes: Vec<KeyValue>,
}

impl GraphQLMappable<AuditEntryView> for AuditEntry {
    fn to_graphql_type(&self) -> AuditEntryView {
        AuditEntryView {
            id: self.id,
            user: self.user.to_owned(),
            action: self.action.to_owned(),
            model: self.model.to_owned(),
            object_id: self.object_id.clone(),
            timestamp: self.timestamp.to_rfc3339(),
            changes: key_values(&self.changes),
        }
    }
}

#[derive(Clone, GraphQLObject, Debug)]
pub struct SubscriptionView {
    pub id: i32,
    pub plan: String,
    pub status: String,
    pub starts_on: String,
    pub ends_on: Option<String>,
    pub amount: f64,
    /// The upstream was unreachable, this is the last copy we saw
    pub from_cache: bool,
}

impl GraphQLMappable<SubscriptionView> for CurrentSubscription {
    fn to_graphql_type(&self) -> SubscriptionView {
        let subscription: &Subscription = &self.subscription;
        SubscriptionView {
            id: subscription.id,
            plan: subscription.plan.to_owned(),
            status: subscription.status.to_owned(),
            starts_on: subscription.starts_on.format("%Y-%m-%d").to_string(),
            ends_on: subscription
                .ends_on
                .map(|date| date.format("%Y-%m-%d").to_string()),
            amount: subscription.amount,
            from_cache: self.from_cache,
        }
    }
}

#[derive(Clone, GraphQLObject, Debug)]
pub struct InvoiceView {
    pub id: i32,
    pub number: String,
    pub amount: f64,
    pub status: String,
    pub issued_on: String,
}

impl GraphQLMappable<InvoiceView> for Invoice {
    fn to_graphql_type(&self) -> InvoiceView {
        InvoiceView {
            id: self.id,
            number: self.number.to_owned(),
            amount: self.amount,
            status: self.status.to_owned(),
            issued_on: self.issued_on.format("%Y-%m-%d").to_string(),
        }
    }
}

//* Timeline

#[derive(Clone, GraphQLObject, Debug)]
pub struct TimelineEventView {
    pub event_id: i32,
    pub from: Option<Phase>,
    pub to: Phase,
    pub timestamp: String,
    pub user: String,
    pub description: String,
    pub expanded: bool,
    pub details: Vec<KeyValue>,
}

impl From<&TimelineRow> for TimelineEventView {
    fn from(row: &TimelineRow) -> Self {
        TimelineEventView {
            event_id: row.event_id,
            from: row.from.map(Phase::from),
            to: row.to.into(),
            timestamp: row.timestamp.to_owned(),
            user: row.user.to_owned(),
            description: row.description.to_owned(),
            expanded: row.expanded,
            details: row
                .details
                .iter()
                .map(|(key, value)| KeyValue {
                    key: key.to_owned(),
                    value: value.to_owned(),
                })
                .collect(),
        }
    }
}

#[derive(Clone, GraphQLObject, Debug)]
pub struct TimelineObject {
    pub current_phase: Phase,
    pub state: CreditState,
    /// Set only when there is nothing to show
    pub empty_message: Option<String>,
    pub events: Vec<TimelineEventView>,
}

impl From<&TimelineView> for TimelineObject {
    fn from(view: &TimelineView) -> Self {
        let empty_message = match &view.body {
            TimelineBody::Empty { message } => Some(message.to_string()),
            TimelineBody::Events(_) => None,
        };

        TimelineObject {
            current_phase: view.header.current_phase.into(),
            state: view.header.state,
            empty_message,
            events: view.rows().iter().map(TimelineEventView::from).collect(),
        }
    }
}

//* Wizard

#[derive(Clone, GraphQLObject, Debug)]
pub struct WizardStepView {
    pub step: WizardStep,
    pub index: i32,
    pub title: String,
    pub completed: bool,
    pub current: bool,
    pub required_fields: Vec<String>,
}

#[derive(Clone, GraphQLObject, Debug)]
pub struct WizardView {
    pub id: String,
    pub current_step: WizardStep,
    pub step_index: i32,
    pub steps: Vec<WizardStepView>,
    /// Draft of the current step
    pub values: Vec<KeyValue>,
    pub client_id: Option<i32>,
    pub credit_id: Option<i32>,
    pub last_error: Option<String>,
    pub submitted: bool,
}

impl WizardView {
    pub fn new(id: &str, wizard: &Wizard) -> WizardView {
        let steps = WizardStep::ALL
            .iter()
            .map(|step| WizardStepView {
                step: *step,
                index: step.index() as i32,
                title: step.title().to_owned(),
                completed: wizard.is_completed(*step),
                current: wizard.current() == *step,
                required_fields: step
                    .required_fields()
                    .iter()
                    .map(|field| field.to_string())
                    .collect(),
            })
            .collect();

        let values = wizard
            .current_values()
            .map(|values| {
                values
                    .iter()
                    .map(|(key, value)| KeyValue {
                        key: key.to_owned(),
                        value: value.to_owned(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        WizardView {
            id: id.to_owned(),
            current_step: wizard.current(),
            step_index: wizard.step_index() as i32,
            steps,
            values,
            client_id: wizard.client_id(),
            credit_id: wizard.credit_id(),
            last_error: wizard.last_error().map(str::to_owned),
            submitted: wizard.is_submitted(),
        }
    }
}

//* Pages

/// One GraphQL page type per listed model, juniper objects can't be generic
macro_rules! page_object {
    ($page:ident, $item:ty) => {
        #[derive(Clone, GraphQLObject, Debug)]
        pub struct $page {
            pub results: Vec<$item>,
            pub count: i32,
            pub next: Option<String>,
            pub previous: Option<String>,
        }

        impl From<Paginated<$item>> for $page {
            fn from(page: Paginated<$item>) -> Self {
                $page {
                    count: page.count as i32,
                    results: page.results,
                    next: page.next,
                    previous: page.previous,
                }
            }
        }
    };
}

page_object!(CreditPage, CreditView);
page_object!(PaymentPage, PaymentView);
page_object!(ClientPage, Client);
page_object!(UserPage, User);
page_object!(AuditPage, AuditEntryView);
page_object!(InvoicePage, InvoiceView);

/// Maps every item of a wire page to its GraphQL shape
pub fn map_page<T, V>(page: Paginated<T>) -> Paginated<V>
where
    T: GraphQLMappable<V>,
{
    page.map(|item| item.to_graphql_type())
}
