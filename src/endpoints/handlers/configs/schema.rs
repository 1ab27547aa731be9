use actix_web::web::Data;
use juniper::{EmptySubscription, GraphQLType, GraphQLTypeAsync, RootNode};
use r2d2::Pool;
use redis::Client;

use crate::{
    config::Env,
    models::auth::Session,
    repos::{
        api::{
            audit::AuditService, billing::BillingService, client::ClientService,
            credit::CreditService, payment::PaymentService, user::UserService,
            wizard::CreditWizardPersister, ApiClient, ApiError,
        },
        store::{billing_cache::RedisSubscriptionCache, wizard::WizardRepo},
    },
};

//Context Related
#[derive(Clone)]
pub struct GeneralContext {
    pub pool: Data<Pool<Client>>,
    pub api: Data<ApiClient>,
    pub env: Data<Env>,
    pub session: Session,
}

impl GeneralContext {
    pub fn credit_service(&self) -> CreditService {
        CreditService {
            api: self.api.get_ref().clone(),
            session: self.session.clone(),
        }
    }

    pub fn payment_service(&self) -> PaymentService {
        PaymentService {
            api: self.api.get_ref().clone(),
            session: self.session.clone(),
        }
    }

    pub fn client_service(&self) -> ClientService {
        ClientService {
            api: self.api.get_ref().clone(),
            session: self.session.clone(),
        }
    }

    pub fn user_service(&self) -> UserService {
        UserService {
            api: self.api.get_ref().clone(),
            session: self.session.clone(),
        }
    }

    pub fn audit_service(&self) -> AuditService {
        AuditService {
            api: self.api.get_ref().clone(),
            session: self.session.clone(),
        }
    }

    pub fn billing_service(&self) -> BillingService<RedisSubscriptionCache> {
        BillingService {
            api: self.api.get_ref().clone(),
            session: self.session.clone(),
            cache: RedisSubscriptionCache {
                pool: self.pool.clone(),
                ttl_secs: self.env.billing_cache_ttl_secs,
            },
        }
    }

    pub fn wizard_persister(&self) -> CreditWizardPersister {
        CreditWizardPersister {
            credits: self.credit_service(),
            clients: self.client_service(),
        }
    }

    /// Drafts live as long as the session does
    pub fn wizard_repo(&self) -> WizardRepo {
        WizardRepo {
            pool: self.pool.clone(),
            ttl_secs: self.env.session_ttl_secs,
        }
    }

    /// Token of a logged in caller, needed for anything kept on our side
    pub fn token(&self) -> Result<&str, ApiError> {
        match (&self.session.token, &self.session.user) {
            (Some(token), Some(_)) => Ok(token),
            _ => Err(ApiError::Unauthenticated),
        }
    }
}

impl juniper::Context for GeneralContext {}

//Schema Related
pub type GeneralSchema<Query, Mutation> =
    RootNode<'static, Query, Mutation, EmptySubscription<GeneralContext>>;

pub fn create_schema<Query, Mutation>(
    query: Query,
    mutation: Mutation,
) -> Data<GeneralSchema<Query, Mutation>>
where
    Query: GraphQLTypeAsync<Context = GeneralContext, TypeInfo = ()>
        + GraphQLType<Context = GeneralContext>
        + Send
        + Sync,
    Mutation: GraphQLTypeAsync<Context = GeneralContext, TypeInfo = ()>
        + GraphQLType<Context = GeneralContext>
        + Send
        + Sync,
{
    let schema = RootNode::new(query, mutation, EmptySubscription::new());

    // actix only hands out app data wrapped in Data
    Data::new(schema)
}
