use log::warn;

use crate::{
    models::{
        auth::Session,
        billing::{Invoice, Subscription},
        pagination::Paginated,
    },
    policy::{authorize, Capability},
    repos::api::{ApiClient, ApiError},
};

pub const SUBSCRIPTION_PATH: &str = "/api/Suscripciones/suscripcion/actual/";
pub const INVOICES_PATH: &str = "/api/Suscripciones/facturas/";

/// Last known subscription per tenant, read when the upstream can't answer
pub trait SubscriptionCache: Send + Sync {
    fn load(&self, tenant: &str) -> Result<Option<Subscription>, ApiError>;
    fn save(&self, tenant: &str, subscription: &Subscription) -> Result<(), ApiError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct CurrentSubscription {
    pub subscription: Subscription,
    /// True when the upstream was down and this came from the cache
    pub from_cache: bool,
}

pub struct BillingService<C: SubscriptionCache> {
    pub api: ApiClient,
    pub session: Session,
    pub cache: C,
}

impl<C: SubscriptionCache> BillingService<C> {
    pub async fn current_subscription(&self) -> Result<CurrentSubscription, ApiError> {
        authorize(&self.session, Capability::ManageBilling)?;
        let tenant = self.session.tenant_or_default().to_owned();

        match self
            .api
            .get::<Subscription>(&self.session, SUBSCRIPTION_PATH, &[])
            .await
        {
            Ok(subscription) => {
                // a cache write failing shouldn't fail a good answer
                if let Err(err) = self.cache.save(&tenant, &subscription) {
                    warn!("couldn't cache subscription for {tenant}: {err}");
                }
                Ok(CurrentSubscription {
                    subscription,
                    from_cache: false,
                })
            }
            Err(err) if err.is_unavailable() => match self.cache.load(&tenant) {
                Ok(Some(subscription)) => {
                    warn!("serving cached subscription for {tenant}: {err}");
                    Ok(CurrentSubscription {
                        subscription,
                        from_cache: true,
                    })
                }
                Ok(None) => Err(err),
                Err(cache_err) => {
                    warn!("subscription cache unreadable for {tenant}: {cache_err}");
                    Err(err)
                }
            },
            Err(err) => Err(err),
        }
    }

    pub async fn invoices(&self, page: Option<i32>) -> Result<Paginated<Invoice>, ApiError> {
        authorize(&self.session, Capability::ManageBilling)?;
        let query: Vec<(String, String)> = page
            .map(|page| vec![("page".to_owned(), page.to_string())])
            .unwrap_or_default();
        self.api.list(&self.session, INVOICES_PATH, &query).await
    }
}
