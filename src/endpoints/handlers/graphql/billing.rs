use juniper::EmptyMutation;

use crate::{
    endpoints::handlers::configs::schema::GeneralContext,
    models::{
        graphql::{map_page, InvoicePage, InvoiceView, SubscriptionView},
        GraphQLMappable,
    },
    repos::api::ApiError,
};

pub struct BillingQuery;

#[juniper::graphql_object(
    Context = GeneralContext,
)]
impl BillingQuery {
    /// Current plan of the caller's company. `fromCache` tells whether the
    /// backend was down and the last known copy was served instead.
    pub async fn subscription(context: &GeneralContext) -> Result<SubscriptionView, ApiError> {
        Ok(context
            .billing_service()
            .current_subscription()
            .await?
            .to_graphql_type())
    }

    pub async fn invoices(
        context: &GeneralContext,
        page: Option<i32>,
    ) -> Result<InvoicePage, ApiError> {
        let page = context.billing_service().invoices(page).await?;
        Ok(map_page::<_, InvoiceView>(page).into())
    }
}

pub type BillingMutation = EmptyMutation<GeneralContext>;
