use crate::{
    endpoints::handlers::configs::schema::GeneralContext,
    models::{
        graphql::{map_page, PaymentPage, PaymentView},
        payment::{InstallmentPaymentInput, PaymentFilters},
        GraphQLMappable,
    },
    repos::api::ApiError,
};

pub struct PaymentQuery;

#[juniper::graphql_object(
    Context = GeneralContext,
)]
impl PaymentQuery {
    /// Installments, filtered by credit or status
    pub async fn payments(
        context: &GeneralContext,
        filters: Option<PaymentFilters>,
    ) -> Result<PaymentPage, ApiError> {
        let page = context
            .payment_service()
            .list(&filters.unwrap_or_default())
            .await?;

        Ok(map_page::<_, PaymentView>(page).into())
    }

    pub async fn payment(context: &GeneralContext, id: i32) -> Result<PaymentView, ApiError> {
        Ok(context.payment_service().get(id).await?.to_graphql_type())
    }
}

pub struct PaymentMutation;

#[juniper::graphql_object(
    Context = GeneralContext,
)]
impl PaymentMutation {
    /// Pays a pending installment in full, partial amounts are rejected
    pub async fn pay_installment(
        context: &GeneralContext,
        input: InstallmentPaymentInput,
    ) -> Result<PaymentView, ApiError> {
        Ok(context
            .payment_service()
            .process_installment(&input)
            .await?
            .to_graphql_type())
    }
}
