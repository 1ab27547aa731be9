use crate::{
    endpoints::handlers::configs::schema::GeneralContext,
    lifecycle::{
        phases::{phase_metadata, Phase, PHASES},
        timeline::{Timeline, TimelineOrder},
    },
    models::{
        credit::{CreditFilters, CreditInput, Guarantor, GuarantorInput},
        graphql::{map_page, CreditPage, CreditView, TimelineObject},
        GraphQLMappable,
    },
    repos::api::ApiError,
};

pub struct CreditQuery;

#[juniper::graphql_object(
    Context = GeneralContext,
)]
impl CreditQuery {
    /// Credits visible to the caller's company, one page at a time
    pub async fn credits(
        context: &GeneralContext,
        filters: Option<CreditFilters>,
    ) -> Result<CreditPage, ApiError> {
        let page = context
            .credit_service()
            .list(&filters.unwrap_or_default())
            .await?;

        Ok(map_page::<_, CreditView>(page).into())
    }

    pub async fn credit(context: &GeneralContext, id: i32) -> Result<CreditView, ApiError> {
        Ok(context.credit_service().get_by_id(id).await?.to_graphql_type())
    }

    /// Phase history of a credit, ready to draw. `expanded` lists the events
    /// whose details are open.
    pub async fn credit_timeline(
        context: &GeneralContext,
        id: i32,
        order: Option<TimelineOrder>,
        expanded: Option<Vec<i32>>,
    ) -> Result<TimelineObject, ApiError> {
        let service = context.credit_service();
        let credit = service.get_by_id(id).await?;
        let events = service.history(id).await?;

        let view = Timeline::with_expanded(expanded.unwrap_or_default()).render(
            &events,
            &credit.phase,
            credit.state,
            order.unwrap_or_default(),
        );

        Ok(TimelineObject::from(&view))
    }

    pub async fn guarantors(
        context: &GeneralContext,
        credit_id: i32,
    ) -> Result<Vec<Guarantor>, ApiError> {
        context.credit_service().guarantors_of(credit_id).await
    }

    /// The eight phases in order
    pub fn phases() -> Vec<Phase> {
        PHASES.iter().copied().map(Phase::from).collect()
    }

    /// Never fails, unknown ids get the generic phase
    pub fn phase(id: String) -> Phase {
        phase_metadata(&id).into()
    }
}

pub struct CreditMutation;

#[juniper::graphql_object(
    Context = GeneralContext,
)]
impl CreditMutation {
    pub async fn create_credit(
        context: &GeneralContext,
        input: CreditInput,
    ) -> Result<CreditView, ApiError> {
        Ok(context.credit_service().create(&input).await?.to_graphql_type())
    }

    pub async fn update_credit(
        context: &GeneralContext,
        id: i32,
        input: CreditInput,
    ) -> Result<CreditView, ApiError> {
        Ok(context
            .credit_service()
            .update(id, &input)
            .await?
            .to_graphql_type())
    }

    pub async fn delete_credit(context: &GeneralContext, id: i32) -> Result<bool, ApiError> {
        context.credit_service().delete(id).await?;
        Ok(true)
    }

    pub async fn create_guarantor(
        context: &GeneralContext,
        input: GuarantorInput,
    ) -> Result<Guarantor, ApiError> {
        context.credit_service().create_guarantor(&input).await
    }

    pub async fn update_guarantor(
        context: &GeneralContext,
        id: i32,
        input: GuarantorInput,
    ) -> Result<Guarantor, ApiError> {
        context.credit_service().update_guarantor(id, &input).await
    }
}
