use crate::{
    endpoints::handlers::configs::schema::GeneralContext,
    models::{
        client::{
            Client, ClientInput, Documentation, DocumentationInput, Domicile, DomicileInput,
            Employment, EmploymentInput,
        },
        graphql::ClientPage,
    },
    repos::api::ApiError,
};

pub struct ClientQuery;

#[juniper::graphql_object(
    Context = GeneralContext,
)]
impl ClientQuery {
    /// `search` is matched by the backend against names and phone
    pub async fn clients(
        context: &GeneralContext,
        search: Option<String>,
        page: Option<i32>,
    ) -> Result<ClientPage, ApiError> {
        let page = context
            .client_service()
            .list(search.as_deref(), page)
            .await?;

        Ok(page.into())
    }

    pub async fn client(context: &GeneralContext, id: i32) -> Result<Client, ApiError> {
        context.client_service().get(id).await
    }

    pub async fn documentation(
        context: &GeneralContext,
        client_id: i32,
    ) -> Result<Vec<Documentation>, ApiError> {
        context.client_service().documentation_of(client_id).await
    }

    pub async fn employment(
        context: &GeneralContext,
        client_id: i32,
    ) -> Result<Vec<Employment>, ApiError> {
        context.client_service().employment_of(client_id).await
    }

    pub async fn domiciles(
        context: &GeneralContext,
        client_id: i32,
    ) -> Result<Vec<Domicile>, ApiError> {
        context.client_service().domiciles_of(client_id).await
    }
}

pub struct ClientMutation;

#[juniper::graphql_object(
    Context = GeneralContext,
)]
impl ClientMutation {
    pub async fn create_client(
        context: &GeneralContext,
        input: ClientInput,
    ) -> Result<Client, ApiError> {
        context.client_service().create(&input).await
    }

    pub async fn update_client(
        context: &GeneralContext,
        id: i32,
        input: ClientInput,
    ) -> Result<Client, ApiError> {
        context.client_service().update(id, &input).await
    }

    pub async fn delete_client(context: &GeneralContext, id: i32) -> Result<bool, ApiError> {
        context.client_service().delete(id).await?;
        Ok(true)
    }

    pub async fn create_documentation(
        context: &GeneralContext,
        input: DocumentationInput,
    ) -> Result<Documentation, ApiError> {
        context.client_service().create_documentation(&input).await
    }

    pub async fn update_documentation(
        context: &GeneralContext,
        id: i32,
        input: DocumentationInput,
    ) -> Result<Documentation, ApiError> {
        context.client_service().update_documentation(id, &input).await
    }

    pub async fn delete_documentation(context: &GeneralContext, id: i32) -> Result<bool, ApiError> {
        context.client_service().delete_documentation(id).await?;
        Ok(true)
    }

    pub async fn create_employment(
        context: &GeneralContext,
        input: EmploymentInput,
    ) -> Result<Employment, ApiError> {
        context.client_service().create_employment(&input).await
    }

    pub async fn update_employment(
        context: &GeneralContext,
        id: i32,
        input: EmploymentInput,
    ) -> Result<Employment, ApiError> {
        context.client_service().update_employment(id, &input).await
    }

    pub async fn delete_employment(context: &GeneralContext, id: i32) -> Result<bool, ApiError> {
        context.client_service().delete_employment(id).await?;
        Ok(true)
    }

    pub async fn create_domicile(
        context: &GeneralContext,
        input: DomicileInput,
    ) -> Result<Domicile, ApiError> {
        context.client_service().create_domicile(&input).await
    }

    pub async fn update_domicile(
        context: &GeneralContext,
        id: i32,
        input: DomicileInput,
    ) -> Result<Domicile, ApiError> {
        context.client_service().update_domicile(id, &input).await
    }

    pub async fn delete_domicile(context: &GeneralContext, id: i32) -> Result<bool, ApiError> {
        context.client_service().delete_domicile(id).await?;
        Ok(true)
    }
}
