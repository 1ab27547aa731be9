use crate::{
    models::{
        auth::Session,
        client::{
            Client, ClientInput, Documentation, DocumentationInput, Domicile, DomicileInput,
            Employment, EmploymentInput,
        },
        pagination::Paginated,
    },
    policy::{authorize, Capability},
    repos::api::{ApiClient, ApiError, Resource},
};

pub const CLIENTS_PATH: &str = "/api/Clientes/clientes/";
pub const DOCUMENTATION_PATH: &str = "/api/Clientes/documentacion/";
pub const EMPLOYMENT_PATH: &str = "/api/Clientes/laboral/";
pub const DOMICILE_PATH: &str = "/api/Clientes/domicilio/";

/// Clients plus their documentation, employment and domicile records. Each
/// record kind is its own upstream collection filtered by `cliente`.
pub struct ClientService {
    pub api: ApiClient,
    pub session: Session,
}

impl ClientService {
    fn resource<T: serde::de::DeserializeOwned>(&self, path: &'static str) -> Resource<'_, T> {
        Resource::new(&self.api, &self.session, path)
    }

    fn by_client(client_id: i32) -> [(String, String); 1] {
        [("cliente".to_owned(), client_id.to_string())]
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        page: Option<i32>,
    ) -> Result<Paginated<Client>, ApiError> {
        authorize(&self.session, Capability::ViewCredits)?;
        let mut query = Vec::new();
        if let Some(search) = search {
            query.push(("search".to_owned(), search.to_owned()));
        }
        if let Some(page) = page {
            query.push(("page".to_owned(), page.to_string()));
        }
        self.resource::<Client>(CLIENTS_PATH).list(&query).await
    }

    pub async fn get(&self, id: i32) -> Result<Client, ApiError> {
        authorize(&self.session, Capability::ViewCredits)?;
        self.resource::<Client>(CLIENTS_PATH).get(id).await
    }

    pub async fn create(&self, input: &ClientInput) -> Result<Client, ApiError> {
        authorize(&self.session, Capability::ManageClients)?;
        self.resource::<Client>(CLIENTS_PATH).create(input).await
    }

    pub async fn update(&self, id: i32, input: &ClientInput) -> Result<Client, ApiError> {
        authorize(&self.session, Capability::ManageClients)?;
        self.resource::<Client>(CLIENTS_PATH).update(id, input).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        authorize(&self.session, Capability::ManageClients)?;
        self.resource::<Client>(CLIENTS_PATH).delete(id).await
    }

    //* Documentation

    pub async fn documentation_of(&self, client_id: i32) -> Result<Vec<Documentation>, ApiError> {
        authorize(&self.session, Capability::ViewCredits)?;
        self.resource::<Documentation>(DOCUMENTATION_PATH)
            .list_all(&Self::by_client(client_id))
            .await
    }

    pub async fn create_documentation(
        &self,
        input: &DocumentationInput,
    ) -> Result<Documentation, ApiError> {
        authorize(&self.session, Capability::ManageClients)?;
        self.resource::<Documentation>(DOCUMENTATION_PATH).create(input).await
    }

    pub async fn update_documentation(
        &self,
        id: i32,
        input: &DocumentationInput,
    ) -> Result<Documentation, ApiError> {
        authorize(&self.session, Capability::ManageClients)?;
        self.resource::<Documentation>(DOCUMENTATION_PATH).update(id, input).await
    }

    pub async fn delete_documentation(&self, id: i32) -> Result<(), ApiError> {
        authorize(&self.session, Capability::ManageClients)?;
        self.resource::<Documentation>(DOCUMENTATION_PATH).delete(id).await
    }

    //* Employment

    pub async fn employment_of(&self, client_id: i32) -> Result<Vec<Employment>, ApiError> {
        authorize(&self.session, Capability::ViewCredits)?;
        self.resource::<Employment>(EMPLOYMENT_PATH)
            .list_all(&Self::by_client(client_id))
            .await
    }

    pub async fn create_employment(&self, input: &EmploymentInput) -> Result<Employment, ApiError> {
        authorize(&self.session, Capability::ManageClients)?;
        self.resource::<Employment>(EMPLOYMENT_PATH).create(input).await
    }

    pub async fn update_employment(
        &self,
        id: i32,
        input: &EmploymentInput,
    ) -> Result<Employment, ApiError> {
        authorize(&self.session, Capability::ManageClients)?;
        self.resource::<Employment>(EMPLOYMENT_PATH).update(id, input).await
    }

    pub async fn delete_employment(&self, id: i32) -> Result<(), ApiError> {
        authorize(&self.session, Capability::ManageClients)?;
        self.resource::<Employment>(EMPLOYMENT_PATH).delete(id).await
    }

    //* Domicile

    pub async fn domiciles_of(&self, client_id: i32) -> Result<Vec<Domicile>, ApiError> {
        authorize(&self.session, Capability::ViewCredits)?;
        self.resource::<Domicile>(DOMICILE_PATH)
            .list_all(&Self::by_client(client_id))
            .await
    }

    pub async fn create_domicile(&self, input: &DomicileInput) -> Result<Domicile, ApiError> {
        authorize(&self.session, Capability::ManageClients)?;
        self.resource::<Domicile>(DOMICILE_PATH).create(input).await
    }

    pub async fn update_domicile(
        &self,
        id: i32,
        input: &DomicileInput,
    ) -> Result<Domicile, ApiError> {
        authorize(&self.session, Capability::ManageClients)?;
        self.resource::<Domicile>(DOMICILE_PATH).update(id, input).await
    }

    pub async fn delete_domicile(&self, id: i32) -> Result<(), ApiError> {
        authorize(&self.session, Capability::ManageClients)?;
        self.resource::<Domicile>(DOMICILE_PATH).delete(id).await
    }
}
