//! Thin clients over the upstream REST resources. Every call is a single
//! request: no retries, no caching, no concurrency control.

use std::{collections::HashSet, marker::PhantomData, time::Duration};

use actix_web::http::StatusCode as HttpStatus;
use juniper::{FieldError, IntoFieldError, Object, ScalarValue, Value};
use log::{debug, warn};
use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::models::{
    auth::Session,
    pagination::{ListResponse, Paginated},
};

pub mod audit;
pub mod billing;
pub mod client;
pub mod credit;
pub mod payment;
pub mod user;
pub mod wizard;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Debe iniciar sesión para continuar")]
    Unauthenticated,
    #[error("Sesión expirada o credenciales inválidas{}", detail(.body))]
    Unauthorized { body: Option<String> },
    #[error("No tiene permisos para realizar esta acción{}", detail(.body))]
    Forbidden { body: Option<String> },
    #[error("El recurso solicitado no existe{}", detail(.body))]
    NotFound { body: Option<String> },
    #[error("La solicitud fue rechazada ({status}){}", detail(.body))]
    Rejected { status: u16, body: Option<String> },
    #[error("Error interno del servidor ({status}){}", detail(.body))]
    Server { status: u16, body: Option<String> },
    #[error("No se pudo contactar al servidor: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Respuesta inesperada del servidor: {0}")]
    Decode(String),
    #[error("{0}")]
    Validation(String),
    #[error("Error de almacenamiento: {0}")]
    Store(String),
}

fn detail(body: &Option<String>) -> String {
    match body {
        Some(body) if !body.trim().is_empty() => format!(": {}", body.trim()),
        _ => String::new(),
    }
}

impl ApiError {
    /// Sorts a non-success upstream answer by status code
    pub fn from_status(status: StatusCode, body: String) -> ApiError {
        let body = Some(body).filter(|body| !body.trim().is_empty());

        match status.as_u16() {
            401 => ApiError::Unauthorized { body },
            403 => ApiError::Forbidden { body },
            404 => ApiError::NotFound { body },
            code if code >= 500 => ApiError::Server { status: code, body },
            code => ApiError::Rejected { status: code, body },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::Unauthorized { .. } => "UNAUTHORIZED",
            ApiError::Forbidden { .. } => "FORBIDDEN",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Rejected { .. } => "REJECTED",
            ApiError::Server { .. } => "SERVER_ERROR",
            ApiError::Transport(_) => "TRANSPORT",
            ApiError::Decode(_) => "DECODE",
            ApiError::Validation(_) => "VALIDATION",
            ApiError::Store(_) => "STORE",
        }
    }

    /// Raw upstream body, when the upstream sent one
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { body }
            | ApiError::Forbidden { body }
            | ApiError::NotFound { body }
            | ApiError::Rejected { body, .. }
            | ApiError::Server { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Worth falling back to cached data for
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Server { .. })
    }

    pub fn http_status(&self) -> HttpStatus {
        match self {
            ApiError::Unauthenticated | ApiError::Unauthorized { .. } => HttpStatus::UNAUTHORIZED,
            ApiError::Forbidden { .. } => HttpStatus::FORBIDDEN,
            ApiError::NotFound { .. } => HttpStatus::NOT_FOUND,
            ApiError::Rejected { status, .. } => {
                HttpStatus::from_u16(*status).unwrap_or(HttpStatus::BAD_REQUEST)
            }
            ApiError::Validation(_) => HttpStatus::BAD_REQUEST,
            ApiError::Server { .. } | ApiError::Transport(_) | ApiError::Decode(_) => {
                HttpStatus::BAD_GATEWAY
            }
            ApiError::Store(_) => HttpStatus::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<S: ScalarValue> IntoFieldError<S> for ApiError {
    fn into_field_error(self) -> FieldError<S> {
        let mut extensions = Object::with_capacity(2);
        extensions.add_field("code", Value::scalar(self.code().to_owned()));
        if let Some(body) = self.body() {
            extensions.add_field("body", Value::scalar(body.to_owned()));
        }

        FieldError::new(self.to_string(), Value::object(extensions))
    }
}

/// Shared HTTP client for the upstream backend. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tenant_header: String,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        tenant_header: &str,
        timeout: Duration,
    ) -> Result<ApiClient, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            tenant_header: tenant_header.to_owned(),
        })
    }

    pub fn tenant_header(&self) -> &str {
        &self.tenant_header
    }

    fn request(&self, session: &Session, method: Method, path: &str) -> RequestBuilder {
        self.request_url(session, method, format!("{}{}", self.base_url, path))
    }

    fn request_url(&self, session: &Session, method: Method, url: String) -> RequestBuilder {
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(token) = &session.token {
            builder = builder.header(AUTHORIZATION, format!("Token {token}"));
        }
        if let Some(tenant) = &session.tenant {
            builder = builder.header(self.tenant_header.as_str(), tenant.as_str());
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = builder.send().await.map_err(|err| {
            warn!("upstream unreachable: {err}");
            ApiError::Transport(err)
        })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body).into_owned();
            warn!("upstream answered {status}: {text}");
            return Err(ApiError::from_status(status, text));
        }

        Ok(body.to_vec())
    }

    fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
        serde_json::from_slice(body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let body = self
            .send(self.request(session, Method::GET, path).query(query))
            .await?;
        Self::decode(&body)
    }

    /// Bare arrays and `{results, count, next, previous}` both end up paginated
    pub async fn list<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Paginated<T>, ApiError> {
        let response = self.get::<ListResponse<T>>(session, path, query).await?;
        Ok(response.into())
    }

    /// Every item of a listing, following `next` until the upstream runs out of pages
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Vec<T>, ApiError> {
        let mut page = self.list::<T>(session, path, query).await?;
        let mut items = std::mem::take(&mut page.results);
        let mut visited = HashSet::new();

        while let Some(next) = page.next.take() {
            let url = self.absolute(&next);
            if !visited.insert(url.clone()) {
                warn!("upstream pagination loops back to {url}");
                break;
            }

            let body = self
                .send(self.request_url(session, Method::GET, url))
                .await?;
            page = Self::decode::<ListResponse<T>>(&body)?.into();
            items.append(&mut page.results);
        }

        Ok(items)
    }

    /// `next` links are usually absolute, a bare path is taken as relative to the backend
    fn absolute(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_owned()
        } else {
            format!("{}{}", self.base_url, link)
        }
    }

    pub async fn post<B, T>(&self, session: &Session, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .send(self.request(session, Method::POST, path).json(body))
            .await?;
        Self::decode(&body)
    }

    /// POST whose answer we don't care about
    pub async fn post_empty(&self, session: &Session, path: &str) -> Result<(), ApiError> {
        self.send(self.request(session, Method::POST, path)).await?;
        Ok(())
    }

    pub async fn patch<B, T>(&self, session: &Session, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .send(self.request(session, Method::PATCH, path).json(body))
            .await?;
        Self::decode(&body)
    }

    pub async fn delete(&self, session: &Session, path: &str) -> Result<(), ApiError> {
        self.send(self.request(session, Method::DELETE, path))
            .await?;
        Ok(())
    }
}

/// CRUD over one REST collection, e.g. `/api/Clientes/clientes/`
pub struct Resource<'a, T> {
    api: &'a ApiClient,
    session: &'a Session,
    path: &'static str,
    marker: PhantomData<fn() -> T>,
}

impl<'a, T: DeserializeOwned> Resource<'a, T> {
    pub fn new(api: &'a ApiClient, session: &'a Session, path: &'static str) -> Resource<'a, T> {
        Resource {
            api,
            session,
            path,
            marker: PhantomData,
        }
    }

    pub fn detail_path(&self, id: i32) -> String {
        format!("{}{}/", self.path, id)
    }

    pub async fn list(&self, query: &[(String, String)]) -> Result<Paginated<T>, ApiError> {
        self.api.list(self.session, self.path, query).await
    }

    pub async fn list_all(&self, query: &[(String, String)]) -> Result<Vec<T>, ApiError> {
        self.api.list_all(self.session, self.path, query).await
    }

    pub async fn get(&self, id: i32) -> Result<T, ApiError> {
        self.api.get(self.session, &self.detail_path(id), &[]).await
    }

    pub async fn create<B: Serialize + Sync + ?Sized>(&self, input: &B) -> Result<T, ApiError> {
        self.api.post(self.session, self.path, input).await
    }

    /// Partial update, only the fields present in `input` change
    pub async fn update<B: Serialize + Sync + ?Sized>(
        &self,
        id: i32,
        input: &B,
    ) -> Result<T, ApiError> {
        self.api.patch(self.session, &self.detail_path(id), input).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        self.api.delete(self.session, &self.detail_path(id)).await
    }
}
