use crate::{
    endpoints::handlers::configs::schema::GeneralContext,
    models::{
        auth::{Group, GroupInput, Permission, SessionUser, User, UserInput},
        graphql::UserPage,
    },
    policy::{capabilities, Capability},
    repos::api::ApiError,
};

pub struct UserQuery;

#[juniper::graphql_object(
    Context = GeneralContext,
)]
impl UserQuery {
    /// `null` when the request carries no valid session
    pub fn me(context: &GeneralContext) -> Option<SessionUser> {
        context.session.user.clone()
    }

    /// What the UI may show to the caller, empty when logged out
    pub fn my_capabilities(context: &GeneralContext) -> Vec<Capability> {
        context
            .session
            .user
            .as_ref()
            .map(|user| capabilities(user.role))
            .unwrap_or_default()
    }

    pub async fn users(context: &GeneralContext, page: Option<i32>) -> Result<UserPage, ApiError> {
        Ok(context.user_service().list(page).await?.into())
    }

    pub async fn user(context: &GeneralContext, id: i32) -> Result<User, ApiError> {
        context.user_service().get(id).await
    }

    pub async fn groups(context: &GeneralContext) -> Result<Vec<Group>, ApiError> {
        context.user_service().list_groups().await
    }

    pub async fn group(context: &GeneralContext, id: i32) -> Result<Group, ApiError> {
        context.user_service().get_group(id).await
    }

    pub async fn permissions(context: &GeneralContext) -> Result<Vec<Permission>, ApiError> {
        context.user_service().list_permissions().await
    }
}

pub struct UserMutation;

#[juniper::graphql_object(
    Context = GeneralContext,
)]
impl UserMutation {
    pub async fn update_user(
        context: &GeneralContext,
        id: i32,
        input: UserInput,
    ) -> Result<User, ApiError> {
        context.user_service().update(id, &input).await
    }

    /// Refused for the caller's own account
    pub async fn deactivate_user(context: &GeneralContext, id: i32) -> Result<User, ApiError> {
        context.user_service().deactivate(id).await
    }

    pub async fn activate_user(context: &GeneralContext, id: i32) -> Result<User, ApiError> {
        context.user_service().activate(id).await
    }

    pub async fn create_group(
        context: &GeneralContext,
        input: GroupInput,
    ) -> Result<Group, ApiError> {
        context.user_service().create_group(&input).await
    }

    pub async fn update_group(
        context: &GeneralContext,
        id: i32,
        input: GroupInput,
    ) -> Result<Group, ApiError> {
        context.user_service().update_group(id, &input).await
    }

    pub async fn delete_group(context: &GeneralContext, id: i32) -> Result<bool, ApiError> {
        context.user_service().delete_group(id).await?;
        Ok(true)
    }
}
