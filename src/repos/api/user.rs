use log::info;

use crate::{
    models::{
        auth::{Group, GroupInput, LoginInfo, Permission, Session, TokenInfo, User, UserInput},
        pagination::Paginated,
    },
    policy::{authorize, Capability},
    repos::api::{ApiClient, ApiError, Resource},
};

pub const USERS_PATH: &str = "/api/User/user/";
pub const GROUPS_PATH: &str = "/api/User/grupos/";
pub const PERMISSIONS_PATH: &str = "/api/User/permisos/";
pub const LOGIN_PATH: &str = "/api/User/login/";
pub const LOGOUT_PATH: &str = "/api/User/logout/";

/// Exchanges credentials for an upstream token, the session only carries the tenant
pub async fn login(
    api: &ApiClient,
    session: &Session,
    credentials: &LoginInfo,
) -> Result<TokenInfo, ApiError> {
    let token_info: TokenInfo = api.post(session, LOGIN_PATH, credentials).await?;
    info!(
        "user {} logged in as {}",
        token_info.user.username,
        token_info.user.role.as_str()
    );
    Ok(token_info)
}

pub async fn logout(api: &ApiClient, session: &Session) -> Result<(), ApiError> {
    if session.token.is_none() {
        return Err(ApiError::Unauthenticated);
    }
    api.post_empty(session, LOGOUT_PATH).await
}

pub struct UserService {
    pub api: ApiClient,
    pub session: Session,
}

impl UserService {
    fn users(&self) -> Resource<'_, User> {
        Resource::new(&self.api, &self.session, USERS_PATH)
    }

    fn groups(&self) -> Resource<'_, Group> {
        Resource::new(&self.api, &self.session, GROUPS_PATH)
    }

    pub async fn list(&self, page: Option<i32>) -> Result<Paginated<User>, ApiError> {
        authorize(&self.session, Capability::ManageUsers)?;
        let query: Vec<(String, String)> = page
            .map(|page| vec![("page".to_owned(), page.to_string())])
            .unwrap_or_default();
        self.users().list(&query).await
    }

    pub async fn get(&self, id: i32) -> Result<User, ApiError> {
        authorize(&self.session, Capability::ManageUsers)?;
        self.users().get(id).await
    }

    pub async fn update(&self, id: i32, input: &UserInput) -> Result<User, ApiError> {
        let current = authorize(&self.session, Capability::ManageUsers)?;
        if current.id == id && input.is_active == Some(false) {
            return Err(self_deactivation());
        }
        self.users().update(id, input).await
    }

    /// Refused before any request when `id` is the caller itself
    pub async fn deactivate(&self, id: i32) -> Result<User, ApiError> {
        let current = authorize(&self.session, Capability::ManageUsers)?;
        if current.id == id {
            return Err(self_deactivation());
        }

        let input = UserInput {
            is_active: Some(false),
            ..UserInput::default()
        };
        let user = self.users().update(id, &input).await?;
        info!("user {} deactivated by {}", user.username, current.username);
        Ok(user)
    }

    pub async fn activate(&self, id: i32) -> Result<User, ApiError> {
        authorize(&self.session, Capability::ManageUsers)?;
        let input = UserInput {
            is_active: Some(true),
            ..UserInput::default()
        };
        self.users().update(id, &input).await
    }

    //* Groups and permissions

    pub async fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
        authorize(&self.session, Capability::ManageGroups)?;
        self.groups().list_all(&[]).await
    }

    pub async fn get_group(&self, id: i32) -> Result<Group, ApiError> {
        authorize(&self.session, Capability::ManageGroups)?;
        self.groups().get(id).await
    }

    pub async fn create_group(&self, input: &GroupInput) -> Result<Group, ApiError> {
        authorize(&self.session, Capability::ManageGroups)?;
        if input.name.as_deref().map(str::trim).unwrap_or_default().is_empty() {
            return Err(ApiError::Validation(
                "El grupo necesita un nombre".to_owned(),
            ));
        }
        self.groups().create(input).await
    }

    pub async fn update_group(&self, id: i32, input: &GroupInput) -> Result<Group, ApiError> {
        authorize(&self.session, Capability::ManageGroups)?;
        self.groups().update(id, input).await
    }

    pub async fn delete_group(&self, id: i32) -> Result<(), ApiError> {
        authorize(&self.session, Capability::ManageGroups)?;
        self.groups().delete(id).await
    }

    pub async fn list_permissions(&self) -> Result<Vec<Permission>, ApiError> {
        authorize(&self.session, Capability::ManageGroups)?;
        self.api
            .list_all::<Permission>(&self.session, PERMISSIONS_PATH, &[])
            .await
    }
}

fn self_deactivation() -> ApiError {
    ApiError::Validation("No puede desactivar su propio usuario".to_owned())
}
