use juniper::{GraphQLEnum, GraphQLInputObject, GraphQLObject};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, GraphQLEnum, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Superadmin,
    Administrador,
    Gerente,
    Contador,
    Usuario,
}

impl Role {
    /// Unknown roles get the least privileged one
    pub fn from_string(role: &str) -> Role {
        match role.trim().to_lowercase().as_str() {
            "superadmin" => Role::Superadmin,
            "administrador" | "admin" => Role::Administrador,
            "gerente" => Role::Gerente,
            "contador" => Role::Contador,
            _ => Role::Usuario,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Administrador => "administrador",
            Role::Gerente => "gerente",
            Role::Contador => "contador",
            Role::Usuario => "usuario",
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::from_string(&value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_owned()
    }
}

/// Who is behind a token, cached on our side after login
#[derive(Clone, Serialize, Deserialize, GraphQLObject, Debug, PartialEq)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "empresa", default)]
    pub tenant: Option<String>,
}

/// Everything a request carries about its caller. Built once per request and
/// handed to every service, never stored globally.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub token: Option<String>,
    pub tenant: Option<String>,
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn new(token: Option<String>, tenant: Option<String>) -> Session {
        Session {
            token,
            tenant,
            user: None,
        }
    }

    pub fn with_user(mut self, user: SessionUser) -> Session {
        if self.tenant.is_none() {
            self.tenant = user.tenant.clone();
        }
        self.user = Some(user);
        self
    }

    /// Tenant used for keys scoped per company
    pub fn tenant_or_default(&self) -> &str {
        self.tenant.as_deref().unwrap_or("default")
    }
}

/// Reads `Token <value>` from an Authorization header value
pub fn parse_token_header(value: &str) -> Option<String> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("token") || token.is_empty() {
        return None;
    }

    Some(token.to_owned())
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct LoginInfo {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct TokenInfo {
    pub token: String,
    #[serde(rename = "usuario", alias = "user")]
    pub user: SessionUser,
}

#[derive(Clone, Serialize, Deserialize, GraphQLObject, Debug, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(rename = "rol")]
    pub role: Role,
    pub is_active: bool,
    #[serde(rename = "grupo", default)]
    pub group_id: Option<i32>,
}

#[derive(Clone, Serialize, Deserialize, GraphQLInputObject, Debug, Default, PartialEq)]
pub struct UserInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "rol", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(rename = "grupo", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i32>,
}

#[derive(Clone, Serialize, Deserialize, GraphQLObject, Debug, PartialEq)]
pub struct Group {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<i32>,
}

#[derive(Clone, Serialize, Deserialize, GraphQLInputObject, Debug, Default, PartialEq)]
pub struct GroupInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<i32>>,
}

#[derive(Clone, Serialize, Deserialize, GraphQLObject, Debug, PartialEq)]
pub struct Permission {
    pub id: i32,
    pub name: String,
    pub codename: String,
}
