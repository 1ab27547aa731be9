use juniper::GraphQLEnum;

use crate::{
    models::auth::{Role, Session, SessionUser},
    repos::api::ApiError,
};

/// Everything a role may or may not do, checked before any upstream call
#[derive(Clone, Copy, GraphQLEnum, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewCredits,
    ManageCredits,
    ApproveCredits,
    RegisterPayments,
    ManageClients,
    ManageUsers,
    ManageGroups,
    ViewAudit,
    ManageBilling,
}

impl Capability {
    pub const ALL: [Capability; 9] = [
        Capability::ViewCredits,
        Capability::ManageCredits,
        Capability::ApproveCredits,
        Capability::RegisterPayments,
        Capability::ManageClients,
        Capability::ManageUsers,
        Capability::ManageGroups,
        Capability::ViewAudit,
        Capability::ManageBilling,
    ];
}

pub fn allows(role: Role, capability: Capability) -> bool {
    use Capability::*;

    match role {
        Role::Superadmin | Role::Administrador => true,
        Role::Gerente => matches!(
            capability,
            ViewCredits | ManageCredits | ApproveCredits | RegisterPayments | ManageClients | ViewAudit
        ),
        Role::Contador => matches!(capability, ViewCredits | RegisterPayments | ViewAudit),
        Role::Usuario => matches!(capability, ViewCredits | ManageCredits | ManageClients),
    }
}

pub fn capabilities(role: Role) -> Vec<Capability> {
    Capability::ALL
        .into_iter()
        .filter(|capability| allows(role, *capability))
        .collect()
}

/// The caller must be logged in and its role must grant `capability`
pub fn authorize(session: &Session, capability: Capability) -> Result<&SessionUser, ApiError> {
    let user = session.user.as_ref().ok_or(ApiError::Unauthenticated)?;

    if !allows(user.role, capability) {
        return Err(ApiError::Forbidden {
            body: Some(format!(
                "El rol {} no permite {:?}",
                user.role.as_str(),
                capability
            )),
        });
    }

    Ok(user)
}
