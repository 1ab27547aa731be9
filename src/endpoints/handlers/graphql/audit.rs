use juniper::EmptyMutation;

use crate::{
    endpoints::handlers::configs::schema::GeneralContext,
    models::{
        audit::AuditFilters,
        graphql::{map_page, AuditEntryView, AuditPage},
    },
    repos::api::ApiError,
};

pub struct AuditQuery;

#[juniper::graphql_object(
    Context = GeneralContext,
)]
impl AuditQuery {
    pub async fn audit_entries(
        context: &GeneralContext,
        filters: Option<AuditFilters>,
    ) -> Result<AuditPage, ApiError> {
        let page = context
            .audit_service()
            .list(&filters.unwrap_or_default())
            .await?;

        Ok(map_page::<_, AuditEntryView>(page).into())
    }
}

/// The audit trail is read only
pub type AuditMutation = EmptyMutation<GeneralContext>;
