use crate::{
    models::{
        audit::{AuditEntry, AuditFilters},
        auth::Session,
        pagination::Paginated,
    },
    policy::{authorize, Capability},
    repos::api::{ApiClient, ApiError},
};

pub const AUDIT_PATH: &str = "/api/Auditoria/historial/";

pub struct AuditService {
    pub api: ApiClient,
    pub session: Session,
}

impl AuditService {
    pub async fn list(&self, filters: &AuditFilters) -> Result<Paginated<AuditEntry>, ApiError> {
        authorize(&self.session, Capability::ViewAudit)?;
        self.api
            .list(&self.session, AUDIT_PATH, &filters.to_query())
            .await
    }
}
