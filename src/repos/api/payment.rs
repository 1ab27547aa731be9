use chrono::Utc;
use log::{info, warn};

use crate::{
    models::{
        auth::Session,
        pagination::Paginated,
        payment::{InstallmentPaymentInput, Payment, PaymentFilters},
    },
    policy::{authorize, Capability},
    repos::api::{ApiClient, ApiError, Resource},
};

pub const PAYMENTS_PATH: &str = "/api/Pagos/pagos/";

pub struct PaymentService {
    pub api: ApiClient,
    pub session: Session,
}

impl PaymentService {
    fn payments(&self) -> Resource<'_, Payment> {
        Resource::new(&self.api, &self.session, PAYMENTS_PATH)
    }

    pub async fn list(&self, filters: &PaymentFilters) -> Result<Paginated<Payment>, ApiError> {
        authorize(&self.session, Capability::ViewCredits)?;
        let page = self.payments().list(&filters.to_query()).await?;

        for payment in page.results.iter().filter(|payment| !payment.is_consistent()) {
            warn!(
                "payment {} is {} but its paid date/method say otherwise",
                payment.id,
                payment.status.as_str()
            );
        }

        Ok(page)
    }

    pub async fn get(&self, id: i32) -> Result<Payment, ApiError> {
        authorize(&self.session, Capability::ViewCredits)?;
        self.payments().get(id).await
    }

    /// Settles one installment: the amount is checked here, then the terminal
    /// state is written upstream in a single PATCH.
    pub async fn process_installment(
        &self,
        input: &InstallmentPaymentInput,
    ) -> Result<Payment, ApiError> {
        authorize(&self.session, Capability::RegisterPayments)?;

        let payment = self.payments().get(input.payment_id).await?;
        let settlement = payment
            .settle(
                input.amount,
                input.method,
                input.transaction_reference.clone(),
                Utc::now(),
            )
            .map_err(|rejection| ApiError::Validation(rejection.to_string()))?;

        let updated = self.payments().update(payment.id, &settlement).await?;
        info!(
            "installment {} of credit {} settled with {:.2}",
            updated.sequence, updated.credit_id, settlement.paid_amount
        );

        Ok(updated)
    }
}
