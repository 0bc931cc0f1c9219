use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use crate::core::library::LibraryResult;
use crate::payments::dto::{PaymentOutcomeDto, RefundOutcomeDto};

pub mod service;

// Bridge between the lending engine and the external payment collaborator.
// Preconditions are checked here so no gateway call is ever made for a zero
// fee or an out-of-range refund.
#[async_trait]
pub(crate) trait PaymentService: Sync + Send {
    async fn pay_late_fee(&self, patron_id: &str, book_id: &str) -> LibraryResult<PaymentOutcomeDto> {
        self.pay_late_fee_at(patron_id, book_id, Utc::now().naive_utc()).await
    }
    async fn pay_late_fee_at(&self, patron_id: &str, book_id: &str,
                             now: NaiveDateTime) -> LibraryResult<PaymentOutcomeDto>;

    async fn refund_payment(&self, transaction_id: &str,
                            amount: Decimal) -> LibraryResult<RefundOutcomeDto>;
}
