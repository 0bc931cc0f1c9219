use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::log::{info, warn};
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult};
use crate::gateway::payments::PaymentGateway;
use crate::lending::domain::fees::MAX_LATE_FEE;
use crate::lending::domain::LendingService;
use crate::lending::domain::service::valid_patron_id;
use crate::payments::domain::PaymentService;
use crate::payments::dto::{PaymentOutcomeDto, RefundOutcomeDto};

pub(crate) struct PaymentServiceImpl {
    lending_service: Box<dyn LendingService>,
    book_repository: Box<dyn BookRepository>,
    gateway: Box<dyn PaymentGateway>,
}

impl PaymentServiceImpl {
    pub(crate) fn new(lending_service: Box<dyn LendingService>,
                      book_repository: Box<dyn BookRepository>,
                      gateway: Box<dyn PaymentGateway>) -> Self {
        Self {
            lending_service,
            book_repository,
            gateway,
        }
    }
}

#[async_trait]
impl PaymentService for PaymentServiceImpl {
    async fn pay_late_fee_at(&self, patron_id: &str, book_id: &str,
                             now: NaiveDateTime) -> LibraryResult<PaymentOutcomeDto> {
        if !valid_patron_id(patron_id) {
            return Err(LibraryError::validation("Invalid patron ID. Must be exactly 6 digits.", None));
        }
        let quote = self.lending_service.calculate_late_fee_at(patron_id, book_id, now).await?;
        // hard precondition, not an optimization: charging zero is meaningless
        // and must stay distinguishable from a successful payment
        if quote.fee_amount <= Decimal::ZERO {
            return Err(LibraryError::rule("No late fees to pay for this book.", None));
        }
        let book = self.book_repository.get(book_id).await.map_err(|err| match err {
            LibraryError::NotFound { .. } => LibraryError::not_found("Book not found."),
            other => other,
        })?;
        let description = format!("Late fees for '{}'", book.title);
        match self.gateway.process_payment(patron_id, quote.fee_amount, description.as_str()).await {
            Ok(receipt) => {
                if receipt.approved {
                    info!("late fee of {} settled for patron {} ({})",
                          quote.fee_amount, patron_id, receipt.transaction_id);
                    Ok(PaymentOutcomeDto::succeeded(
                        receipt.transaction_id.as_str(),
                        format!("Payment successful! {}", receipt.message).as_str()))
                } else {
                    Ok(PaymentOutcomeDto::failed(
                        format!("Payment failed: {}", receipt.message).as_str()))
                }
            }
            Err(err) => {
                // collaborator faults stop at this boundary
                warn!("payment gateway failure for patron {}: {}", patron_id, err);
                Ok(PaymentOutcomeDto::failed(
                    format!("Payment processing error: {}", err).as_str()))
            }
        }
    }

    async fn refund_payment(&self, transaction_id: &str,
                            amount: Decimal) -> LibraryResult<RefundOutcomeDto> {
        if !transaction_id.starts_with("txn_") {
            return Err(LibraryError::validation("Invalid transaction ID.", None));
        }
        if amount <= Decimal::ZERO {
            return Err(LibraryError::rule("Refund amount must be greater than 0.", None));
        }
        if amount > MAX_LATE_FEE {
            return Err(LibraryError::rule("Refund amount exceeds maximum late fee.", None));
        }
        match self.gateway.refund_payment(transaction_id, amount).await {
            Ok(receipt) => {
                if receipt.approved {
                    info!("refund of {} settled for {}", amount, transaction_id);
                    Ok(RefundOutcomeDto::succeeded(receipt.message.as_str()))
                } else {
                    Ok(RefundOutcomeDto::failed(
                        format!("Refund failed: {}", receipt.message).as_str()))
                }
            }
            Err(err) => {
                warn!("refund gateway failure for {}: {}", transaction_id, err);
                Ok(RefundOutcomeDto::failed(
                    format!("Refund processing error: {}", err).as_str()))
            }
        }
    }
}
