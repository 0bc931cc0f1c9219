use async_trait::async_trait;
use rust_decimal::Decimal;
use crate::core::library::LibraryError;

// Receipt returned by the payment capability; a declined payment carries an
// empty transaction id and the processor's reason.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PaymentReceipt {
    pub approved: bool,
    pub transaction_id: String,
    pub message: String,
}

impl PaymentReceipt {
    pub fn approved(transaction_id: &str, message: &str) -> Self {
        Self {
            approved: true,
            transaction_id: transaction_id.to_string(),
            message: message.to_string(),
        }
    }

    pub fn declined(message: &str) -> Self {
        Self {
            approved: false,
            transaction_id: String::new(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RefundReceipt {
    pub approved: bool,
    pub message: String,
}

impl RefundReceipt {
    pub fn approved(message: &str) -> Self {
        Self {
            approved: true,
            message: message.to_string(),
        }
    }

    pub fn declined(message: &str) -> Self {
        Self {
            approved: false,
            message: message.to_string(),
        }
    }
}

// External money-settlement capability. An Err means the collaborator itself
// failed or was unreachable; business declines come back as receipts.
#[async_trait]
pub(crate) trait PaymentGateway: Sync + Send {
    async fn process_payment(&self, patron_id: &str, amount: Decimal,
                             description: &str) -> Result<PaymentReceipt, LibraryError>;
    async fn refund_payment(&self, transaction_id: &str,
                            amount: Decimal) -> Result<RefundReceipt, LibraryError>;
}
