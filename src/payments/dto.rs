use serde::{Deserialize, Serialize};

// Outcome of a settlement attempt; an unsuccessful outcome keeps the
// collaborator's reason but never a transaction id.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct PaymentOutcomeDto {
    pub success: bool,
    pub transaction_id: Option<String>,
    pub message: String,
}

impl PaymentOutcomeDto {
    pub fn succeeded(transaction_id: &str, message: &str) -> Self {
        Self {
            success: true,
            transaction_id: Some(transaction_id.to_string()),
            message: message.to_string(),
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            transaction_id: None,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct RefundOutcomeDto {
    pub success: bool,
    pub message: String,
}

impl RefundOutcomeDto {
    pub fn succeeded(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::payments::dto::{PaymentOutcomeDto, RefundOutcomeDto};

    #[tokio::test]
    async fn test_should_build_payment_outcome() {
        let outcome = PaymentOutcomeDto::succeeded("txn_1", "ok");
        assert!(outcome.success);
        assert_eq!(Some("txn_1".to_string()), outcome.transaction_id);

        let outcome = PaymentOutcomeDto::failed("declined");
        assert!(!outcome.success);
        assert_eq!(None, outcome.transaction_id);
    }

    #[tokio::test]
    async fn test_should_build_refund_outcome() {
        assert!(RefundOutcomeDto::succeeded("ok").success);
        assert!(!RefundOutcomeDto::failed("nope").success);
    }
}
