use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use rust_decimal::Decimal;
use crate::gateway::payments::{PaymentGateway, PaymentReceipt, RefundReceipt};
use crate::core::library::LibraryError;

#[derive(Debug, Clone)]
enum MockBehavior {
    Approve,
    Decline(String),
    Fail(String),
}

// Scripted gateway double. Clones share the recorded call log, so a test can
// hand one clone to the bridge and interrogate the other afterwards -- in
// particular to prove that a precondition failure made no gateway call.
#[derive(Debug, Clone)]
pub struct MockPaymentGateway {
    behavior: MockBehavior,
    payments: Arc<Mutex<Vec<(String, Decimal, String)>>>,
    refunds: Arc<Mutex<Vec<(String, Decimal)>>>,
}

impl MockPaymentGateway {
    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            payments: Arc::new(Mutex::new(vec![])),
            refunds: Arc::new(Mutex::new(vec![])),
        }
    }

    pub(crate) fn approving() -> Self {
        Self::with_behavior(MockBehavior::Approve)
    }

    pub(crate) fn declining(reason: &str) -> Self {
        Self::with_behavior(MockBehavior::Decline(reason.to_string()))
    }

    pub(crate) fn failing(reason: &str) -> Self {
        Self::with_behavior(MockBehavior::Fail(reason.to_string()))
    }

    pub(crate) fn payment_calls(&self) -> usize {
        self.payments.lock().unwrap().len()
    }

    pub(crate) fn refund_calls(&self) -> usize {
        self.refunds.lock().unwrap().len()
    }

    pub(crate) fn last_payment(&self) -> Option<(String, Decimal, String)> {
        self.payments.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn process_payment(&self, patron_id: &str, amount: Decimal,
                             description: &str) -> Result<PaymentReceipt, LibraryError> {
        let mut payments = self.payments.lock().unwrap();
        payments.push((patron_id.to_string(), amount, description.to_string()));
        let count = payments.len();
        match &self.behavior {
            MockBehavior::Approve => Ok(PaymentReceipt::approved(
                format!("txn_mock_{}", count).as_str(), "Payment processed successfully")),
            MockBehavior::Decline(reason) => Ok(PaymentReceipt::declined(reason.as_str())),
            MockBehavior::Fail(reason) => Err(LibraryError::gateway(reason.as_str(), None)),
        }
    }

    async fn refund_payment(&self, transaction_id: &str,
                            amount: Decimal) -> Result<RefundReceipt, LibraryError> {
        self.refunds.lock().unwrap().push((transaction_id.to_string(), amount));
        match &self.behavior {
            MockBehavior::Approve => Ok(RefundReceipt::approved("Refund processed successfully")),
            MockBehavior::Decline(reason) => Ok(RefundReceipt::declined(reason.as_str())),
            MockBehavior::Fail(reason) => Err(LibraryError::gateway(reason.as_str(), None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use crate::gateway::mock::processor::MockPaymentGateway;
    use crate::gateway::payments::PaymentGateway;

    #[tokio::test]
    async fn test_should_record_and_approve_payments() {
        let gateway = MockPaymentGateway::approving();
        let shared = gateway.clone();
        let receipt = gateway.process_payment("123456", dec!(6.50), "Late fees")
            .await.expect("should process payment");
        assert!(receipt.approved);
        assert!(receipt.transaction_id.starts_with("txn_"));
        assert_eq!(1, shared.payment_calls());
        assert_eq!(dec!(6.50), shared.last_payment().unwrap().1);
    }

    #[tokio::test]
    async fn test_should_decline_when_scripted() {
        let gateway = MockPaymentGateway::declining("Card declined");
        let receipt = gateway.process_payment("123456", dec!(6.50), "Late fees")
            .await.expect("should process payment");
        assert!(!receipt.approved);
        assert!(receipt.transaction_id.is_empty());
        assert_eq!("Card declined", receipt.message.as_str());
    }

    #[tokio::test]
    async fn test_should_fail_when_scripted() {
        let gateway = MockPaymentGateway::failing("connection reset");
        let res = gateway.process_payment("123456", dec!(6.50), "Late fees").await;
        assert!(res.is_err());
        let res = gateway.refund_payment("txn_1", dec!(6.50)).await;
        assert!(res.is_err());
        assert_eq!(1, gateway.payment_calls());
        assert_eq!(1, gateway.refund_calls());
    }
}
