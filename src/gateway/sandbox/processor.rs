use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::log::info;
use uuid::Uuid;
use crate::gateway::payments::{PaymentGateway, PaymentReceipt, RefundReceipt};
use crate::core::library::LibraryError;

// Local stand-in for the external payment processor. It applies the
// processor's own validation rules and approves everything else, so flows can
// run end to end without a network. Note the processor does not enforce the
// library's refund cap; that rule belongs to the payment bridge.
#[derive(Debug)]
pub struct SandboxPaymentGateway {}

impl SandboxPaymentGateway {
    pub(crate) fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl PaymentGateway for SandboxPaymentGateway {
    async fn process_payment(&self, patron_id: &str, amount: Decimal,
                             description: &str) -> Result<PaymentReceipt, LibraryError> {
        if patron_id.len() != 6 || !patron_id.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(PaymentReceipt::declined("Invalid patron ID"));
        }
        if amount <= Decimal::ZERO {
            return Ok(PaymentReceipt::declined("Invalid amount"));
        }
        let transaction_id = format!("txn_{}", Uuid::new_v4().simple());
        let auth_code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
        info!("sandbox payment of {} approved for {} ({})", amount, patron_id, description);
        Ok(PaymentReceipt::approved(
            transaction_id.as_str(),
            format!("Payment processed successfully (auth {})", auth_code).as_str()))
    }

    async fn refund_payment(&self, transaction_id: &str,
                            amount: Decimal) -> Result<RefundReceipt, LibraryError> {
        if !transaction_id.starts_with("txn_") {
            return Ok(RefundReceipt::declined("Invalid transaction ID"));
        }
        if amount <= Decimal::ZERO {
            return Ok(RefundReceipt::declined("Invalid refund amount"));
        }
        info!("sandbox refund of {} approved for {}", amount, transaction_id);
        Ok(RefundReceipt::approved("Refund processed successfully"))
    }
}
