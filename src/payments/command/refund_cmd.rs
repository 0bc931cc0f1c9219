use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::payments::domain::PaymentService;
use crate::payments::dto::RefundOutcomeDto;

pub(crate) struct RefundCommand {
    payment_service: Box<dyn PaymentService>,
}

impl RefundCommand {
    pub(crate) fn new(payment_service: Box<dyn PaymentService>) -> Self {
        Self {
            payment_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefundCommandRequest {
    transaction_id: String,
    amount: Decimal,
}

impl RefundCommandRequest {
    pub fn new(transaction_id: &str, amount: Decimal) -> Self {
        Self {
            transaction_id: transaction_id.to_string(),
            amount,
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct RefundCommandResponse {
    pub outcome: RefundOutcomeDto,
}

impl RefundCommandResponse {
    pub fn new(outcome: RefundOutcomeDto) -> Self {
        Self {
            outcome,
        }
    }
}

#[async_trait]
impl Command<RefundCommandRequest, RefundCommandResponse> for RefundCommand {
    async fn execute(&self, req: RefundCommandRequest) -> Result<RefundCommandResponse, CommandError> {
        self.payment_service.refund_payment(req.transaction_id.as_str(), req.amount)
            .await.map_err(CommandError::from).map(RefundCommandResponse::new)
    }
}
