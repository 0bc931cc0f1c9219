use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::payments::domain::PaymentService;
use crate::payments::dto::PaymentOutcomeDto;

pub(crate) struct PayFeeCommand {
    payment_service: Box<dyn PaymentService>,
}

impl PayFeeCommand {
    pub(crate) fn new(payment_service: Box<dyn PaymentService>) -> Self {
        Self {
            payment_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PayFeeCommandRequest {
    patron_id: String,
    book_id: String,
}

impl PayFeeCommandRequest {
    pub fn new(patron_id: String, book_id: String) -> Self {
        Self {
            patron_id,
            book_id,
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct PayFeeCommandResponse {
    pub outcome: PaymentOutcomeDto,
}

impl PayFeeCommandResponse {
    pub fn new(outcome: PaymentOutcomeDto) -> Self {
        Self {
            outcome,
        }
    }
}

#[async_trait]
impl Command<PayFeeCommandRequest, PayFeeCommandResponse> for PayFeeCommand {
    async fn execute(&self, req: PayFeeCommandRequest) -> Result<PayFeeCommandResponse, CommandError> {
        self.payment_service.pay_late_fee(req.patron_id.as_str(), req.book_id.as_str())
            .await.map_err(CommandError::from).map(PayFeeCommandResponse::new)
    }
}
