use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::lending::domain::LendingService;
use crate::lending::dto::FeeQuoteDto;

pub(crate) struct LateFeeCommand {
    lending_service: Box<dyn LendingService>,
}

impl LateFeeCommand {
    pub(crate) fn new(lending_service: Box<dyn LendingService>) -> Self {
        Self {
            lending_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LateFeeCommandRequest {
    patron_id: String,
    book_id: String,
}

impl LateFeeCommandRequest {
    pub fn new(patron_id: String, book_id: String) -> Self {
        Self {
            patron_id,
            book_id,
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct LateFeeCommandResponse {
    pub fee: FeeQuoteDto,
    pub message: String,
}

impl LateFeeCommandResponse {
    pub fn new(fee: FeeQuoteDto) -> Self {
        let message = fee.status.to_string();
        Self {
            fee,
            message,
        }
    }
}

#[async_trait]
impl Command<LateFeeCommandRequest, LateFeeCommandResponse> for LateFeeCommand {
    async fn execute(&self, req: LateFeeCommandRequest) -> Result<LateFeeCommandResponse, CommandError> {
        self.lending_service.calculate_late_fee(req.patron_id.as_str(), req.book_id.as_str())
            .await.map_err(CommandError::from).map(LateFeeCommandResponse::new)
    }
}
