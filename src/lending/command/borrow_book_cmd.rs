use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::lending::domain::LendingService;
use crate::lending::dto::BorrowDto;

pub(crate) struct BorrowBookCommand {
    lending_service: Box<dyn LendingService>,
}

impl BorrowBookCommand {
    pub(crate) fn new(lending_service: Box<dyn LendingService>) -> Self {
        Self {
            lending_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BorrowBookCommandRequest {
    patron_id: String,
    book_id: String,
}

impl BorrowBookCommandRequest {
    pub fn new(patron_id: String, book_id: String) -> Self {
        Self {
            patron_id,
            book_id,
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct BorrowBookCommandResponse {
    pub borrow: BorrowDto,
    pub message: String,
}

impl BorrowBookCommandResponse {
    pub fn new(borrow: BorrowDto) -> Self {
        let message = format!("Successfully borrowed \"{}\". Due date: {}.",
                              borrow.book_title, borrow.due_at.format("%Y-%m-%d"));
        Self {
            borrow,
            message,
        }
    }
}

#[async_trait]
impl Command<BorrowBookCommandRequest, BorrowBookCommandResponse> for BorrowBookCommand {
    async fn execute(&self, req: BorrowBookCommandRequest) -> Result<BorrowBookCommandResponse, CommandError> {
        self.lending_service.borrow_book(req.patron_id.as_str(), req.book_id.as_str())
            .await.map_err(CommandError::from).map(BorrowBookCommandResponse::new)
    }
}
