use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::lending::domain::LendingService;
use crate::lending::dto::{BorrowDto, ReturnReceiptDto};

pub(crate) struct ReturnBookCommand {
    lending_service: Box<dyn LendingService>,
}

impl ReturnBookCommand {
    pub(crate) fn new(lending_service: Box<dyn LendingService>) -> Self {
        Self {
            lending_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReturnBookCommandRequest {
    patron_id: String,
    book_id: String,
}

impl ReturnBookCommandRequest {
    pub fn new(patron_id: String, book_id: String) -> Self {
        Self {
            patron_id,
            book_id,
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct ReturnBookCommandResponse {
    pub borrow: BorrowDto,
    pub fee_amount: Decimal,
    pub days_overdue: i64,
    pub late_fee_owed: bool,
    pub message: String,
}

impl ReturnBookCommandResponse {
    pub fn new(receipt: ReturnReceiptDto) -> Self {
        let message = if receipt.late_fee_owed {
            format!("Book returned successfully. Late fee owed: ${:.2}", receipt.fee_amount)
        } else {
            "Book returned successfully. No late fee owed.".to_string()
        };
        Self {
            borrow: receipt.borrow,
            fee_amount: receipt.fee_amount,
            days_overdue: receipt.days_overdue,
            late_fee_owed: receipt.late_fee_owed,
            message,
        }
    }
}

#[async_trait]
impl Command<ReturnBookCommandRequest, ReturnBookCommandResponse> for ReturnBookCommand {
    async fn execute(&self, req: ReturnBookCommandRequest) -> Result<ReturnBookCommandResponse, CommandError> {
        self.lending_service.return_book(req.patron_id.as_str(), req.book_id.as_str())
            .await.map_err(CommandError::from).map(ReturnBookCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::factory::create_catalog_service;
    use crate::core::command::Command;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::lending::command::borrow_book_cmd::{BorrowBookCommand, BorrowBookCommandRequest};
    use crate::lending::command::return_book_cmd::{ReturnBookCommand, ReturnBookCommandRequest};
    use crate::lending::factory::create_lending_service;

    lazy_static! {
        static ref BOOK_CMD : AsyncOnce<AddBookCommand> = AsyncOnce::new(async {
                let svc = create_catalog_service(&Configuration::new("test"), RepositoryStore::Memory).await;
                AddBookCommand::new(svc)
            });
        static ref BORROW_CMD : AsyncOnce<BorrowBookCommand> = AsyncOnce::new(async {
                let svc = create_lending_service(&Configuration::new("test"), RepositoryStore::Memory).await;
                BorrowBookCommand::new(svc)
            });
        static ref RETURN_CMD : AsyncOnce<ReturnBookCommand> = AsyncOnce::new(async {
                let svc = create_lending_service(&Configuration::new("test"), RepositoryStore::Memory).await;
                ReturnBookCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_return_book() {
        let book_cmd: &AddBookCommand = BOOK_CMD.get().await.clone();
        let borrow_cmd: &BorrowBookCommand = BORROW_CMD.get().await.clone();
        let return_cmd: &ReturnBookCommand = RETURN_CMD.get().await.clone();

        let added = book_cmd.execute(AddBookCommandRequest::new(
            "returnable book", "test author", "9784444444402", 1))
            .await.expect("should add book");
        let _ = borrow_cmd.execute(BorrowBookCommandRequest::new(
            "720002".to_string(), added.book.book_id.to_string())).await.expect("should borrow book");
        let res = return_cmd.execute(ReturnBookCommandRequest::new(
            "720002".to_string(), added.book.book_id.to_string())).await.expect("should return book");
        assert!(!res.late_fee_owed);
        assert!(res.message.contains("No late fee owed"));
    }

    #[tokio::test]
    async fn test_should_fail_return_without_borrow() {
        let book_cmd: &AddBookCommand = BOOK_CMD.get().await.clone();
        let return_cmd: &ReturnBookCommand = RETURN_CMD.get().await.clone();

        let added = book_cmd.execute(AddBookCommandRequest::new(
            "unborrowed book", "test author", "9784444444403", 1))
            .await.expect("should add book");
        let res = return_cmd.execute(ReturnBookCommandRequest::new(
            "720003".to_string(), added.book.book_id.to_string())).await;
        assert!(res.is_err());
    }
}
