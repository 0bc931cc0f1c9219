use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::lending::domain::LendingService;
use crate::lending::dto::PatronStatusDto;

pub(crate) struct PatronStatusCommand {
    lending_service: Box<dyn LendingService>,
}

impl PatronStatusCommand {
    pub(crate) fn new(lending_service: Box<dyn LendingService>) -> Self {
        Self {
            lending_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PatronStatusCommandRequest {
    patron_id: String,
}

impl PatronStatusCommandRequest {
    pub fn new(patron_id: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct PatronStatusCommandResponse {
    pub report: PatronStatusDto,
}

impl PatronStatusCommandResponse {
    pub fn new(report: PatronStatusDto) -> Self {
        Self {
            report,
        }
    }
}

#[async_trait]
impl Command<PatronStatusCommandRequest, PatronStatusCommandResponse> for PatronStatusCommand {
    async fn execute(&self, req: PatronStatusCommandRequest) -> Result<PatronStatusCommandResponse, CommandError> {
        self.lending_service.patron_status(req.patron_id.as_str())
            .await.map_err(CommandError::from).map(PatronStatusCommandResponse::new)
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
    use crate::lending::command::patron_status_cmd::{PatronStatusCommand, PatronStatusCommandRequest};
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
        static ref STATUS_CMD : AsyncOnce<PatronStatusCommand> = AsyncOnce::new(async {
                let svc = create_lending_service(&Configuration::new("test"), RepositoryStore::Memory).await;
                PatronStatusCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_patron_status() {
        let book_cmd: &AddBookCommand = BOOK_CMD.get().await.clone();
        let borrow_cmd: &BorrowBookCommand = BORROW_CMD.get().await.clone();
        let status_cmd: &PatronStatusCommand = STATUS_CMD.get().await.clone();

        let added = book_cmd.execute(AddBookCommandRequest::new(
            "status command book", "test author", "9784444444405", 1))
            .await.expect("should add book");
        let _ = borrow_cmd.execute(BorrowBookCommandRequest::new(
            "720006".to_string(), added.book.book_id.to_string())).await.expect("should borrow book");

        let res = status_cmd.execute(PatronStatusCommandRequest::new("720006"))
            .await.expect("should report status");
        assert_eq!("720006", res.report.patron_id.as_str());
        assert_eq!(1, res.report.books_borrowed);
        assert_eq!(1, res.report.loans.len());
    }

    #[tokio::test]
    async fn test_should_fail_status_for_invalid_patron() {
        let status_cmd: &PatronStatusCommand = STATUS_CMD.get().await.clone();

        let res = status_cmd.execute(PatronStatusCommandRequest::new("72")).await;
        assert!(res.is_err());
    }
}
