use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct GetBookCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl GetBookCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetBookCommandRequest {
    pub(crate) book_id: String,
}

impl GetBookCommandRequest {
    pub fn new(book_id: &str) -> Self {
        Self {
            book_id: book_id.to_string(),
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct GetBookCommandResponse {
    pub book: BookDto,
}

impl GetBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<GetBookCommandRequest, GetBookCommandResponse> for GetBookCommand {
    async fn execute(&self, req: GetBookCommandRequest) -> Result<GetBookCommandResponse, CommandError> {
        self.catalog_service.find_book_by_id(req.book_id.as_str())
            .await.map_err(CommandError::from).map(GetBookCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
    use crate::catalog::domain::CatalogService;
    use crate::catalog::factory;
    use crate::core::command::Command;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    lazy_static! {
        static ref SUT_SVC: AsyncOnce<Box<dyn CatalogService>> = AsyncOnce::new(async {
                factory::create_catalog_service(&Configuration::new("test"), RepositoryStore::Memory).await
            });
        static ref SUT_CMD : AsyncOnce<GetBookCommand> = AsyncOnce::new(async {
                let svc = factory::create_catalog_service(&Configuration::new("test"), RepositoryStore::Memory).await;
                GetBookCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_get_book() {
        let catalog_svc = SUT_SVC.get().await.clone();
        let cmd = SUT_CMD.get().await.clone();

        let book = catalog_svc.add_book("test book", "test author", "9782222222202", 1)
            .await.expect("should add book");
        let res = cmd.execute(GetBookCommandRequest::new(book.book_id.as_str()))
            .await.expect("should get book");
        assert_eq!(book.book_id, res.book.book_id);
    }

    #[tokio::test]
    async fn test_should_fail_get_unknown_book() {
        let cmd = SUT_CMD.get().await.clone();

        let res = cmd.execute(GetBookCommandRequest::new("missing-book")).await;
        assert!(res.is_err());
    }
}
