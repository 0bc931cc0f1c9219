use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct SearchBooksCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl SearchBooksCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchBooksCommandRequest {
    pub(crate) search_term: String,
    pub(crate) search_type: String,
}

impl SearchBooksCommandRequest {
    pub fn new(search_term: &str, search_type: &str) -> Self {
        Self {
            search_term: search_term.to_string(),
            search_type: search_type.to_string(),
        }
    }
}


#[derive(Debug, Serialize)]
pub(crate) struct SearchBooksCommandResponse {
    pub books: Vec<BookDto>,
}

impl SearchBooksCommandResponse {
    pub fn new(books: Vec<BookDto>) -> Self {
        Self {
            books,
        }
    }
}

#[async_trait]
impl Command<SearchBooksCommandRequest, SearchBooksCommandResponse> for SearchBooksCommand {
    async fn execute(&self, req: SearchBooksCommandRequest) -> Result<SearchBooksCommandResponse, CommandError> {
        self.catalog_service.search_books(req.search_term.as_str(), req.search_type.as_str())
            .await.map_err(CommandError::from).map(SearchBooksCommandResponse::new)
    }
}
