use async_trait::async_trait;
use crate::books::dto::BookDto;
use crate::core::library::LibraryResult;

pub mod service;

#[async_trait]
pub(crate) trait CatalogService: Sync + Send {
    async fn add_book(&self, title: &str, author: &str, isbn: &str,
                      total_copies: i64) -> LibraryResult<BookDto>;
    async fn find_book_by_id(&self, id: &str) -> LibraryResult<BookDto>;
    async fn find_book_by_isbn(&self, isbn: &str) -> LibraryResult<Vec<BookDto>>;
    async fn search_books(&self, search_term: &str, search_type: &str) -> LibraryResult<Vec<BookDto>>;
}
