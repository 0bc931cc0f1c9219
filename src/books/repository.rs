pub mod ddb_book_repository;
pub mod memory_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::core::library::{LibraryResult, PaginatedResult, SearchField};
use crate::core::repository::Repository;


#[async_trait]
pub(crate) trait BookRepository: Repository<BookEntity> {
    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Vec<BookEntity>>;

    // title/author are case-insensitive substring matches, isbn is exact
    async fn search(&self, field: SearchField, term: &str,
                    page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>>;

    // guarded counter move; the store rejects any delta that would push
    // available_copies below zero or above total_copies
    async fn adjust_availability(&self, book_id: &str, delta: i64) -> LibraryResult<usize>;
}
