pub mod ddb_borrow_repository;
pub mod memory_borrow_repository;

use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;
use crate::lending::domain::model::BorrowRecordEntity;


#[async_trait]
pub(crate) trait BorrowRepository : Repository<BorrowRecordEntity> {
    // active records for the (patron, book) pair, oldest borrow first
    async fn find_active(&self, patron_id: &str, book_id: &str) -> LibraryResult<Vec<BorrowRecordEntity>>;

    // every active record held by the patron, oldest borrow first
    async fn list_active(&self, patron_id: &str) -> LibraryResult<Vec<BorrowRecordEntity>>;

    async fn count_active(&self, patron_id: &str) -> LibraryResult<usize>;
}
