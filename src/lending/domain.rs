use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use crate::core::library::LibraryResult;
use crate::lending::dto::{BorrowDto, FeeQuoteDto, PatronStatusDto, ReturnReceiptDto};

pub mod fees;
pub mod model;
pub mod service;

// Borrowing engine. Every operation takes an explicit reference timestamp in
// its *_at form so date arithmetic is deterministic under test; the plain
// forms fall back to the wall clock.
#[async_trait]
pub(crate) trait LendingService: Sync + Send {
    async fn borrow_book(&self, patron_id: &str, book_id: &str) -> LibraryResult<BorrowDto> {
        self.borrow_book_at(patron_id, book_id, Utc::now().naive_utc()).await
    }
    async fn borrow_book_at(&self, patron_id: &str, book_id: &str,
                            now: NaiveDateTime) -> LibraryResult<BorrowDto>;

    async fn return_book(&self, patron_id: &str, book_id: &str) -> LibraryResult<ReturnReceiptDto> {
        self.return_book_at(patron_id, book_id, Utc::now().naive_utc()).await
    }
    async fn return_book_at(&self, patron_id: &str, book_id: &str,
                            now: NaiveDateTime) -> LibraryResult<ReturnReceiptDto>;

    async fn calculate_late_fee(&self, patron_id: &str, book_id: &str) -> LibraryResult<FeeQuoteDto> {
        self.calculate_late_fee_at(patron_id, book_id, Utc::now().naive_utc()).await
    }
    async fn calculate_late_fee_at(&self, patron_id: &str, book_id: &str,
                                   now: NaiveDateTime) -> LibraryResult<FeeQuoteDto>;

    async fn patron_status(&self, patron_id: &str) -> LibraryResult<PatronStatusDto> {
        self.patron_status_at(patron_id, Utc::now().naive_utc()).await
    }
    async fn patron_status_at(&self, patron_id: &str,
                              now: NaiveDateTime) -> LibraryResult<PatronStatusDto>;
}
