use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::log::info;
use crate::books::domain::Book;
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::domain::Configuration;
use crate::core::library::{BorrowStatus, FeeStatus, LibraryError, LibraryResult};
use crate::lending::domain::{fees, LendingService};
use crate::lending::domain::model::BorrowRecordEntity;
use crate::lending::dto::{BorrowDto, FeeQuoteDto, PatronLoanDto, PatronStatusDto, ReturnReceiptDto};
use crate::lending::repository::BorrowRepository;

pub(crate) struct LendingServiceImpl {
    branch_id: String,
    book_loan_days: i64,
    max_borrowed_books: i64,
    borrow_repository: Box<dyn BorrowRepository>,
    book_repository: Box<dyn BookRepository>,
}

impl LendingServiceImpl {
    pub(crate) fn new(config: &Configuration, borrow_repository: Box<dyn BorrowRepository>,
                      book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            branch_id: config.branch_id.to_string(),
            book_loan_days: config.book_loan_days,
            max_borrowed_books: config.max_borrowed_books,
            borrow_repository,
            book_repository,
        }
    }

    async fn find_book(&self, book_id: &str) -> LibraryResult<BookEntity> {
        self.book_repository.get(book_id).await.map_err(|err| match err {
            LibraryError::NotFound { .. } => LibraryError::not_found("Book not found."),
            other => other,
        })
    }

    async fn find_oldest_active(&self, patron_id: &str, book_id: &str) -> LibraryResult<BorrowRecordEntity> {
        let records = self.borrow_repository.find_active(patron_id, book_id).await?;
        records.into_iter().next()
            .ok_or_else(|| LibraryError::not_found("Book not borrowed by this patron."))
    }
}

pub(crate) fn valid_patron_id(patron_id: &str) -> bool {
    patron_id.len() == 6 && patron_id.bytes().all(|b| b.is_ascii_digit())
}

#[async_trait]
impl LendingService for LendingServiceImpl {
    async fn borrow_book_at(&self, patron_id: &str, book_id: &str,
                            now: NaiveDateTime) -> LibraryResult<BorrowDto> {
        if !valid_patron_id(patron_id) {
            return Err(LibraryError::validation("Invalid patron ID. Must be exactly 6 digits.", None));
        }
        let book = self.find_book(book_id).await?;
        if !book.is_available() {
            return Err(LibraryError::rule("This book is currently not available.", None));
        }
        let borrowed = self.borrow_repository.count_active(patron_id).await? as i64;
        // the boundary is exclusive: a patron holding exactly the maximum may
        // still take one more
        if borrowed > self.max_borrowed_books {
            return Err(LibraryError::rule(
                format!("You have reached the maximum borrowing limit of {} books.",
                        self.max_borrowed_books).as_str(), None));
        }

        let record = BorrowRecordEntity::new(
            self.branch_id.as_str(), book_id, patron_id, now, self.book_loan_days);
        let _ = self.borrow_repository.create(&record).await.map_err(|err|
            LibraryError::database("Database error occurred while creating borrow record.",
                                   Some(err.to_string()), err.retryable()))?;
        // the record exists at this point; a failed decrement must surface as
        // a storage failure, never as silent success
        let _ = self.book_repository.adjust_availability(book_id, -1).await.map_err(|err|
            LibraryError::database("Database error occurred while updating book availability.",
                                   Some(err.to_string()), err.retryable()))?;
        info!("patron {} borrowed book {} until {}", patron_id, book_id, record.due_at);
        Ok(BorrowDto::from_record(&record, book.title.as_str()))
    }

    async fn return_book_at(&self, patron_id: &str, book_id: &str,
                            now: NaiveDateTime) -> LibraryResult<ReturnReceiptDto> {
        if patron_id.trim().is_empty() || book_id.trim().is_empty() {
            return Err(LibraryError::validation("Invalid input.", None));
        }
        let book = self.find_book(book_id).await?;
        let record = self.find_oldest_active(patron_id, book_id).await?;

        // the fee reflects the moment of return, assessed before any mutation
        let days_overdue = fees::overdue_days(record.borrowed_at, now, self.book_loan_days);
        let fee_amount = fees::late_fee_for_days(days_overdue);

        let mut closed = record.clone();
        closed.borrow_status = BorrowStatus::Returned;
        closed.returned_at = Some(now);
        let _ = self.borrow_repository.update(&closed).await.map_err(|err|
            LibraryError::database("Database error occurred while updating borrow record.",
                                   Some(err.to_string()), err.retryable()))?;
        let _ = self.book_repository.adjust_availability(book_id, 1).await.map_err(|err|
            LibraryError::database("Database error occurred while updating book availability.",
                                   Some(err.to_string()), err.retryable()))?;
        info!("patron {} returned book {} with fee {}", patron_id, book_id, fee_amount);
        Ok(ReturnReceiptDto {
            borrow: BorrowDto::from_record(&closed, book.title.as_str()),
            fee_amount,
            days_overdue,
            late_fee_owed: fee_amount > Decimal::ZERO,
        })
    }

    async fn calculate_late_fee_at(&self, patron_id: &str, book_id: &str,
                                   now: NaiveDateTime) -> LibraryResult<FeeQuoteDto> {
        if !valid_patron_id(patron_id) || book_id.trim().is_empty() {
            return Ok(FeeQuoteDto::zero(FeeStatus::InvalidInput));
        }
        match self.find_book(book_id).await {
            Ok(_) => {}
            Err(LibraryError::NotFound { .. }) => {
                return Ok(FeeQuoteDto::zero(FeeStatus::BookNotFound));
            }
            Err(other) => return Err(other),
        }
        let records = self.borrow_repository.find_active(patron_id, book_id).await?;
        let record = match records.into_iter().next() {
            Some(record) => record,
            None => return Ok(FeeQuoteDto::zero(FeeStatus::NoActiveRecord)),
        };
        let days_overdue = fees::overdue_days(record.borrowed_at, now, self.book_loan_days);
        Ok(FeeQuoteDto::new(fees::late_fee_for_days(days_overdue), days_overdue, FeeStatus::Success))
    }

    async fn patron_status_at(&self, patron_id: &str,
                              now: NaiveDateTime) -> LibraryResult<PatronStatusDto> {
        if !valid_patron_id(patron_id) {
            return Err(LibraryError::validation("Invalid patron ID. Must be exactly 6 digits.", None));
        }
        let records = self.borrow_repository.list_active(patron_id).await?;
        let mut loans = Vec::with_capacity(records.len());
        let mut total_late_fees = Decimal::ZERO;
        for record in records.iter() {
            let book = self.book_repository.get(record.book_id.as_str()).await?;
            let days_overdue = fees::overdue_days(record.borrowed_at, now, self.book_loan_days);
            let late_fee = fees::late_fee_for_days(days_overdue);
            total_late_fees += late_fee;
            loans.push(PatronLoanDto {
                book_id: record.book_id.to_string(),
                title: book.title.to_string(),
                author: book.author.to_string(),
                due_at: record.due_at,
                overdue: days_overdue > 0,
                days_overdue,
                late_fee,
            });
        }
        Ok(PatronStatusDto {
            patron_id: patron_id.to_string(),
            books_borrowed: records.len(),
            loans,
            total_late_fees,
        })
    }
}


#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use chrono::{Duration, NaiveDateTime};
    use lazy_static::lazy_static;
    use rust_decimal_macros::dec;
    use crate::catalog::domain::CatalogService;
    use crate::catalog::factory::create_catalog_service;
    use crate::core::domain::Configuration;
    use crate::core::library::{FeeStatus, LibraryError};
    use crate::core::repository::RepositoryStore;
    use crate::lending::domain::LendingService;
    use crate::lending::factory::create_lending_service;
    use crate::utils::date::DATE_FMT;

    lazy_static! {
        static ref SUT_SVC: AsyncOnce<Box<dyn LendingService>> = AsyncOnce::new(async {
                create_lending_service(&Configuration::new("test"), RepositoryStore::Memory).await
            });
        static ref CATALOG_SVC: AsyncOnce<Box<dyn CatalogService>> = AsyncOnce::new(async {
                create_catalog_service(&Configuration::new("test"), RepositoryStore::Memory).await
            });
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DATE_FMT).unwrap()
    }

    #[tokio::test]
    async fn test_should_borrow_book_and_decrement_availability() {
        let lending_svc = SUT_SVC.get().await.clone();
        let catalog_svc = CATALOG_SVC.get().await.clone();

        let book = catalog_svc.add_book("borrowable", "test author", "9783333333301", 2)
            .await.expect("should add book");
        let now = ts("2023-04-01T10:00:00.0");

        let borrow = lending_svc.borrow_book_at("710001", book.book_id.as_str(), now)
            .await.expect("should borrow book");
        assert_eq!(now + Duration::days(14), borrow.due_at);
        assert_eq!("borrowable", borrow.book_title.as_str());

        let loaded = catalog_svc.find_book_by_id(book.book_id.as_str()).await.expect("should return book");
        assert_eq!(1, loaded.available_copies);
    }

    #[tokio::test]
    async fn test_should_reject_borrow_with_invalid_patron() {
        let lending_svc = SUT_SVC.get().await.clone();

        for patron_id in ["", "abc", "12345", "1234567", "12345a"] {
            let res = lending_svc.borrow_book_at(patron_id, "book1", ts("2023-04-01T10:00:00.0")).await;
            assert!(matches!(res.unwrap_err(), LibraryError::Validation { message: _, reason_code: _ }));
        }
    }

    #[tokio::test]
    async fn test_should_reject_borrow_of_unknown_book() {
        let lending_svc = SUT_SVC.get().await.clone();

        let res = lending_svc.borrow_book_at("710002", "no-such-book", ts("2023-04-01T10:00:00.0")).await;
        assert!(matches!(res.unwrap_err(), LibraryError::NotFound { message: _ }));
    }

    #[tokio::test]
    async fn test_should_reject_borrow_without_copies() {
        let lending_svc = SUT_SVC.get().await.clone();
        let catalog_svc = CATALOG_SVC.get().await.clone();

        let book = catalog_svc.add_book("single copy", "test author", "9783333333302", 1)
            .await.expect("should add book");
        let now = ts("2023-04-01T10:00:00.0");

        let _ = lending_svc.borrow_book_at("710003", book.book_id.as_str(), now)
            .await.expect("should borrow book");
        let res = lending_svc.borrow_book_at("710003", book.book_id.as_str(), now).await;
        assert!(matches!(res.unwrap_err(), LibraryError::Rule { message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_allow_sixth_borrow_but_not_seventh() {
        let lending_svc = SUT_SVC.get().await.clone();
        let catalog_svc = CATALOG_SVC.get().await.clone();
        let now = ts("2023-04-01T10:00:00.0");

        for i in 0..7 {
            let book = catalog_svc.add_book(
                format!("limit book {}", i).as_str(), "test author",
                format!("97833333334{:02}", i).as_str(), 1)
                .await.expect("should add book");
            let res = lending_svc.borrow_book_at("710004", book.book_id.as_str(), now).await;
            if i < 6 {
                // holding exactly the maximum still allows one more
                assert!(res.is_ok(), "borrow {} should succeed", i);
            } else {
                assert!(matches!(res.unwrap_err(), LibraryError::Rule { message: _, reason_code: _ }));
            }
        }
    }

    #[tokio::test]
    async fn test_should_return_book_with_late_fee() {
        let lending_svc = SUT_SVC.get().await.clone();
        let catalog_svc = CATALOG_SVC.get().await.clone();

        let book = catalog_svc.add_book("late return", "test author", "9783333333303", 1)
            .await.expect("should add book");
        let borrowed_at = ts("2023-04-01T10:00:00.0");

        let _ = lending_svc.borrow_book_at("710005", book.book_id.as_str(), borrowed_at)
            .await.expect("should borrow book");
        // 20 days borrowed is 6 days overdue
        let receipt = lending_svc.return_book_at("710005", book.book_id.as_str(),
                                                 borrowed_at + Duration::days(20))
            .await.expect("should return book");
        assert!(receipt.late_fee_owed);
        assert_eq!(dec!(3.00), receipt.fee_amount);
        assert_eq!(6, receipt.days_overdue);

        let loaded = catalog_svc.find_book_by_id(book.book_id.as_str()).await.expect("should return book");
        assert_eq!(1, loaded.available_copies);
    }

    #[tokio::test]
    async fn test_should_return_book_without_fee_when_on_time() {
        let lending_svc = SUT_SVC.get().await.clone();
        let catalog_svc = CATALOG_SVC.get().await.clone();

        let book = catalog_svc.add_book("prompt return", "test author", "9783333333304", 1)
            .await.expect("should add book");
        let borrowed_at = ts("2023-04-01T10:00:00.0");

        let _ = lending_svc.borrow_book_at("710006", book.book_id.as_str(), borrowed_at)
            .await.expect("should borrow book");
        let receipt = lending_svc.return_book_at("710006", book.book_id.as_str(),
                                                 borrowed_at + Duration::days(10))
            .await.expect("should return book");
        assert!(!receipt.late_fee_owed);
        assert_eq!(dec!(0), receipt.fee_amount);
    }

    #[tokio::test]
    async fn test_should_reject_return_of_unborrowed_book() {
        let lending_svc = SUT_SVC.get().await.clone();
        let catalog_svc = CATALOG_SVC.get().await.clone();

        let book = catalog_svc.add_book("never borrowed", "test author", "9783333333305", 1)
            .await.expect("should add book");
        let res = lending_svc.return_book_at("710007", book.book_id.as_str(),
                                             ts("2023-04-01T10:00:00.0")).await;
        assert!(matches!(res.unwrap_err(), LibraryError::NotFound { message: _ }));
    }

    #[tokio::test]
    async fn test_should_reject_second_return() {
        let lending_svc = SUT_SVC.get().await.clone();
        let catalog_svc = CATALOG_SVC.get().await.clone();

        let book = catalog_svc.add_book("double return", "test author", "9783333333306", 1)
            .await.expect("should add book");
        let borrowed_at = ts("2023-04-01T10:00:00.0");

        let _ = lending_svc.borrow_book_at("710008", book.book_id.as_str(), borrowed_at)
            .await.expect("should borrow book");
        let _ = lending_svc.return_book_at("710008", book.book_id.as_str(),
                                           borrowed_at + Duration::days(5))
            .await.expect("should return book");
        let res = lending_svc.return_book_at("710008", book.book_id.as_str(),
                                             borrowed_at + Duration::days(6)).await;
        assert!(matches!(res.unwrap_err(), LibraryError::NotFound { message: _ }));
    }

    #[tokio::test]
    async fn test_should_reject_return_with_blank_input() {
        let lending_svc = SUT_SVC.get().await.clone();

        let res = lending_svc.return_book_at("", "book1", ts("2023-04-01T10:00:00.0")).await;
        assert!(matches!(res.unwrap_err(), LibraryError::Validation { message: _, reason_code: _ }));
        let res = lending_svc.return_book_at("710009", "  ", ts("2023-04-01T10:00:00.0")).await;
        assert!(matches!(res.unwrap_err(), LibraryError::Validation { message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_restore_availability_round_trip() {
        let lending_svc = SUT_SVC.get().await.clone();
        let catalog_svc = CATALOG_SVC.get().await.clone();

        let book = catalog_svc.add_book("round trip", "test author", "9783333333307", 3)
            .await.expect("should add book");
        let borrowed_at = ts("2023-04-01T10:00:00.0");

        let _ = lending_svc.borrow_book_at("710010", book.book_id.as_str(), borrowed_at)
            .await.expect("should borrow book");
        let _ = lending_svc.return_book_at("710010", book.book_id.as_str(),
                                           borrowed_at + Duration::days(3))
            .await.expect("should return book");

        let loaded = catalog_svc.find_book_by_id(book.book_id.as_str()).await.expect("should return book");
        assert_eq!(3, loaded.available_copies);

        // the copy is available again right away
        let _ = lending_svc.borrow_book_at("710010", book.book_id.as_str(),
                                           borrowed_at + Duration::days(4))
            .await.expect("should borrow book again");
    }

    #[tokio::test]
    async fn test_should_quote_late_fee_for_overdue_book() {
        let lending_svc = SUT_SVC.get().await.clone();
        let catalog_svc = CATALOG_SVC.get().await.clone();

        let book = catalog_svc.add_book("fee quote", "test author", "9783333333308", 1)
            .await.expect("should add book");
        let borrowed_at = ts("2023-04-01T10:00:00.0");

        let _ = lending_svc.borrow_book_at("710011", book.book_id.as_str(), borrowed_at)
            .await.expect("should borrow book");
        // 24 days borrowed is 10 days overdue
        let quote = lending_svc.calculate_late_fee_at("710011", book.book_id.as_str(),
                                                      borrowed_at + Duration::days(24))
            .await.expect("should quote fee");
        assert_eq!(FeeStatus::Success, quote.status);
        assert_eq!(10, quote.days_overdue);
        assert_eq!(dec!(6.50), quote.fee_amount);
    }

    #[tokio::test]
    async fn test_should_quote_zero_for_invalid_input() {
        let lending_svc = SUT_SVC.get().await.clone();

        let quote = lending_svc.calculate_late_fee_at("12a456", "book1", ts("2023-04-01T10:00:00.0"))
            .await.expect("should quote fee");
        assert_eq!(FeeStatus::InvalidInput, quote.status);
        assert_eq!(dec!(0), quote.fee_amount);

        let quote = lending_svc.calculate_late_fee_at("710012", " ", ts("2023-04-01T10:00:00.0"))
            .await.expect("should quote fee");
        assert_eq!(FeeStatus::InvalidInput, quote.status);
    }

    #[tokio::test]
    async fn test_should_quote_zero_for_unknown_book() {
        let lending_svc = SUT_SVC.get().await.clone();

        let quote = lending_svc.calculate_late_fee_at("710013", "no-such-book", ts("2023-04-01T10:00:00.0"))
            .await.expect("should quote fee");
        assert_eq!(FeeStatus::BookNotFound, quote.status);
        assert_eq!(dec!(0), quote.fee_amount);
    }

    #[tokio::test]
    async fn test_should_quote_zero_without_active_record() {
        let lending_svc = SUT_SVC.get().await.clone();
        let catalog_svc = CATALOG_SVC.get().await.clone();

        let book = catalog_svc.add_book("unborrowed quote", "test author", "9783333333309", 1)
            .await.expect("should add book");
        let quote = lending_svc.calculate_late_fee_at("710014", book.book_id.as_str(),
                                                      ts("2023-04-01T10:00:00.0"))
            .await.expect("should quote fee");
        assert_eq!(FeeStatus::NoActiveRecord, quote.status);
        assert_eq!(dec!(0), quote.fee_amount);
    }

    #[tokio::test]
    async fn test_should_report_patron_status() {
        let lending_svc = SUT_SVC.get().await.clone();
        let catalog_svc = CATALOG_SVC.get().await.clone();
        let borrowed_at = ts("2023-04-01T10:00:00.0");

        let on_time = catalog_svc.add_book("status on time", "test author", "9783333333310", 1)
            .await.expect("should add book");
        let overdue = catalog_svc.add_book("status overdue", "test author", "9783333333311", 1)
            .await.expect("should add book");
        let _ = lending_svc.borrow_book_at("710015", on_time.book_id.as_str(),
                                           borrowed_at + Duration::days(18))
            .await.expect("should borrow book");
        let _ = lending_svc.borrow_book_at("710015", overdue.book_id.as_str(), borrowed_at)
            .await.expect("should borrow book");

        // 20 days after the first borrow: one loan is 6 days overdue
        let status = lending_svc.patron_status_at("710015", borrowed_at + Duration::days(20))
            .await.expect("should report status");
        assert_eq!(2, status.books_borrowed);
        assert_eq!(2, status.loans.len());
        assert_eq!(dec!(3.00), status.total_late_fees);

        let overdue_loan = status.loans.iter().find(|l| l.book_id == overdue.book_id).unwrap();
        assert!(overdue_loan.overdue);
        assert_eq!(6, overdue_loan.days_overdue);
        let current_loan = status.loans.iter().find(|l| l.book_id == on_time.book_id).unwrap();
        assert!(!current_loan.overdue);
        assert_eq!(dec!(0), current_loan.late_fee);
    }

    #[tokio::test]
    async fn test_should_reject_status_for_invalid_patron() {
        let lending_svc = SUT_SVC.get().await.clone();

        let res = lending_svc.patron_status_at("abc", ts("2023-04-01T10:00:00.0")).await;
        assert!(matches!(res.unwrap_err(), LibraryError::Validation { message: _, reason_code: _ }));
    }
}
