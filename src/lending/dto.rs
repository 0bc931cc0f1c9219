use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::{BorrowStatus, FeeStatus};
use crate::lending::domain::model::BorrowRecordEntity;
use crate::utils::date::serializer;

// BorrowDto abstracts one loan of a book to a patron, enriched with the book
// title for display.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct BorrowDto {
    pub borrow_id: String,
    pub version: i64,
    pub branch_id: String,
    pub book_id: String,
    pub book_title: String,
    pub patron_id: String,
    pub borrow_status: BorrowStatus,
    #[serde(with = "serializer")]
    pub borrowed_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub due_at: NaiveDateTime,
    pub returned_at: Option<NaiveDateTime>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BorrowDto {
    pub fn from_record(record: &BorrowRecordEntity, book_title: &str) -> Self {
        Self {
            borrow_id: record.borrow_id.to_string(),
            version: record.version,
            branch_id: record.branch_id.to_string(),
            book_id: record.book_id.to_string(),
            book_title: book_title.to_string(),
            patron_id: record.patron_id.to_string(),
            borrow_status: record.borrow_status,
            borrowed_at: record.borrowed_at,
            due_at: record.due_at,
            returned_at: record.returned_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl Identifiable for BorrowDto {
    fn id(&self) -> String {
        self.borrow_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

// FeeQuoteDto is derived, never persisted.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct FeeQuoteDto {
    pub fee_amount: Decimal,
    pub days_overdue: i64,
    pub status: FeeStatus,
}

impl FeeQuoteDto {
    pub fn new(fee_amount: Decimal, days_overdue: i64, status: FeeStatus) -> Self {
        Self {
            fee_amount,
            days_overdue,
            status,
        }
    }

    pub fn zero(status: FeeStatus) -> Self {
        Self::new(Decimal::ZERO, 0, status)
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct ReturnReceiptDto {
    pub borrow: BorrowDto,
    pub fee_amount: Decimal,
    pub days_overdue: i64,
    pub late_fee_owed: bool,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct PatronLoanDto {
    pub book_id: String,
    pub title: String,
    pub author: String,
    #[serde(with = "serializer")]
    pub due_at: NaiveDateTime,
    pub overdue: bool,
    pub days_overdue: i64,
    pub late_fee: Decimal,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct PatronStatusDto {
    pub patron_id: String,
    pub books_borrowed: usize,
    pub loans: Vec<PatronLoanDto>,
    pub total_late_fees: Decimal,
}
