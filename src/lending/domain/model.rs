use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::library::BorrowStatus;
use crate::utils::date::serializer;

// BorrowRecordEntity abstracts one loan of one copy of a book to a patron.
// The record stays in the store forever; returning only sets returned_at.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct BorrowRecordEntity {
    pub borrow_id: String,
    pub version: i64,
    pub branch_id: String,
    pub book_id: String,
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

impl BorrowRecordEntity {
    pub fn new(branch_id: &str, book_id: &str, patron_id: &str,
               borrowed_at: NaiveDateTime, loan_days: i64) -> Self {
        Self {
            borrow_id: Uuid::new_v4().to_string(),
            version: 0,
            branch_id: branch_id.to_string(),
            book_id: book_id.to_string(),
            patron_id: patron_id.to_string(),
            borrow_status: BorrowStatus::Borrowed,
            borrowed_at,
            due_at: borrowed_at + Duration::days(loan_days),
            returned_at: None,
            created_at: borrowed_at,
            updated_at: borrowed_at,
        }
    }
}

impl Identifiable for BorrowRecordEntity {
    fn id(&self) -> String {
        self.borrow_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}
