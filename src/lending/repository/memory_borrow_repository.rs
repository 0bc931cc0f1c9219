use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;

use crate::core::library::{BorrowStatus, LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::lending::domain::model::BorrowRecordEntity;
use crate::lending::repository::BorrowRepository;
use crate::utils::memory;

// Process-local implementation of the borrow-record store for hermetic tests.
#[derive(Debug)]
pub(crate) struct MemoryBorrowRepository {
    table_name: String,
}

impl MemoryBorrowRepository {
    pub(crate) fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
        }
    }

    fn scan_records(&self) -> LibraryResult<Vec<BorrowRecordEntity>> {
        memory::scan_items(self.table_name.as_str())?
            .into_iter()
            .map(|val| serde_json::from_value(val).map_err(LibraryError::from))
            .collect()
    }

    fn active_sorted<F>(&self, filter: F) -> LibraryResult<Vec<BorrowRecordEntity>>
        where F: Fn(&BorrowRecordEntity) -> bool {
        let mut records: Vec<BorrowRecordEntity> = self.scan_records()?
            .into_iter()
            .filter(|record| record.borrow_status == BorrowStatus::Borrowed && filter(record))
            .collect();
        records.sort_by(|a, b| a.borrowed_at.cmp(&b.borrowed_at));
        Ok(records)
    }
}

#[async_trait]
impl Repository<BorrowRecordEntity> for MemoryBorrowRepository {
    async fn create(&self, entity: &BorrowRecordEntity) -> LibraryResult<usize> {
        let val = serde_json::to_value(entity)?;
        memory::put_item(self.table_name.as_str(), entity.borrow_id.as_str(), val, true)
    }

    async fn update(&self, entity: &BorrowRecordEntity) -> LibraryResult<usize> {
        let mut next = entity.clone();
        next.version = entity.version + 1;
        next.updated_at = Utc::now().naive_utc();
        let val = serde_json::to_value(&next)?;
        let old_version = entity.version;
        memory::mutate_item(self.table_name.as_str(), entity.borrow_id.as_str(), |item| {
            if item["version"].as_i64().unwrap_or(-1) != old_version {
                return Err(LibraryError::rule(
                    format!("stale version for borrow record {}", next.borrow_id).as_str(),
                    Some("400".to_string())));
            }
            *item = val;
            Ok(())
        })
    }

    async fn get(&self, id: &str) -> LibraryResult<BorrowRecordEntity> {
        let val = memory::get_item(self.table_name.as_str(), id)
            .map_err(|_| LibraryError::not_found(format!("borrow record not found for {}", id).as_str()))?;
        serde_json::from_value(val).map_err(LibraryError::from)
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        memory::delete_item(self.table_name.as_str(), id)
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BorrowRecordEntity>> {
        let records = self.scan_records()?
            .into_iter()
            .filter(|record| {
                predicate.iter().all(|(k, v)| match k.as_str() {
                    "borrow_id" => record.borrow_id == *v,
                    "book_id" => record.book_id == *v,
                    "patron_id" => record.patron_id == *v,
                    "borrow_status" => record.borrow_status.to_string() == *v,
                    _ => false,
                })
            })
            .take(page_size)
            .collect();
        Ok(PaginatedResult::new(page, page_size, None, records))
    }
}

#[async_trait]
impl BorrowRepository for MemoryBorrowRepository {
    async fn find_active(&self, patron_id: &str, book_id: &str) -> LibraryResult<Vec<BorrowRecordEntity>> {
        self.active_sorted(|record| record.patron_id == patron_id && record.book_id == book_id)
    }

    async fn list_active(&self, patron_id: &str) -> LibraryResult<Vec<BorrowRecordEntity>> {
        self.active_sorted(|record| record.patron_id == patron_id)
    }

    async fn count_active(&self, patron_id: &str) -> LibraryResult<usize> {
        let records = self.list_active(patron_id).await?;
        Ok(records.len())
    }
}
