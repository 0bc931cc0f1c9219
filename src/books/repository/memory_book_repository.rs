use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult, SearchField};
use crate::core::repository::Repository;
use crate::utils::date::DATE_FMT;
use crate::utils::memory;

// Process-local implementation of the book store; plays the role DynamoDB
// Local plays for the hosted repository so the suite stays hermetic.
#[derive(Debug)]
pub struct MemoryBookRepository {
    table_name: String,
}

impl MemoryBookRepository {
    pub(crate) fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
        }
    }

    fn scan_books(&self) -> LibraryResult<Vec<BookEntity>> {
        memory::scan_items(self.table_name.as_str())?
            .into_iter()
            .map(|val| serde_json::from_value(val).map_err(LibraryError::from))
            .collect()
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let val = serde_json::to_value(entity)?;
        memory::put_item(self.table_name.as_str(), entity.book_id.as_str(), val, true)
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let mut next = entity.clone();
        next.version = entity.version + 1;
        next.updated_at = Utc::now().naive_utc();
        let val = serde_json::to_value(&next)?;
        let old_version = entity.version;
        memory::mutate_item(self.table_name.as_str(), entity.book_id.as_str(), |item| {
            if item["version"].as_i64().unwrap_or(-1) != old_version {
                return Err(LibraryError::rule(
                    format!("stale version for book {}", next.book_id).as_str(),
                    Some("400".to_string())));
            }
            *item = val;
            Ok(())
        })
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        let val = memory::get_item(self.table_name.as_str(), id)
            .map_err(|_| LibraryError::not_found(format!("book not found for {}", id).as_str()))?;
        serde_json::from_value(val).map_err(LibraryError::from)
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        memory::delete_item(self.table_name.as_str(), id)
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let records = self.scan_books()?
            .into_iter()
            .filter(|book| {
                predicate.iter().all(|(k, v)| match k.as_str() {
                    "book_id" => book.book_id == *v,
                    "isbn" => book.isbn == *v,
                    "title" => book.title == *v,
                    "author" => book.author == *v,
                    _ => false,
                })
            })
            .take(page_size)
            .collect();
        Ok(PaginatedResult::new(page, page_size, None, records))
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Vec<BookEntity>> {
        let predicate = HashMap::from([
            ("isbn".to_string(), isbn.to_string()),
        ]);
        let res = self.query(&predicate, None, 100).await?;
        Ok(res.records)
    }

    async fn search(&self, field: SearchField, term: &str,
                    page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let needle = term.to_lowercase();
        let records = self.scan_books()?
            .into_iter()
            .filter(|book| match field {
                SearchField::Title => book.title.to_lowercase().contains(needle.as_str()),
                SearchField::Author => book.author.to_lowercase().contains(needle.as_str()),
                SearchField::Isbn => book.isbn == term,
            })
            .take(page_size)
            .collect();
        Ok(PaginatedResult::new(page, page_size, None, records))
    }

    async fn adjust_availability(&self, book_id: &str, delta: i64) -> LibraryResult<usize> {
        let now = Utc::now().naive_utc();
        memory::mutate_item(self.table_name.as_str(), book_id, |item: &mut Value| {
            let available = item["available_copies"].as_i64().unwrap_or(0);
            let total = item["total_copies"].as_i64().unwrap_or(0);
            let next = available + delta;
            if next < 0 || next > total {
                return Err(LibraryError::rule(
                    format!("availability adjustment out of range for book {}", book_id).as_str(),
                    Some("400".to_string())));
            }
            item["available_copies"] = json!(next);
            item["updated_at"] = json!(format!("{}", now.format(DATE_FMT)));
            Ok(())
        }).map_err(|err| match err {
            LibraryError::NotFound { .. } => LibraryError::not_found(
                format!("book not found for {}", book_id).as_str()),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::books::domain::model::BookEntity;
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::core::library::SearchField;
    use crate::core::repository::Repository;

    #[tokio::test]
    async fn test_should_create_get_books() {
        let books_repo = MemoryBookRepository::new("books");
        let book = BookEntity::new("9780000000010", "test book", "test author", 2);
        let size = books_repo.create(&book).await.expect("should create book");
        assert_eq!(1, size);

        let loaded = books_repo.get(book.book_id.as_str()).await.expect("should return book");
        assert_eq!(book.book_id, loaded.book_id);
        assert_eq!(2, loaded.available_copies);
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_book_id() {
        let books_repo = MemoryBookRepository::new("books");
        let book = BookEntity::new("9780000000011", "test book", "test author", 1);
        let _ = books_repo.create(&book).await.expect("should create book");
        assert!(books_repo.create(&book).await.is_err());
    }

    #[tokio::test]
    async fn test_should_create_update_books() {
        let books_repo = MemoryBookRepository::new("books");
        let mut book = BookEntity::new("9780000000012", "test book", "test author", 1);
        let size = books_repo.create(&book).await.expect("should create book");
        assert_eq!(1, size);

        book.title = "new title".to_string();
        let size = books_repo.update(&book).await.expect("should update book");
        assert_eq!(1, size);

        let loaded = books_repo.get(book.book_id.as_str()).await.expect("should return book");
        assert_eq!("new title", loaded.title.as_str());
        assert_eq!(1, loaded.version);

        // stale version must be rejected
        assert!(books_repo.update(&book).await.is_err());
    }

    #[tokio::test]
    async fn test_should_find_by_isbn() {
        let books_repo = MemoryBookRepository::new("books");
        let book = BookEntity::new("9780000000013", "isbn lookup", "test author", 1);
        let _ = books_repo.create(&book).await.expect("should create book");
        let res = books_repo.find_by_isbn("9780000000013").await.expect("should return books");
        assert_eq!(1, res.len());
        assert_eq!(book.book_id, res[0].book_id);
    }

    #[tokio::test]
    async fn test_should_search_books() {
        let books_repo = MemoryBookRepository::new("books");
        let book = BookEntity::new("9780000000014", "The Pragmatic Walrus", "Ada Quill", 1);
        let _ = books_repo.create(&book).await.expect("should create book");

        let by_title = books_repo.search(SearchField::Title, "pragmatic wal", None, 50)
            .await.expect("should search");
        assert!(by_title.records.iter().any(|b| b.book_id == book.book_id));

        let by_author = books_repo.search(SearchField::Author, "quill", None, 50)
            .await.expect("should search");
        assert!(by_author.records.iter().any(|b| b.book_id == book.book_id));

        let by_isbn = books_repo.search(SearchField::Isbn, "9780000000014", None, 50)
            .await.expect("should search");
        assert_eq!(1, by_isbn.records.len());

        // isbn search is exact, not substring
        let partial_isbn = books_repo.search(SearchField::Isbn, "978000000001", None, 50)
            .await.expect("should search");
        assert!(partial_isbn.records.is_empty());
    }

    #[tokio::test]
    async fn test_should_adjust_availability_within_bounds() {
        let books_repo = MemoryBookRepository::new("books");
        let book = BookEntity::new("9780000000015", "counter book", "test author", 1);
        let _ = books_repo.create(&book).await.expect("should create book");

        let _ = books_repo.adjust_availability(book.book_id.as_str(), -1).await.expect("should decrement");
        let loaded = books_repo.get(book.book_id.as_str()).await.expect("should return book");
        assert_eq!(0, loaded.available_copies);

        // below zero rejected
        assert!(books_repo.adjust_availability(book.book_id.as_str(), -1).await.is_err());

        let _ = books_repo.adjust_availability(book.book_id.as_str(), 1).await.expect("should increment");
        // above total rejected
        assert!(books_repo.adjust_availability(book.book_id.as_str(), 1).await.is_err());
    }

    #[tokio::test]
    async fn test_should_fail_adjusting_missing_book() {
        let books_repo = MemoryBookRepository::new("books");
        assert!(books_repo.adjust_availability("no-such-book", -1).await.is_err());
    }

    #[tokio::test]
    async fn test_should_query_with_predicate() {
        let books_repo = MemoryBookRepository::new("books");
        let book = BookEntity::new("9780000000016", "predicate book", "test author", 1);
        let _ = books_repo.create(&book).await.expect("should create book");
        let res = books_repo.query(
            &HashMap::from([("title".to_string(), "predicate book".to_string())]),
            None, 50).await.expect("should query");
        assert_eq!(1, res.records.len());
    }
}
