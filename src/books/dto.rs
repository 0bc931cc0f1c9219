use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookDto {
    pub book_id: String,
    pub version: i64,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub total_copies: i64,
    pub available_copies: i64,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BookDto {
    pub fn new(isbn: &str, title: &str, author: &str, total_copies: i64) -> BookDto {
        BookDto {
            book_id: Uuid::new_v4().to_string(),
            version: 0,
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            total_copies,
            available_copies: total_copies,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for BookDto {
    fn id(&self) -> String {
        self.book_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Book for BookDto {
    fn title(&self) -> String {
        self.title.to_string()
    }

    fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::Book;
    use crate::books::dto::BookDto;

    #[tokio::test]
    async fn test_should_build_books() {
        let book = BookDto::new("9781234567897", "title", "author", 1);
        assert_eq!("9781234567897", book.isbn.as_str());
        assert_eq!("title", book.title.as_str());
        assert!(book.is_available());
    }

    #[tokio::test]
    async fn test_should_not_be_available_without_copies() {
        let mut book = BookDto::new("9781234567897", "title", "author", 1);
        book.available_copies = 0;
        assert!(!book.is_available());
    }
}
