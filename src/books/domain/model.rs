use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

// BookEntity abstracts a title in the catalog; the library may own several
// copies of it, tracked by the copy counters rather than per-copy rows.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct BookEntity {
    pub book_id: String,
    pub version: i64,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub total_copies: i64,
    // invariant: 0 <= available_copies <= total_copies
    pub available_copies: i64,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BookEntity {
    pub fn new(isbn: &str, title: &str, author: &str, total_copies: i64) -> Self {
        Self {
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

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.book_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Book for BookEntity {
    fn title(&self) -> String {
        self.title.to_string()
    }

    fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}


#[cfg(test)]
mod tests {
    use crate::books::domain::model::BookEntity;

    #[tokio::test]
    async fn test_should_build_books() {
        let book = BookEntity::new("9781234567897", "title", "author", 3);
        assert_eq!("9781234567897", book.isbn.as_str());
        assert_eq!("title", book.title.as_str());
        assert_eq!("author", book.author.as_str());
        assert_eq!(3, book.total_copies);
        assert_eq!(3, book.available_copies);
    }
}
