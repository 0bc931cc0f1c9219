use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult, SearchField};

pub(crate) struct CatalogServiceImpl {
    book_repository: Box<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(_config: &Configuration, book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            book_repository,
        }
    }
}

fn validate_new_book(title: &str, author: &str, isbn: &str, total_copies: i64) -> LibraryResult<()> {
    if title.trim().is_empty() {
        return Err(LibraryError::validation("Title is required.", None));
    }
    if title.trim().len() > 200 {
        return Err(LibraryError::validation("Title must be less than 200 characters.", None));
    }
    if author.trim().is_empty() {
        return Err(LibraryError::validation("Author is required.", None));
    }
    if author.trim().len() > 100 {
        return Err(LibraryError::validation("Author must be less than 100 characters.", None));
    }
    if isbn.len() != 13 || !isbn.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LibraryError::validation("ISBN must be exactly 13 digits.", None));
    }
    if total_copies <= 0 {
        return Err(LibraryError::validation("Total copies must be a positive integer.", None));
    }
    Ok(())
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, title: &str, author: &str, isbn: &str,
                      total_copies: i64) -> LibraryResult<BookDto> {
        validate_new_book(title, author, isbn, total_copies)?;
        let existing = self.book_repository.find_by_isbn(isbn).await?;
        if !existing.is_empty() {
            return Err(LibraryError::duplicate_key("A book with this ISBN already exists."));
        }
        let book = BookEntity::new(isbn, title.trim(), author.trim(), total_copies);
        let _ = self.book_repository.create(&book).await?;
        Ok(BookDto::from(&book))
    }

    async fn find_book_by_id(&self, id: &str) -> LibraryResult<BookDto> {
        self.book_repository.get(id).await.map(|b| BookDto::from(&b))
    }

    async fn find_book_by_isbn(&self, isbn: &str) -> LibraryResult<Vec<BookDto>> {
        let res = self.book_repository.find_by_isbn(isbn).await?;
        Ok(res.iter().map(BookDto::from).collect())
    }

    async fn search_books(&self, search_term: &str, search_type: &str) -> LibraryResult<Vec<BookDto>> {
        let term = search_term.trim();
        if term.is_empty() {
            return Ok(vec![]);
        }
        // unknown search types yield no matches, same as a miss
        let field = match SearchField::parse(search_type) {
            Some(field) => field,
            None => return Ok(vec![]),
        };
        let res = self.book_repository.search(field, term, None, 100).await?;
        Ok(res.records.iter().map(BookDto::from).collect())
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            book_id: other.book_id.to_string(),
            version: other.version,
            isbn: other.isbn.to_string(),
            title: other.title.to_string(),
            author: other.author.to_string(),
            total_copies: other.total_copies,
            available_copies: other.available_copies,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        Self {
            book_id: other.book_id.to_string(),
            version: other.version,
            isbn: other.isbn.to_string(),
            title: other.title.to_string(),
            author: other.author.to_string(),
            total_copies: other.total_copies,
            available_copies: other.available_copies,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}
