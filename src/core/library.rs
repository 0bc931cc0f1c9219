use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum LibraryError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    // This is a retry-able error, which indicates that the underlying store could
    // not serve the request at this time (throttling, timeout, partial outage).
    // The caller can retry the operation with or without a backoff; the core
    // itself never retries.
    CurrentlyUnavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    // Business-rule violations such as no copies available or the borrow limit.
    Rule {
        message: String,
        reason_code: Option<String>,
    },
    // Payment collaborator failed or was unreachable; caught at the bridge
    // boundary and mapped into an unsuccessful outcome.
    Gateway {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::CurrentlyUnavailable { message: message.to_string(), reason_code, retryable }
    }

    pub fn database_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> LibraryError {
        if retryable {
            LibraryError::unavailable(
                format!("ddb database unavailable error {:?} {:?}", message, reason).as_str(), reason, true)
        } else if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("404") {
                LibraryError::not_found(
                    format!("not found error {:?} {:?}", message, reason).as_str())
            } else if reason_val.as_str().contains("400") {
                LibraryError::rule(
                    format!("condition failed error {:?} {:?}", message, reason).as_str(), reason)
            } else {
                LibraryError::database(
                    format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
            }
        } else {
            LibraryError::database(
                format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
        }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn rule(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Rule { message: message.to_string(), reason_code }
    }

    pub fn gateway(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Gateway { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }
    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } => { *retryable }
            LibraryError::DuplicateKey { .. } => { false }
            LibraryError::NotFound { .. } => { false }
            LibraryError::CurrentlyUnavailable { retryable, .. } => { *retryable }
            LibraryError::Validation { .. } => { false }
            LibraryError::Rule { .. } => { false }
            LibraryError::Gateway { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("serde io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}


impl From<String> for LibraryError {
    fn from(err: String) -> Self {
        LibraryError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}


impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::DuplicateKey { message } => {
                write!(f, "{}", message)
            }
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Rule { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Gateway { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

/// A specialized Result type for Repository .
pub type LibraryResult<T> = Result<T, LibraryError>;

// It defines abstraction for paginated result
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    // The page number or token
    pub page: Option<String>,
    // page size
    pub page_size: usize,
    // Next page if available
    pub next_page: Option<String>,
    // list of records
    pub records: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub(crate) fn new(page: Option<&str>, page_size: usize,
                      next_page: Option<String>, records: Vec<T>) -> Self {
        PaginatedResult {
            page: page.map(str::to_string),
            page_size,
            next_page,
            records,
        }
    }
}


#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub(crate) enum BorrowStatus {
    Borrowed,
    Returned,
}

impl From<String> for BorrowStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Borrowed" => BorrowStatus::Borrowed,
            "Returned" => BorrowStatus::Returned,
            _ => BorrowStatus::Borrowed,
        }
    }
}

impl Display for BorrowStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            BorrowStatus::Borrowed => write!(f, "Borrowed"),
            BorrowStatus::Returned => write!(f, "Returned"),
        }
    }
}

// Outcome of a late-fee quote. A quote is always produced; the status tells
// the caller why the amount may be zero.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub(crate) enum FeeStatus {
    Success,
    NoActiveRecord,
    BookNotFound,
    InvalidInput,
}

impl From<String> for FeeStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Success" => FeeStatus::Success,
            "No active borrow record" => FeeStatus::NoActiveRecord,
            "Book not found" => FeeStatus::BookNotFound,
            _ => FeeStatus::InvalidInput,
        }
    }
}

impl Display for FeeStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            FeeStatus::Success => write!(f, "Success"),
            FeeStatus::NoActiveRecord => write!(f, "No active borrow record"),
            FeeStatus::BookNotFound => write!(f, "Book not found"),
            FeeStatus::InvalidInput => write!(f, "Invalid input"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub(crate) enum SearchField {
    Title,
    Author,
    Isbn,
}

impl SearchField {
    // unknown search types yield no results rather than an error
    pub fn parse(s: &str) -> Option<SearchField> {
        match s {
            "title" => Some(SearchField::Title),
            "author" => Some(SearchField::Author),
            "isbn" => Some(SearchField::Isbn),
            _ => None,
        }
    }
}

impl Display for SearchField {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SearchField::Title => write!(f, "title"),
            SearchField::Author => write!(f, "author"),
            SearchField::Isbn => write!(f, "isbn"),
        }
    }
}
