use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult, SearchField};
use crate::core::repository::Repository;
use crate::utils::ddb::{add_filter_expr, from_ddb, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }

    async fn scan(&self, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let exclusive_start_key = to_ddb_page(page, &HashMap::new());
        self.client
            .scan()
            .table_name(table_name)
            .consistent_read(false)
            .set_exclusive_start_key(exclusive_start_key)
            .limit(cmp::min(page_size, 500) as i32)
            .send()
            .await.map_err(LibraryError::from).map(|req| {
            let def_items = vec![];
            let items = req.items.as_ref().unwrap_or(&def_items);
            let records = items.iter().map(map_to_book).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(book_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn update(&self, entity: &BookEntity) -> LibraryResult<usize> {
        let now = Utc::now().naive_utc();
        let table_name: &str = self.table_name.as_ref();

        self.client
            .update_item()
            .table_name(table_name)
            .key("book_id", AttributeValue::S(entity.book_id.clone()))
            .update_expression("SET version = :version, title = :title, author = :author, total_copies = :total_copies, available_copies = :available_copies, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":title", AttributeValue::S(entity.title.to_string()))
            .expression_attribute_values(":author", AttributeValue::S(entity.author.to_string()))
            .expression_attribute_values(":total_copies", AttributeValue::N(entity.total_copies.to_string()))
            .expression_attribute_values(":available_copies", AttributeValue::N(entity.available_copies.to_string()))
            .expression_attribute_values(":updated_at", string_date(now))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression(
                "book_id = :book_id",
            )
            .expression_attribute_values(
                ":book_id",
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            if let Some(items) = req.items {
                if items.len() > 1 {
                    return Err(LibraryError::database(format!("too many books for {}", id).as_str(), None, false));
                } else if !items.is_empty() {
                    if let Some(map) = items.first() {
                        return Ok(map_to_book(map));
                    }
                }
                Err(LibraryError::not_found(format!("book item not found for {}", id).as_str()))
            } else {
                Err(LibraryError::not_found(format!("book not found for {}", id).as_str()))
            }
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("book_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    // Note you cannot use certain reserved words per https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let exclusive_start_key = to_ddb_page(page, predicate);
        let mut request = self.client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .set_exclusive_start_key(exclusive_start_key)
            .expression_attribute_values(":isbn", AttributeValue::S(
                predicate.get("isbn").unwrap_or(&String::new()).to_string()
            ));
        // handle GSI keys first
        let mut key_cond = String::new();
        key_cond.push_str("isbn = :isbn");

        if let Some(title) = predicate.get("title") {
            key_cond.push_str(" AND title = :title");
            request = request.expression_attribute_values(":title", AttributeValue::S(title.to_string()));
        }
        request = request.key_condition_expression(key_cond);
        let mut filter_expr = String::new();
        // then handle other filters
        for (k, v) in predicate {
            if k != "isbn" && k != "title" {
                let ks = add_filter_expr(k.as_str(), &mut filter_expr);
                request = request.expression_attribute_values(format!(":{}", ks).as_str(), AttributeValue::S(v.to_string()));
            }
        }
        if !filter_expr.is_empty() {
            request = request.filter_expression(filter_expr);
        }

        request
            .send()
            .await.map_err(LibraryError::from).map(|req| {
            let records = req.items.as_ref().unwrap_or(&vec![]).iter()
                .map(map_to_book).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    async fn find_by_isbn(&self, isbn: &str) -> LibraryResult<Vec<BookEntity>> {
        let predicate = HashMap::from([
            ("isbn".to_string(), isbn.to_string()),
        ]);
        let res = self.query(&predicate, None, 100).await?;
        Ok(res.records)
    }

    async fn search(&self, field: SearchField, term: &str,
                    page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        match field {
            SearchField::Isbn => {
                let predicate = HashMap::from([
                    ("isbn".to_string(), term.to_string()),
                ]);
                self.query(&predicate, page, page_size).await
            }
            // the store has no lower(), so substring matching folds case on
            // the client over a scanned page
            SearchField::Title | SearchField::Author => {
                let needle = term.to_lowercase();
                let res = self.scan(page, page_size).await?;
                let records = res.records.into_iter().filter(|book| {
                    let haystack = match field {
                        SearchField::Title => book.title.to_lowercase(),
                        _ => book.author.to_lowercase(),
                    };
                    haystack.contains(needle.as_str())
                }).collect();
                Ok(PaginatedResult::new(page, page_size, res.next_page, records))
            }
        }
    }

    async fn adjust_availability(&self, book_id: &str, delta: i64) -> LibraryResult<usize> {
        let now = Utc::now().naive_utc();
        let table_name: &str = self.table_name.as_ref();
        let mut request = self.client
            .update_item()
            .table_name(table_name)
            .key("book_id", AttributeValue::S(book_id.to_string()))
            .update_expression("SET available_copies = available_copies + :delta, updated_at = :updated_at")
            .expression_attribute_values(":delta", AttributeValue::N(delta.to_string()))
            .expression_attribute_values(":updated_at", string_date(now));
        if delta < 0 {
            request = request
                .condition_expression("attribute_exists(book_id) AND available_copies >= :need")
                .expression_attribute_values(":need", AttributeValue::N((-delta).to_string()));
        } else {
            request = request
                .condition_expression("attribute_exists(book_id) AND available_copies < total_copies");
        }
        request
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }
}

fn map_to_book(map: &HashMap<String, AttributeValue>) -> BookEntity {
    BookEntity {
        book_id: parse_string_attribute("book_id", map).unwrap_or(String::from("")),
        version: parse_number_attribute("version", map),
        isbn: parse_string_attribute("isbn", map).unwrap_or(String::from("")),
        title: parse_string_attribute("title", map).unwrap_or(String::from("")),
        author: parse_string_attribute("author", map).unwrap_or(String::from("")),
        total_copies: parse_number_attribute("total_copies", map),
        available_copies: parse_number_attribute("available_copies", map),
        created_at: parse_date_attribute("created_at", map).unwrap_or(Utc::now().naive_utc()),
        updated_at: parse_date_attribute("updated_at", map).unwrap_or(Utc::now().naive_utc()),
    }
}
