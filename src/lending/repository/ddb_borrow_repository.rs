use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;

use crate::core::library::{BorrowStatus, LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::lending::domain::model::BorrowRecordEntity;
use crate::lending::repository::BorrowRepository;
use crate::utils::ddb::{add_filter_expr, from_ddb, opt_string_date, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

#[derive(Debug)]
pub(crate) struct DDBBorrowRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBBorrowRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }

    async fn query_active(&self, predicate: HashMap<String, String>) -> LibraryResult<Vec<BorrowRecordEntity>> {
        let mut records = self.query(&predicate, None, 500).await?.records;
        records.sort_by(|a, b| a.borrowed_at.cmp(&b.borrowed_at));
        Ok(records)
    }
}

#[async_trait]
impl Repository<BorrowRecordEntity> for DDBBorrowRepository {
    async fn create(&self, entity: &BorrowRecordEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(borrow_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn update(&self, entity: &BorrowRecordEntity) -> LibraryResult<usize> {
        let now = Utc::now().naive_utc();
        let table_name: &str = self.table_name.as_ref();

        self.client
            .update_item()
            .table_name(table_name)
            .key("borrow_id", AttributeValue::S(entity.borrow_id.clone()))
            .update_expression("SET version = :version, borrow_status = :borrow_status, due_at = :due_at, returned_at = :returned_at, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":borrow_status", AttributeValue::S(entity.borrow_status.to_string()))
            .expression_attribute_values(":due_at", string_date(entity.due_at))
            .expression_attribute_values(":returned_at", opt_string_date(entity.returned_at))
            .expression_attribute_values(":updated_at", string_date(now))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<BorrowRecordEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression(
                "borrow_id = :borrow_id",
            )
            .expression_attribute_values(
                ":borrow_id",
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            if let Some(items) = req.items {
                if items.len() > 1 {
                    return Err(LibraryError::database(format!("too many borrow records for {}", id).as_str(), None, false));
                } else if !items.is_empty() {
                    if let Some(map) = items.first() {
                        return Ok(BorrowRecordEntity::from(map));
                    }
                }
                Err(LibraryError::not_found(format!("borrow record not found for {}", id).as_str()))
            } else {
                Err(LibraryError::not_found(format!("borrow record not found for {}", id).as_str()))
            }
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("borrow_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    // Note you cannot use certain reserved words per https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BorrowRecordEntity>> {
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
            .expression_attribute_values(":borrow_status", AttributeValue::S(
                predicate.get("borrow_status").unwrap_or(&BorrowStatus::Borrowed.to_string()).to_string()
            ));
        // handle GSI keys first
        let mut key_cond = String::new();
        key_cond.push_str("borrow_status = :borrow_status");

        if let Some(patron_id) = predicate.get("patron_id") {
            key_cond.push_str(" AND patron_id = :patron_id");
            request = request.expression_attribute_values(":patron_id", AttributeValue::S(patron_id.to_string()));
        }
        request = request.key_condition_expression(key_cond);
        let mut filter_expr = String::new();
        // then handle other filters
        for (k, v) in predicate {
            if k != "borrow_status" && k != "patron_id" {
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
                .map(BorrowRecordEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl BorrowRepository for DDBBorrowRepository {
    async fn find_active(&self, patron_id: &str, book_id: &str) -> LibraryResult<Vec<BorrowRecordEntity>> {
        self.query_active(HashMap::from([
            ("borrow_status".to_string(), BorrowStatus::Borrowed.to_string()),
            ("patron_id".to_string(), patron_id.to_string()),
            ("book_id".to_string(), book_id.to_string()),
        ])).await
    }

    async fn list_active(&self, patron_id: &str) -> LibraryResult<Vec<BorrowRecordEntity>> {
        self.query_active(HashMap::from([
            ("borrow_status".to_string(), BorrowStatus::Borrowed.to_string()),
            ("patron_id".to_string(), patron_id.to_string()),
        ])).await
    }

    async fn count_active(&self, patron_id: &str) -> LibraryResult<usize> {
        let records = self.list_active(patron_id).await?;
        Ok(records.len())
    }
}

impl From<&HashMap<String, AttributeValue>> for BorrowRecordEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        BorrowRecordEntity {
            borrow_id: parse_string_attribute("borrow_id", map).unwrap_or_else(|| String::from("")),
            version: parse_number_attribute("version", map),
            branch_id: parse_string_attribute("branch_id", map).unwrap_or_else(|| String::from("")),
            book_id: parse_string_attribute("book_id", map).unwrap_or_else(|| String::from("")),
            patron_id: parse_string_attribute("patron_id", map).unwrap_or_else(|| String::from("")),
            borrow_status: BorrowStatus::from(parse_string_attribute("borrow_status", map).unwrap_or_else(|| BorrowStatus::Borrowed.to_string())),
            borrowed_at: parse_date_attribute("borrowed_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            due_at: parse_date_attribute("due_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            returned_at: parse_date_attribute("returned_at", map),
            created_at: parse_date_attribute("created_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or_else(|| Utc::now().naive_utc()),
        }
    }
}
