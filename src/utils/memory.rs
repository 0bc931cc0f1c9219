use std::collections::HashMap;
use std::sync::RwLock;
use lazy_static::lazy_static;
use serde_json::Value;
use crate::core::library::{LibraryError, LibraryResult};

lazy_static! {
    // Process-wide tables keyed by table name, so repositories built by
    // separate factories still observe one store, the same way every
    // DynamoDB client observes one local database. Writers serialize on the
    // lock; no await happens while it is held.
    static ref TABLES: RwLock<HashMap<String, HashMap<String, Value>>> =
        RwLock::new(HashMap::new());
}

pub(crate) fn put_item(table: &str, id: &str, item: Value, expect_new: bool) -> LibraryResult<usize> {
    let mut tables = TABLES.write()
        .map_err(|err| LibraryError::runtime(format!("memory store lock poisoned {:?}", err).as_str(), None))?;
    let items = tables.entry(table.to_string()).or_default();
    if expect_new && items.contains_key(id) {
        return Err(LibraryError::duplicate_key(
            format!("{} item already exists for {}", table, id).as_str()));
    }
    if !expect_new && !items.contains_key(id) {
        return Err(LibraryError::not_found(
            format!("{} item not found for {}", table, id).as_str()));
    }
    items.insert(id.to_string(), item);
    Ok(1)
}

pub(crate) fn get_item(table: &str, id: &str) -> LibraryResult<Value> {
    let tables = TABLES.read()
        .map_err(|err| LibraryError::runtime(format!("memory store lock poisoned {:?}", err).as_str(), None))?;
    tables.get(table)
        .and_then(|items| items.get(id))
        .cloned()
        .ok_or_else(|| LibraryError::not_found(format!("{} item not found for {}", table, id).as_str()))
}

pub(crate) fn delete_item(table: &str, id: &str) -> LibraryResult<usize> {
    let mut tables = TABLES.write()
        .map_err(|err| LibraryError::runtime(format!("memory store lock poisoned {:?}", err).as_str(), None))?;
    if let Some(items) = tables.get_mut(table) {
        items.remove(id);
    }
    Ok(1)
}

pub(crate) fn scan_items(table: &str) -> LibraryResult<Vec<Value>> {
    let tables = TABLES.read()
        .map_err(|err| LibraryError::runtime(format!("memory store lock poisoned {:?}", err).as_str(), None))?;
    Ok(tables.get(table)
        .map(|items| items.values().cloned().collect())
        .unwrap_or_default())
}

// Read-modify-write under a single writer lock so a guarded mutation such as
// an availability adjustment cannot interleave with another writer.
pub(crate) fn mutate_item<F>(table: &str, id: &str, mutator: F) -> LibraryResult<usize>
    where F: FnOnce(&mut Value) -> LibraryResult<()> {
    let mut tables = TABLES.write()
        .map_err(|err| LibraryError::runtime(format!("memory store lock poisoned {:?}", err).as_str(), None))?;
    let items = tables.entry(table.to_string()).or_default();
    match items.get_mut(id) {
        Some(item) => {
            mutator(item)?;
            Ok(1)
        }
        None => Err(LibraryError::not_found(format!("{} item not found for {}", table, id).as_str())),
    }
}
