use async_trait::async_trait;
use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::gateway::PaymentGatewayVia;

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity
    async fn create(&self, entity: &Entity) -> LibraryResult<usize>;

    // updates an entity
    async fn update(&self, entity: &Entity) -> LibraryResult<usize>;

    // get an entity
    async fn get(&self, id: &str) -> LibraryResult<Entity>;

    // delete an entity
    async fn delete(&self, id: &str) -> LibraryResult<usize>;

    // find by predicate
    async fn query(&self, predicate: &HashMap::<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<Entity>>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub(crate) enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    Memory,
}

impl RepositoryStore {
    pub fn payment_gateway(&self) -> PaymentGatewayVia  {
        match self {
            RepositoryStore::DynamoDB => {PaymentGatewayVia::Sandbox},
            RepositoryStore::LocalDynamoDB => {PaymentGatewayVia::Sandbox},
            RepositoryStore::Memory => {PaymentGatewayVia::Mock},
        }
    }
}
