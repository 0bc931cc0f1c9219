use crate::books::factory::create_book_repository;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::lending::domain::LendingService;
use crate::lending::domain::service::LendingServiceImpl;
use crate::lending::repository::BorrowRepository;
use crate::lending::repository::ddb_borrow_repository::DDBBorrowRepository;
use crate::lending::repository::memory_borrow_repository::MemoryBorrowRepository;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_borrow_repository(store: RepositoryStore) -> Box<dyn BorrowRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBBorrowRepository::new(client, "borrows", "borrows_ndx"))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "borrows", "borrow_id", "borrow_status", "patron_id").await;
            Box::new(DDBBorrowRepository::new(client, "borrows", "borrows_ndx"))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryBorrowRepository::new("borrows"))
        }
    }
}

pub(crate) async fn create_lending_service(config: &Configuration, store: RepositoryStore) -> Box<dyn LendingService> {
    let borrow_repo = create_borrow_repository(store).await;
    let book_repo = create_book_repository(store).await;
    Box::new(LendingServiceImpl::new(config, borrow_repo, book_repo))
}
