use crate::books::factory::create_book_repository;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::gateway::factory::create_payment_gateway;
use crate::lending::factory::create_lending_service;
use crate::payments::domain::PaymentService;
use crate::payments::domain::service::PaymentServiceImpl;

pub(crate) async fn create_payment_service(config: &Configuration, store: RepositoryStore) -> Box<dyn PaymentService> {
    let lending_svc = create_lending_service(config, store).await;
    let book_repo = create_book_repository(store).await;
    let gateway = create_payment_gateway(store.payment_gateway()).await;
    Box::new(PaymentServiceImpl::new(lending_svc, book_repo, gateway))
}
