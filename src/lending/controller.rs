use axum::{
    extract::State,
    response::Json,
};
use serde_json::{Value};
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::core::repository::RepositoryStore;
use crate::lending::command::borrow_book_cmd::{BorrowBookCommand, BorrowBookCommandRequest, BorrowBookCommandResponse};
use crate::lending::command::late_fee_cmd::{LateFeeCommand, LateFeeCommandRequest, LateFeeCommandResponse};
use crate::lending::command::patron_status_cmd::{PatronStatusCommand, PatronStatusCommandRequest, PatronStatusCommandResponse};
use crate::lending::command::return_book_cmd::{ReturnBookCommand, ReturnBookCommandRequest, ReturnBookCommandResponse};
use crate::lending::domain::LendingService;
use crate::lending::factory;
use crate::utils::ddb::{build_db_client, create_table};

async fn build_service(state: AppState) -> Box<dyn LendingService> {
    if state.store != RepositoryStore::Memory {
        let client = build_db_client(state.store).await;
        let _ = create_table(&client, "books", "book_id", "isbn", "title").await;
        let _ = create_table(&client, "borrows", "borrow_id", "borrow_status", "patron_id").await;
    }
    factory::create_lending_service(&state.config, state.store).await
}

pub(crate) async fn borrow_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<BorrowBookCommandResponse>, ServerError> {
    let req: BorrowBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = BorrowBookCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn return_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<ReturnBookCommandResponse>, ServerError> {
    let req: ReturnBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = ReturnBookCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn late_fee(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<LateFeeCommandResponse>, ServerError> {
    let req: LateFeeCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = LateFeeCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn patron_status(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<PatronStatusCommandResponse>, ServerError> {
    let req: PatronStatusCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = PatronStatusCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
