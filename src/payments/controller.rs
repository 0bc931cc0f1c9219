use axum::{
    extract::State,
    response::Json,
};
use serde_json::{Value};
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::core::repository::RepositoryStore;
use crate::payments::command::pay_fee_cmd::{PayFeeCommand, PayFeeCommandRequest, PayFeeCommandResponse};
use crate::payments::command::refund_cmd::{RefundCommand, RefundCommandRequest, RefundCommandResponse};
use crate::payments::domain::PaymentService;
use crate::payments::factory;
use crate::utils::ddb::{build_db_client, create_table};

async fn build_service(state: AppState) -> Box<dyn PaymentService> {
    if state.store != RepositoryStore::Memory {
        let client = build_db_client(state.store).await;
        let _ = create_table(&client, "books", "book_id", "isbn", "title").await;
        let _ = create_table(&client, "borrows", "borrow_id", "borrow_status", "patron_id").await;
    }
    factory::create_payment_service(&state.config, state.store).await
}

pub(crate) async fn pay_late_fee(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<PayFeeCommandResponse>, ServerError> {
    let req: PayFeeCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = PayFeeCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn refund_payment(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<RefundCommandResponse>, ServerError> {
    let req: RefundCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = RefundCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
