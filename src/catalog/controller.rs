use axum::{
    extract::State,
    response::Json,
};
use serde_json::{Value};
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest, AddBookCommandResponse};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest, GetBookCommandResponse};
use crate::catalog::command::search_books_cmd::{SearchBooksCommand, SearchBooksCommandRequest, SearchBooksCommandResponse};
use crate::catalog::domain::CatalogService;
use crate::catalog::factory;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};

async fn build_service(state: AppState) -> Box<dyn CatalogService> {
    if state.store != RepositoryStore::Memory {
        let client = build_db_client(state.store).await;
        let _ = create_table(&client, "books", "book_id", "isbn", "title").await;
    }
    factory::create_catalog_service(&state.config, state.store).await
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<AddBookCommandResponse>, ServerError> {
    let req: AddBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = AddBookCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn get_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<GetBookCommandResponse>, ServerError> {
    let req: GetBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = GetBookCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn search_books(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<SearchBooksCommandResponse>, ServerError> {
    let req: SearchBooksCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = SearchBooksCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
