use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use courier_errors::AppResult;

use crate::api::{AppState, found, no_content};
use crate::application::dto::{ClientDto, ShipmentDto};
use crate::domain::value_objects::ClientId;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(fetch).put(update).delete(remove))
        .route("/{id}/shipments", get(shipments))
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ClientDto>>> {
    Ok(Json(state.services.clients.get_all().await?))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
) -> AppResult<Json<ClientDto>> {
    found(state.services.clients.get_by_id(&id).await?, "Client").map(Json)
}

async fn create(
    State(state): State<AppState>,
    Json(dto): Json<ClientDto>,
) -> AppResult<(StatusCode, Json<ClientDto>)> {
    let saved = state.services.clients.save(dto).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
    Json(dto): Json<ClientDto>,
) -> AppResult<Json<ClientDto>> {
    found(state.services.clients.update(&id, dto).await?, "Client").map(Json)
}

async fn remove(State(state): State<AppState>, Path(id): Path<ClientId>) -> AppResult<StatusCode> {
    no_content(state.services.clients.delete(&id).await?, "Client")
}

/// 客户作为寄件人的运单
async fn shipments(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
) -> AppResult<Json<Vec<ShipmentDto>>> {
    found(state.services.shipments.get_all_by_client(&id).await?, "Client").map(Json)
}
