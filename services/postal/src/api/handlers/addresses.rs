use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use courier_errors::AppResult;

use crate::api::{AppState, found, no_content};
use crate::application::dto::AddressDto;
use crate::domain::value_objects::AddressId;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(fetch).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<AddressDto>>> {
    Ok(Json(state.services.addresses.get_all().await?))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
) -> AppResult<Json<AddressDto>> {
    found(state.services.addresses.get_by_id(&id).await?, "Address").map(Json)
}

async fn create(
    State(state): State<AppState>,
    Json(dto): Json<AddressDto>,
) -> AppResult<(StatusCode, Json<AddressDto>)> {
    let saved = state.services.addresses.save(dto).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
    Json(dto): Json<AddressDto>,
) -> AppResult<Json<AddressDto>> {
    found(state.services.addresses.update(&id, dto).await?, "Address").map(Json)
}

async fn remove(State(state): State<AppState>, Path(id): Path<AddressId>) -> AppResult<StatusCode> {
    no_content(state.services.addresses.delete(&id).await?, "Address")
}
