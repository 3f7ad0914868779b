//! 包裹只能随运单创建；这里提供查询、修改和删除

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use courier_errors::AppResult;

use crate::api::{AppState, found, no_content};
use crate::application::dto::ParcelDto;
use crate::domain::value_objects::ParcelId;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", get(fetch).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ParcelDto>>> {
    Ok(Json(state.services.parcels.get_all().await?))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<ParcelId>,
) -> AppResult<Json<ParcelDto>> {
    found(state.services.parcels.get_by_id(&id).await?, "Parcel").map(Json)
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<ParcelId>,
    Json(dto): Json<ParcelDto>,
) -> AppResult<Json<ParcelDto>> {
    found(state.services.parcels.update(&id, dto).await?, "Parcel").map(Json)
}

async fn remove(State(state): State<AppState>, Path(id): Path<ParcelId>) -> AppResult<StatusCode> {
    no_content(state.services.parcels.delete(&id).await?, "Parcel")
}
