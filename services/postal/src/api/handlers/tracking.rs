use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use courier_errors::AppResult;

use crate::api::{AppState, found, no_content};
use crate::application::dto::ShipmentTrackingDetailDto;
use crate::domain::value_objects::ShipmentTrackingDetailId;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(fetch).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ShipmentTrackingDetailDto>>> {
    Ok(Json(state.services.tracking.get_all().await?))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<ShipmentTrackingDetailId>,
) -> AppResult<Json<ShipmentTrackingDetailDto>> {
    found(state.services.tracking.get_by_id(&id).await?, "Tracking record").map(Json)
}

async fn create(
    State(state): State<AppState>,
    Json(dto): Json<ShipmentTrackingDetailDto>,
) -> AppResult<(StatusCode, Json<ShipmentTrackingDetailDto>)> {
    let saved = state.services.tracking.save(dto).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<ShipmentTrackingDetailId>,
    Json(dto): Json<ShipmentTrackingDetailDto>,
) -> AppResult<Json<ShipmentTrackingDetailDto>> {
    found(state.services.tracking.update(&id, dto).await?, "Tracking record").map(Json)
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ShipmentTrackingDetailId>,
) -> AppResult<StatusCode> {
    no_content(state.services.tracking.delete(&id).await?, "Tracking record")
}
