use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use courier_errors::AppResult;

use crate::api::{AppState, found, no_content};
use crate::application::dto::{
    ParcelDto, ShipmentDto, ShipmentTrackingDetailDto, UpdateShipmentDto,
};
use crate::domain::value_objects::ShipmentId;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(fetch).put(update).delete(remove))
        .route("/{id}/parcels", get(parcels).post(add_parcels))
        .route("/{id}/tracking", get(tracking))
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ShipmentDto>>> {
    Ok(Json(state.services.shipments.get_all().await?))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<ShipmentId>,
) -> AppResult<Json<ShipmentDto>> {
    found(state.services.shipments.get_by_id(&id).await?, "Shipment").map(Json)
}

async fn create(
    State(state): State<AppState>,
    Json(dto): Json<ShipmentDto>,
) -> AppResult<(StatusCode, Json<ShipmentDto>)> {
    let saved = state.services.shipments.save(dto).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<ShipmentId>,
    Json(dto): Json<UpdateShipmentDto>,
) -> AppResult<Json<ShipmentDto>> {
    found(state.services.shipments.update(&id, dto).await?, "Shipment").map(Json)
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ShipmentId>,
) -> AppResult<StatusCode> {
    no_content(state.services.shipments.delete(&id).await?, "Shipment")
}

async fn parcels(
    State(state): State<AppState>,
    Path(id): Path<ShipmentId>,
) -> AppResult<Json<Vec<ParcelDto>>> {
    found(state.services.parcels.get_by_shipment(&id).await?, "Shipment").map(Json)
}

/// 新包裹排在已有包裹之前
async fn add_parcels(
    State(state): State<AppState>,
    Path(id): Path<ShipmentId>,
    Json(parcels): Json<Vec<ParcelDto>>,
) -> AppResult<StatusCode> {
    let added = state.services.shipments.add_parcels_to_shipment(&id, parcels).await?;
    no_content(added, "Shipment")
}

async fn tracking(
    State(state): State<AppState>,
    Path(id): Path<ShipmentId>,
) -> AppResult<Json<Vec<ShipmentTrackingDetailDto>>> {
    found(state.services.tracking.get_by_shipment(&id).await?, "Shipment").map(Json)
}
