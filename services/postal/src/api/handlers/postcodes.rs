use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use courier_errors::AppResult;

use crate::api::{AppState, found, no_content};
use crate::application::dto::{BarcodeInnerNumberDto, PostcodePoolDto};
use crate::domain::value_objects::{BarcodeInnerNumberId, PostcodePoolId};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(fetch).put(update).delete(remove))
        .route("/{id}/barcodes", get(list_barcodes).post(add_barcodes))
        .route("/{id}/barcodes/generate", post(generate_barcode))
        .route(
            "/{id}/barcodes/{barcode_id}",
            get(fetch_barcode).put(update_barcode).delete(remove_barcode),
        )
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<PostcodePoolDto>>> {
    Ok(Json(state.services.postcode_pools.get_all().await?))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<PostcodePoolId>,
) -> AppResult<Json<PostcodePoolDto>> {
    found(state.services.postcode_pools.get_by_id(&id).await?, "Postcode pool").map(Json)
}

async fn create(
    State(state): State<AppState>,
    Json(dto): Json<PostcodePoolDto>,
) -> AppResult<(StatusCode, Json<PostcodePoolDto>)> {
    let saved = state.services.postcode_pools.save(dto).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<PostcodePoolId>,
    Json(dto): Json<PostcodePoolDto>,
) -> AppResult<Json<PostcodePoolDto>> {
    found(state.services.postcode_pools.update(&id, dto).await?, "Postcode pool").map(Json)
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<PostcodePoolId>,
) -> AppResult<StatusCode> {
    no_content(state.services.postcode_pools.delete(&id).await?, "Postcode pool")
}

// ========== 条码 ==========

async fn list_barcodes(
    State(state): State<AppState>,
    Path(id): Path<PostcodePoolId>,
) -> AppResult<Json<Vec<BarcodeInnerNumberDto>>> {
    found(state.services.postcode_pools.get_barcodes(&id).await?, "Postcode pool").map(Json)
}

async fn add_barcodes(
    State(state): State<AppState>,
    Path(id): Path<PostcodePoolId>,
    Json(barcodes): Json<Vec<BarcodeInnerNumberDto>>,
) -> AppResult<StatusCode> {
    let added = state
        .services
        .postcode_pools
        .add_barcode_inner_numbers(&id, barcodes)
        .await?;
    no_content(added, "Postcode pool")
}

async fn generate_barcode(
    State(state): State<AppState>,
    Path(id): Path<PostcodePoolId>,
) -> AppResult<(StatusCode, Json<BarcodeInnerNumberDto>)> {
    let barcode = state.services.postcode_pools.generate_barcode_inner_number(&id).await?;
    found(barcode, "Postcode pool").map(|b| (StatusCode::CREATED, Json(b)))
}

async fn fetch_barcode(
    State(state): State<AppState>,
    Path((id, barcode_id)): Path<(PostcodePoolId, BarcodeInnerNumberId)>,
) -> AppResult<Json<BarcodeInnerNumberDto>> {
    let barcode = state.services.postcode_pools.get_barcode(&id, &barcode_id).await?;
    found(barcode, "Barcode").map(Json)
}

async fn update_barcode(
    State(state): State<AppState>,
    Path((id, barcode_id)): Path<(PostcodePoolId, BarcodeInnerNumberId)>,
    Json(dto): Json<BarcodeInnerNumberDto>,
) -> AppResult<Json<BarcodeInnerNumberDto>> {
    let barcode = state
        .services
        .postcode_pools
        .update_barcode(&id, &barcode_id, dto)
        .await?;
    found(barcode, "Barcode").map(Json)
}

async fn remove_barcode(
    State(state): State<AppState>,
    Path((id, barcode_id)): Path<(PostcodePoolId, BarcodeInnerNumberId)>,
) -> AppResult<StatusCode> {
    let deleted = state.services.postcode_pools.delete_barcode(&id, &barcode_id).await?;
    no_content(deleted, "Barcode")
}
