use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use courier_errors::AppResult;
use serde::Deserialize;

use crate::api::{AppState, found, no_content};
use crate::application::dto::TariffGridDto;
use crate::domain::enums::W2wVariation;
use crate::domain::value_objects::TariffGridId;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/by-dimension", get(by_dimension))
        .route("/{id}", get(fetch).put(update).delete(remove))
}

/// `?weight=2.5&length=40&variation=TOWN`
#[derive(Debug, Deserialize)]
struct DimensionQuery {
    weight: f64,
    length: f64,
    variation: W2wVariation,
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<TariffGridDto>>> {
    Ok(Json(state.services.tariffs.get_all().await?))
}

async fn by_dimension(
    State(state): State<AppState>,
    Query(query): Query<DimensionQuery>,
) -> AppResult<Json<TariffGridDto>> {
    let tariff = state
        .services
        .tariffs
        .get_by_dimension(query.weight, query.length, query.variation)
        .await?;
    Ok(Json(tariff))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<TariffGridId>,
) -> AppResult<Json<TariffGridDto>> {
    found(state.services.tariffs.get_by_id(&id).await?, "Tariff").map(Json)
}

async fn create(
    State(state): State<AppState>,
    Json(dto): Json<TariffGridDto>,
) -> AppResult<(StatusCode, Json<TariffGridDto>)> {
    let saved = state.services.tariffs.save(dto).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<TariffGridId>,
    Json(dto): Json<TariffGridDto>,
) -> AppResult<Json<TariffGridDto>> {
    found(state.services.tariffs.update(&id, dto).await?, "Tariff").map(Json)
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<TariffGridId>,
) -> AppResult<StatusCode> {
    no_content(state.services.tariffs.delete(&id).await?, "Tariff")
}
