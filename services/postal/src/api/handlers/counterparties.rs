use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use courier_errors::AppResult;

use crate::api::{AppState, found, no_content};
use crate::application::dto::{ClientDto, CounterpartyDto};
use crate::domain::value_objects::CounterpartyId;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(fetch).put(update).delete(remove))
        .route("/{id}/clients", get(clients))
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CounterpartyDto>>> {
    Ok(Json(state.services.counterparties.get_all().await?))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<CounterpartyId>,
) -> AppResult<Json<CounterpartyDto>> {
    found(state.services.counterparties.get_by_id(&id).await?, "Counterparty").map(Json)
}

async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CounterpartyDto>,
) -> AppResult<(StatusCode, Json<CounterpartyDto>)> {
    let saved = state.services.counterparties.save(dto).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<CounterpartyId>,
    Json(dto): Json<CounterpartyDto>,
) -> AppResult<Json<CounterpartyDto>> {
    found(state.services.counterparties.update(&id, dto).await?, "Counterparty").map(Json)
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<CounterpartyId>,
) -> AppResult<StatusCode> {
    no_content(state.services.counterparties.delete(&id).await?, "Counterparty")
}

async fn clients(
    State(state): State<AppState>,
    Path(id): Path<CounterpartyId>,
) -> AppResult<Json<Vec<ClientDto>>> {
    found(state.services.clients.get_all_by_counterparty(&id).await?, "Counterparty").map(Json)
}
