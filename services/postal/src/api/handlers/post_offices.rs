use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use courier_errors::AppResult;

use crate::api::{AppState, found, no_content};
use crate::application::dto::PostOfficeDto;
use crate::domain::value_objects::PostOfficeId;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(fetch).put(update).delete(remove))
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<PostOfficeDto>>> {
    Ok(Json(state.services.post_offices.get_all().await?))
}

async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<PostOfficeId>,
) -> AppResult<Json<PostOfficeDto>> {
    found(state.services.post_offices.get_by_id(&id).await?, "Post office").map(Json)
}

async fn create(
    State(state): State<AppState>,
    Json(dto): Json<PostOfficeDto>,
) -> AppResult<(StatusCode, Json<PostOfficeDto>)> {
    let saved = state.services.post_offices.save(dto).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<PostOfficeId>,
    Json(dto): Json<PostOfficeDto>,
) -> AppResult<Json<PostOfficeDto>> {
    found(state.services.post_offices.update(&id, dto).await?, "Post office").map(Json)
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<PostOfficeId>,
) -> AppResult<StatusCode> {
    no_content(state.services.post_offices.delete(&id).await?, "Post office")
}
