//! HTTP 接口
//!
//! 应用服务返回的 `None` / `false` 在这里统一转换为 404。

pub mod handlers;

use axum::Router;
use axum::http::StatusCode;
use courier_errors::{AppError, AppResult};

use crate::application::PostalServices;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub services: PostalServices,
}

impl AppState {
    pub fn new(services: PostalServices) -> Self {
        Self { services }
    }
}

/// 构建全部业务路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/addresses", handlers::addresses::routes())
        .nest("/postcodes", handlers::postcodes::routes())
        .nest("/counterparties", handlers::counterparties::routes())
        .nest("/clients", handlers::clients::routes())
        .nest("/post-offices", handlers::post_offices::routes())
        .nest("/tariffs", handlers::tariffs::routes())
        .nest("/shipments", handlers::shipments::routes())
        .nest("/parcels", handlers::parcels::routes())
        .nest("/shipment-tracking", handlers::tracking::routes())
        .with_state(state)
}

pub(crate) fn found<T>(value: Option<T>, what: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::not_found(format!("{} not found", what)))
}

pub(crate) fn no_content(done: bool, what: &str) -> AppResult<StatusCode> {
    if done {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("{} not found", what)))
    }
}
