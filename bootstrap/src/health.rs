//! 健康检查模块
//!
//! 提供 /health、/ready 和 /metrics 端点

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;

use crate::metrics::MetricsRecorder;

/// 单项或整体的健康状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    Unhealthy,
}

/// 健康检查报告
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: Health,
    pub version: &'static str,
    pub checks: Vec<ComponentHealth>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: Health,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: Health::Healthy,
            version: env!("CARGO_PKG_VERSION"),
            checks: vec![],
        }
    }

    /// 任一组件不健康时整体不健康
    pub fn add_check(&mut self, check: ComponentHealth) {
        if check.status == Health::Unhealthy {
            self.status = Health::Unhealthy;
        }
        self.checks.push(check);
    }

    pub fn is_healthy(&self) -> bool {
        self.status == Health::Healthy
    }
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Health::Healthy,
            message: None,
        }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Health::Unhealthy,
            message: Some(message.into()),
        }
    }
}

/// 健康检查器
pub struct HealthChecker {
    postgres: Option<PgPool>,
}

impl HealthChecker {
    pub fn new(postgres: Option<PgPool>) -> Self {
        Self { postgres }
    }

    /// 执行存活检查（liveness）
    ///
    /// 只检查服务是否在运行，不检查依赖
    pub async fn liveness(&self) -> HealthStatus {
        HealthStatus::healthy()
    }

    /// 执行就绪检查（readiness）
    pub async fn readiness(&self) -> HealthStatus {
        let mut status = HealthStatus::healthy();

        match &self.postgres {
            Some(pool) => match courier_adapter_postgres::check_connection(pool).await {
                Ok(()) => status.add_check(ComponentHealth::healthy("postgres")),
                Err(e) => status.add_check(ComponentHealth::unhealthy("postgres", e.to_string())),
            },
            None => status.add_check(ComponentHealth::healthy("memory-store")),
        }

        status
    }
}

#[derive(Clone)]
struct HealthState {
    checker: Arc<HealthChecker>,
    metrics: MetricsRecorder,
}

/// 构建健康检查路由
pub fn health_routes(checker: Arc<HealthChecker>, metrics: MetricsRecorder) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(HealthState { checker, metrics })
}

/// Liveness 端点处理器
async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let status = state.checker.liveness().await;
    (StatusCode::OK, Json(status))
}

/// Readiness 端点处理器
async fn ready_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let status = state.checker.readiness().await;
    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

/// Metrics 端点处理器
async fn metrics_handler(State(state): State<HealthState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn test_unhealthy_check_flips_status() {
        let mut status = HealthStatus::healthy();
        status.add_check(ComponentHealth::healthy("a"));
        assert!(status.is_healthy());
        status.add_check(ComponentHealth::unhealthy("b", "down"));
        assert!(!status.is_healthy());
        assert_eq!(status.checks.len(), 2);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let mut status = HealthStatus::healthy();
        status.add_check(ComponentHealth::unhealthy("postgres", "connection refused"));
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["checks"][0]["message"], "connection refused");
    }

    #[tokio::test]
    async fn test_ready_without_database() {
        let app = health_routes(Arc::new(HealthChecker::new(None)), MetricsRecorder::disabled());
        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_disabled_renders_empty() {
        let app = health_routes(Arc::new(HealthChecker::new(None)), MetricsRecorder::disabled());
        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }
}
