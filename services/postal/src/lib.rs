//! postal - 快递 / 邮政后台服务
//!
//! 地址、邮编池与条码、合作方与客户、运单与包裹、资费表、邮局和运单跟踪。

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod seed;

use axum::Router;
use courier_bootstrap::Infrastructure;
use courier_config::PricingConfig;
use courier_errors::AppResult;
use tracing::info;

use api::AppState;
use application::{PostalServices, Repositories};
use domain::services::ParcelPricing;
use infrastructure::persistence::{InMemoryStore, postgres};

/// 按存储后端组装仓储，必要时执行迁移和演示数据写入，返回业务路由
pub async fn build_app(infra: &Infrastructure) -> AppResult<Router> {
    let config = infra.config();

    let repos = match infra.postgres_pool() {
        Some(pool) => {
            if config.database.as_ref().is_some_and(|db| db.run_migrations) {
                postgres::run_migrations(&pool).await?;
            }
            postgres::repositories(pool)
        }
        None => InMemoryStore::new().repositories(),
    };
    info!("Repositories initialized");

    let services = services(&repos, &config.pricing);
    if config.seed.enabled {
        seed::populate(&services, &repos).await?;
    }

    Ok(api::router(AppState::new(services)))
}

pub fn services(repos: &Repositories, pricing: &PricingConfig) -> PostalServices {
    PostalServices::new(repos, ParcelPricing::from(pricing))
}
