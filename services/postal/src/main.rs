use courier_bootstrap::{Infrastructure, run_http};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 本地开发时从 .env 读取 APP_ 前缀的覆盖项
    dotenvy::dotenv().ok();

    run_http("config", |infra: Infrastructure| async move {
        info!("Initializing postal service...");
        postal::build_app(&infra).await
    })
    .await
}
