//! telemetry - 可观测性库

use metrics::describe_counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化 tracing
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init();
}

/// 初始化 Prometheus metrics，并登记业务计数器说明
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_counter!(names::SHIPMENTS_CREATED, "Shipments created with an issued barcode");
    describe_counter!(names::SHIPMENTS_DELETED, "Shipments deleted");
    describe_counter!(names::BARCODES_ISSUED, "Barcode inner numbers issued from postcode pools");
    Ok(handle)
}

/// 业务指标名称
pub mod names {
    pub const SHIPMENTS_CREATED: &str = "postal_shipments_created_total";
    pub const SHIPMENTS_DELETED: &str = "postal_shipments_deleted_total";
    pub const BARCODES_ISSUED: &str = "postal_barcodes_issued_total";
}

/// 记录业务计数
pub fn increment_counter(name: &'static str) {
    metrics::counter!(name).increment(1);
}
