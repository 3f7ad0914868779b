//! Metrics 模块
//!
//! 提供 Prometheus metrics 导出

use metrics_exporter_prometheus::PrometheusHandle;
use tracing::warn;

/// Metrics 记录器
///
/// 全局 recorder 只能安装一次；安装失败（例如测试中重复安装）时退化为空输出。
#[derive(Clone)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl MetricsRecorder {
    /// 安装 Prometheus recorder
    pub fn install() -> Self {
        match courier_telemetry::init_metrics() {
            Ok(handle) => Self {
                handle: Some(handle),
            },
            Err(e) => {
                warn!("Prometheus recorder not installed: {}", e);
                Self::disabled()
            }
        }
    }

    /// 不导出任何指标
    pub fn disabled() -> Self {
        Self { handle: None }
    }

    /// 获取 Prometheus 格式的 metrics
    pub fn render(&self) -> String {
        self.handle
            .as_ref()
            .map(PrometheusHandle::render)
            .unwrap_or_default()
    }
}
