//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 安装全局 tracing 订阅者
///
/// `RUST_LOG` 优先，默认 info。详细输出由 `Config::verbose_logging` 控制。
/// 重复调用是安全的（测试中常见）。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
