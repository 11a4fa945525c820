use std::path::Path;

use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::BrowserError;

/// 启动无头浏览器
///
/// 未指定可执行文件时由 chromiumoxide 自动查找本机的 Chrome/Chromium。
/// 返回的 JoinHandle 负责驱动浏览器事件，浏览器关闭后自然结束。
pub async fn launch_headless_browser(
    chrome_executable: Option<&str>,
) -> Result<(Browser, JoinHandle<()>)> {
    info!("🚀 启动无头浏览器...");

    let mut builder = BrowserConfig::builder().new_headless_mode().args(vec![
        "--disable-gpu",             // Windows 无头模式必须禁用 GPU
        "--no-sandbox",              // 禁用沙盒，防止权限问题导致的崩溃
        "--disable-dev-shm-usage",   // 防止共享内存不足
        "--hide-scrollbars",         // 截图中不出现滚动条
        "--remote-debugging-port=0", // 让浏览器自动选择端口
    ]);
    if let Some(path) = chrome_executable {
        debug!("浏览器可执行文件: {}", path);
        builder = builder.chrome_executable(Path::new(path));
    }

    let config = builder.build().map_err(|message| {
        error!("配置无头浏览器失败: {}", message);
        BrowserError::ConfigurationFailed { message }
    })?;

    // 启动浏览器
    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        BrowserError::LaunchFailed {
            source: Box::new(e),
        }
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    let handle = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    Ok((browser, handle))
}

/// 创建一个空白页面
pub async fn new_blank_page(browser: &Browser) -> Result<Page> {
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        BrowserError::PageCreationFailed {
            source: Box::new(e),
        }
    })?;
    Ok(page)
}
