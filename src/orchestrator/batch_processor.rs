//! 批量报告处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量表单的导出和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化日志文件、准备报告抬头、启动无头浏览器
//! 2. **批量加载**：扫描并加载所有表单（`Vec<ReportForm>`）
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：每批完成后再开始下一批
//! 5. **资源管理**：持有 Browser，每份表单独占一个 Page 和一个 Exporter
//! 6. **全局统计**：汇总结果并写出 summary.json

use crate::browser;
use crate::config::Config;
use crate::infrastructure::{ChromePdfRenderer, PdfRenderer};
use crate::models::{ReportForm, StudentPhoto};
use crate::orchestrator::report_processor::{process_report, ReportStatus, ReportSummary};
use crate::services::{Branding, Exporter, WarnWriter};
use crate::utils::logging::{
    append_log_line, init_log_file, log_batch_complete, log_batch_start, log_forms_loaded,
    log_startup, print_final_stats,
};
use crate::workflow::ReportCtx;
use anyhow::{Context, Result};
use chromiumoxide::Browser;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub exported: usize,
    pub rejected: usize,
    pub failed: usize,
    pub total: usize,
}

impl ProcessingStats {
    pub fn from_summaries(summaries: &[ReportSummary]) -> Self {
        let mut stats = Self {
            total: summaries.len(),
            ..Default::default()
        };
        for summary in summaries {
            match summary.status {
                ReportStatus::Exported => stats.exported += 1,
                ReportStatus::Rejected => stats.rejected += 1,
                ReportStatus::Failed => stats.failed += 1,
            }
        }
        stats
    }
}

/// 同一次运行中所有导出共享的参数
pub struct BatchTarget {
    pub output_dir: PathBuf,
    pub branding: Branding,
    pub warn_writer: Arc<WarnWriter>,
    /// 是否输出每份报告的详细计算结果
    pub verbose: bool,
}

/// 应用主结构
pub struct App {
    config: Config,
    target: BatchTarget,
    browser: Browser,
    handler: JoinHandle<()>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(config.max_concurrent_reports, &config.output_dir);

        let branding = load_branding(&config).await;

        let (browser, handler) =
            browser::launch_headless_browser(config.chrome_executable.as_deref()).await?;

        let target = BatchTarget {
            output_dir: PathBuf::from(&config.output_dir),
            branding,
            warn_writer: Arc::new(WarnWriter::with_path(config.warn_file.clone())),
            verbose: config.verbose_logging,
        };

        Ok(Self {
            config,
            target,
            browser,
            handler,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        info!("\n📁 正在扫描表单目录: {}", self.config.form_folder);
        let forms = crate::models::load_all_forms(&self.config.form_folder).await?;

        if forms.is_empty() {
            warn!("⚠️ 没有找到待处理的TOML文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_forms_loaded(forms.len(), self.config.max_concurrent_reports);

        let summaries = self.process_all_forms(forms).await;
        let stats = ProcessingStats::from_summaries(&summaries);

        let summary_path = Path::new(&self.config.output_dir).join("summary.json");
        write_summary(&summary_path, &summaries).await?;
        info!("🧾 汇总已写入: {}", summary_path.display());

        print_final_stats(
            stats.exported,
            stats.rejected,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 关闭浏览器
    pub async fn shutdown(mut self) -> Result<()> {
        if let Err(e) = self.browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
        let _ = self.browser.wait().await;
        let _ = self.handler.await;
        Ok(())
    }

    /// 分批处理所有表单
    async fn process_all_forms(&self, forms: Vec<ReportForm>) -> Vec<ReportSummary> {
        let batch_size = self.config.max_concurrent_reports;
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total = forms.len();
        let total_batches = total.div_ceil(batch_size);
        let mut summaries = Vec::with_capacity(total);

        for (batch_idx, batch) in forms.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            let batch_num = batch_idx + 1;

            log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total,
            );

            let chrome = &self.browser;
            let open_page = || async move {
                browser::new_blank_page(chrome)
                    .await
                    .map(ChromePdfRenderer::new)
            };
            let batch_summaries =
                run_batch(batch, batch_start, &semaphore, &self.target, open_page).await;

            let exported = batch_summaries
                .iter()
                .filter(|s| s.status == ReportStatus::Exported)
                .count();
            log_batch_complete(batch_num, exported, batch_summaries.len());

            for summary in &batch_summaries {
                let line = format!(
                    "{} | {} | {:?}{}",
                    summary.form_file,
                    summary.student_name,
                    summary.status,
                    summary
                        .message
                        .as_deref()
                        .map(|m| format!(" | {}", m))
                        .unwrap_or_default()
                );
                if let Err(e) = append_log_line(&self.config.output_log_file, &line) {
                    error!("写入日志文件失败: {}", e);
                }
            }
            summaries.extend(batch_summaries);
        }

        summaries
    }
}

/// 处理单个批次，每份表单一个渲染器、一个导出器
///
/// 某份表单打不开渲染器时记为 Failed，批次里的其他表单照常处理。
pub async fn run_batch<R, F, Fut>(
    batch: &[ReportForm],
    batch_start: usize,
    semaphore: &Arc<Semaphore>,
    target: &BatchTarget,
    open_renderer: F,
) -> Vec<ReportSummary>
where
    R: PdfRenderer + 'static,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let mut pending = Vec::with_capacity(batch.len());

    for (idx, form) in batch.iter().enumerate() {
        let ctx = ReportCtx::new(
            batch_start + idx + 1,
            form.file_path.clone().unwrap_or_default(),
            form.display_name(),
        )
        .with_verbose(target.verbose);

        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                error!("{} ❌ 无法获取并发许可: {}", ctx, e);
                pending.push((ctx, Err(e.to_string())));
                continue;
            }
        };
        let renderer = match open_renderer().await {
            Ok(renderer) => renderer,
            Err(e) => {
                error!("{} ❌ 创建页面失败: {:#}", ctx, e);
                pending.push((ctx, Err(format!("{:#}", e))));
                continue;
            }
        };

        let exporter = Exporter::new(
            renderer,
            target.output_dir.clone(),
            target.branding.clone(),
        );
        let form = form.clone();
        let warn_writer = target.warn_writer.clone();
        let task_ctx = ctx.clone();

        let handle = tokio::spawn(async move {
            let _permit = permit;
            let summary = process_report(&task_ctx, &form, &exporter, &warn_writer).await;
            exporter.renderer().release().await;
            summary
        });
        pending.push((ctx, Ok(handle)));
    }

    let mut summaries = Vec::with_capacity(pending.len());
    for (ctx, task) in pending {
        let summary = match task {
            Ok(handle) => match handle.await {
                Ok(summary) => summary,
                Err(e) => {
                    error!("{} 任务执行失败: {}", ctx, e);
                    ReportSummary::failed(&ctx, e.to_string())
                }
            },
            Err(message) => ReportSummary::failed(&ctx, message),
        };
        summaries.push(summary);
    }

    summaries
}

/// 根据配置准备报告抬头；logo 读取失败时不显示 logo
async fn load_branding(config: &Config) -> Branding {
    let logo = match &config.institute_logo {
        Some(path) => match StudentPhoto::load(Path::new(path)).await {
            Ok(image) => Some(image.data_url().to_string()),
            Err(e) => {
                warn!("⚠️ logo 加载失败 ({}): {:#}", path, e);
                None
            }
        },
        None => None,
    };
    Branding {
        institute_name: config.institute_name.clone(),
        address: config.institute_address.clone(),
        phone: config.institute_phone.clone(),
        logo,
    }
}

/// 写出 summary.json
pub async fn write_summary(path: &Path, summaries: &[ReportSummary]) -> Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("无法创建目录: {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(summaries)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("无法写入汇总文件: {}", path.display()))?;
    Ok(())
}
