//! 单份报告处理器 - 编排层
//!
//! 回放一份表单 → 导出 PDF → 记录结果。
//! 缺少必填项或选项无效的表单写入 warn.txt，不视为程序错误。

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::ExportError;
use crate::infrastructure::PdfRenderer;
use crate::models::ReportForm;
use crate::services::{Exporter, WarnWriter};
use crate::workflow::{ReportCtx, ReportSession};

/// 单份报告的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// 已生成 PDF
    Exported,
    /// 表单不完整或含无效选项
    Rejected,
    /// 渲染或写文件失败
    Failed,
}

/// 写入 summary.json 的一条记录
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub form_file: String,
    pub student_name: String,
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ReportSummary {
    fn new(ctx: &ReportCtx, status: ReportStatus) -> Self {
        Self {
            form_file: ctx.form_file.clone(),
            student_name: ctx.student_name.clone(),
            status,
            output: None,
            message: None,
        }
    }

    /// 未能进入导出流程的表单（页面创建失败、任务中断）
    pub fn failed(ctx: &ReportCtx, message: impl Into<String>) -> Self {
        Self::new(ctx, ReportStatus::Failed).with_message(message)
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// 处理一份表单
pub async fn process_report<R: PdfRenderer>(
    ctx: &ReportCtx,
    form: &ReportForm,
    exporter: &Exporter<R>,
    warn_writer: &WarnWriter,
) -> ReportSummary {
    info!("{} 🔄 开始处理", ctx);

    let session = match ReportSession::from_form(form).await {
        Ok(session) => session,
        Err(e) => {
            let reason = format!("{:#}", e);
            warn!("{} ⚠️ 表单无效: {}", ctx, reason);
            write_warn(warn_writer, ctx, &reason);
            return ReportSummary::new(ctx, ReportStatus::Rejected).with_message(reason);
        }
    };

    let derived = &session.record().derived;
    if ctx.verbose {
        info!(
            "{} 📊 总分 {} | 百分比 {}% | 等级 {} | 出勤 {}%",
            ctx, derived.total, derived.percentage, derived.grade, derived.attendance_percentage
        );
    } else {
        debug!("{} 总分 {} | 等级 {}", ctx, derived.total, derived.grade);
    }

    match exporter.export(&session).await {
        Ok(outcome) => {
            info!("{} ✅ 导出完成", ctx);
            let mut summary = ReportSummary::new(ctx, ReportStatus::Exported);
            summary.output = Some(outcome.path.display().to_string());
            summary
        }
        Err(e @ ExportError::MissingFields(_)) => {
            let reason = e.to_string();
            warn!("{} ⚠️ 跳过: {}", ctx, reason);
            write_warn(warn_writer, ctx, &reason);
            ReportSummary::new(ctx, ReportStatus::Rejected).with_message(reason)
        }
        Err(e) => {
            error!("{} ❌ 导出失败: {}", ctx, e);
            ReportSummary::new(ctx, ReportStatus::Failed).with_message(e.to_string())
        }
    }
}

fn write_warn(warn_writer: &WarnWriter, ctx: &ReportCtx, reason: &str) {
    if let Err(e) = warn_writer.write(&ctx.form_file, reason) {
        error!("{} 写入 {} 失败: {}", ctx, warn_writer.path(), e);
    }
}
