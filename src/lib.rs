//! # Monthly Report
//!
//! 学生月度成绩报告的编辑、预览与 PDF 导出
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `ChromePdfRenderer` - 预览截图、分页、打印 PDF
//! - `PdfSettings` / `paginate` - A4 分页计算
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单份报告
//! - `aggregator` - 总分、百分比、等级、出勤率
//! - `presenter` - 记录 → 预览 HTML
//! - `Exporter` - 校验必填项、防止重复导出、写出 PDF
//! - `WarnWriter` - 写 warn.txt 能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 一份报告的编辑状态
//! - `ReportCtx` - 上下文封装（序号 + 表单文件）
//! - `ReportSession` - 记录、启用的成绩类别、学生照片
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量处理器，管理资源和并发
//! - `orchestrator/report_processor` - 单份报告处理器
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::launch_headless_browser;
pub use config::Config;
pub use error::{AppError, AppResult, ExportError, FormError};
pub use infrastructure::{ChromePdfRenderer, PdfRenderer, PdfSettings};
pub use models::{ActiveFieldSet, Category, FieldEdit, ReportField, ReportForm, ReportRecord};
pub use orchestrator::{process_report, App};
pub use services::{Branding, Exporter};
pub use workflow::{ReportCtx, ReportSession};
