//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量导出和流程调度。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量报告处理器
//! - 管理应用生命周期（初始化、运行、清理）
//! - 批量加载表单（Vec<ReportForm>）
//! - 控制并发数量（Semaphore）
//! - 管理浏览器资源（Browser、每份表单一个 Page）
//! - 输出全局统计信息和 summary.json
//!
//! ### `report_processor` - 单份报告处理器
//! - 把表单回放成 ReportSession
//! - 调用 Exporter 导出 PDF
//! - 不完整的表单写入 warn.txt
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<ReportForm>)
//!     ↓
//! report_processor (处理单个 ReportForm)
//!     ↓
//! workflow::ReportSession (编辑状态)
//!     ↓
//! services (能力层：aggregate / present / export / warn)
//!     ↓
//! infrastructure (基础设施：ChromePdfRenderer)
//! ```

pub mod batch_processor;
pub mod report_processor;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
pub use report_processor::{process_report, ReportStatus, ReportSummary};
