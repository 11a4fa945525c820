//! PDF 导出 - 业务能力层
//!
//! 流程：必填检查 → 防重入 → 渲染 → 写文件。
//! 进行中标志在渲染前置位，由 `ExportGuard` 在任何结局下复位。

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{error, info, warn};

use crate::error::ExportError;
use crate::infrastructure::pdf::{PdfRenderer, PdfSettings};
use crate::services::presenter::Branding;
use crate::workflow::ReportSession;

/// 缺少必填字段时给用户的提示
pub const MISSING_FIELDS_WARNING: &str =
    "⚠️ Please fill all required fields before downloading the report.";

/// 渲染失败时给用户的提示
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to generate PDF. Please try again.";

/// 导出结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub bytes: usize,
}

/// 进行中标志的守卫，drop 时复位
struct ExportGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ExportGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// 报告导出器
///
/// 一个导出器对应一个"下载"按钮：同一时间只允许一次导出。
pub struct Exporter<R> {
    renderer: R,
    output_dir: PathBuf,
    branding: Branding,
    settings: PdfSettings,
    in_flight: AtomicBool,
}

impl<R: PdfRenderer> Exporter<R> {
    pub fn new(renderer: R, output_dir: impl Into<PathBuf>, branding: Branding) -> Self {
        Self {
            renderer,
            output_dir: output_dir.into(),
            branding,
            settings: PdfSettings::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// 是否有导出正在进行（对应按钮禁用状态）
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// 导出当前会话
    pub async fn export(&self, session: &ReportSession) -> Result<ExportOutcome, ExportError> {
        let record = session.record();
        let missing = record.missing_required_fields();
        if !missing.is_empty() {
            warn!("{} (缺少: {})", MISSING_FIELDS_WARNING, missing.join(", "));
            return Err(ExportError::MissingFields(missing));
        }

        let Some(_guard) = ExportGuard::acquire(&self.in_flight) else {
            warn!("⏳ 已有导出正在进行，忽略本次请求");
            return Err(ExportError::Busy);
        };

        let path = self.output_dir.join(report_file_name(&record.student_name));
        info!("📄 正在生成 PDF: {}", path.display());

        match self.render_and_write(session, &path).await {
            Ok(bytes) => {
                info!("✅ PDF 已保存: {} ({} 字节)", path.display(), bytes);
                Ok(ExportOutcome { path, bytes })
            }
            Err(e) => {
                error!("Failed to generate PDF: {}", e);
                error!("❌ {}", EXPORT_FAILED_MESSAGE);
                Err(e)
            }
        }
    }

    async fn render_and_write(
        &self,
        session: &ReportSession,
        path: &Path,
    ) -> Result<usize, ExportError> {
        let html = session.render(&self.branding);
        let pdf = self.renderer.render_pdf(&html, &self.settings).await?;

        let write_failed = |source| ExportError::WriteFailed {
            path: path.display().to_string(),
            source,
        };
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(write_failed)?;
        tokio::fs::write(path, &pdf).await.map_err(write_failed)?;
        Ok(pdf.len())
    }
}

fn unsafe_file_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"[\\/:*?"<>|\x00-\x1f]"#).expect("静态正则"))
}

/// `<学生姓名或 student>_report.pdf`，文件名中的非法字符替换为 `_`
pub fn report_file_name(student_name: &str) -> String {
    let name = if student_name.is_empty() {
        "student"
    } else {
        student_name
    };
    format!("{}_report.pdf", unsafe_file_chars().replace_all(name, "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldEdit;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// 假渲染器：记录调用次数，可选择失败或等待放行
    #[derive(Default)]
    struct FakeRenderer {
        calls: AtomicUsize,
        fail: bool,
        gate: Option<Notify>,
    }

    impl PdfRenderer for FakeRenderer {
        async fn render_pdf(
            &self,
            preview_html: &str,
            settings: &PdfSettings,
        ) -> Result<Vec<u8>, ExportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(preview_html.contains("report-preview"));
            assert_eq!(settings.jpeg_quality(), 98);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(ExportError::render_failed("rasterization failed"));
            }
            Ok(b"%PDF-1.7 fake".to_vec())
        }
    }

    fn complete_session() -> ReportSession {
        let mut session = ReportSession::new();
        for (name, value) in [
            ("month", "2025-10"),
            ("studentName", "Ali Raza"),
            ("fatherName", "Imran Raza"),
            ("courseName", "Data Science"),
            ("batchCode", "DS-14"),
            ("timing", "05:00 PM - 06:00 PM"),
            ("test", "88"),
            ("totalDays", "20"),
            ("presentDays", "18"),
        ] {
            session.apply(&FieldEdit::named(name, value).unwrap()).unwrap();
        }
        session
    }

    fn pdf_files(dir: &Path) -> Vec<PathBuf> {
        match std::fs::read_dir(dir) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_export_writes_exactly_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(FakeRenderer::default(), dir.path(), Branding::default());

        let outcome = exporter.export(&complete_session()).await.unwrap();

        assert_eq!(outcome.path, dir.path().join("Ali Raza_report.pdf"));
        assert_eq!(outcome.bytes, 13);
        assert_eq!(pdf_files(dir.path()), vec![outcome.path.clone()]);
        assert_eq!(exporter.renderer().calls.load(Ordering::SeqCst), 1);
        assert!(!exporter.is_busy());
    }

    #[tokio::test]
    async fn test_missing_field_aborts_without_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let exporter = Exporter::new(FakeRenderer::default(), &out, Branding::default());

        for field in ["month", "fatherName", "batchCode", "presentDays"] {
            let mut session = complete_session();
            session.apply(&FieldEdit::named(field, "").unwrap()).unwrap();

            let err = exporter.export(&session).await.unwrap_err();
            match err {
                ExportError::MissingFields(missing) => assert_eq!(missing, vec![field]),
                other => panic!("意外的错误: {other}"),
            }
        }

        assert_eq!(exporter.renderer().calls.load(Ordering::SeqCst), 0);
        assert!(pdf_files(&out).is_empty());
    }

    #[tokio::test]
    async fn test_zero_present_days_counts_as_blank() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(FakeRenderer::default(), dir.path(), Branding::default());
        let mut session = complete_session();
        session.apply(&FieldEdit::named("presentDays", "0").unwrap()).unwrap();

        assert!(matches!(
            exporter.export(&session).await,
            Err(ExportError::MissingFields(_))
        ));
    }

    #[tokio::test]
    async fn test_render_failure_clears_busy_flag() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = FakeRenderer {
            fail: true,
            ..Default::default()
        };
        let exporter = Exporter::new(renderer, dir.path(), Branding::default());

        let err = exporter.export(&complete_session()).await.unwrap_err();
        assert!(matches!(err, ExportError::RenderFailed { .. }));
        assert!(!exporter.is_busy());
        assert!(pdf_files(dir.path()).is_empty());

        // 失败后可以再次导出
        assert!(matches!(
            exporter.export(&complete_session()).await,
            Err(ExportError::RenderFailed { .. })
        ));
        assert_eq!(exporter.renderer().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_overlapping_export_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = FakeRenderer {
            gate: Some(Notify::new()),
            ..Default::default()
        };
        let exporter = Exporter::new(renderer, dir.path(), Branding::default());
        let session = complete_session();

        let first = exporter.export(&session);
        let second = async {
            while !exporter.is_busy() {
                tokio::task::yield_now().await;
            }
            let result = exporter.export(&session).await;
            if let Some(gate) = &exporter.renderer().gate {
                gate.notify_one();
            }
            result
        };

        let (first, second) = tokio::join!(first, second);

        assert!(first.is_ok());
        assert!(matches!(second, Err(ExportError::Busy)));
        assert_eq!(exporter.renderer().calls.load(Ordering::SeqCst), 1);
        assert!(!exporter.is_busy());
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("Ali Raza"), "Ali Raza_report.pdf");
        assert_eq!(report_file_name(""), "student_report.pdf");
        assert_eq!(report_file_name("a/b\\c:d"), "a_b_c_d_report.pdf");
    }
}
