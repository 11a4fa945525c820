//! 报告处理上下文
//!
//! 封装"我正在处理第几份表单、来自哪个文件"这一信息

use std::fmt::Display;

/// 报告处理上下文
#[derive(Debug, Clone)]
pub struct ReportCtx {
    /// 表单索引（从1开始，仅用于日志显示）
    pub report_index: usize,

    /// 表单文件路径
    pub form_file: String,

    /// 学生姓名（可能为空）
    pub student_name: String,

    /// 是否输出详细日志
    pub verbose: bool,
}

impl ReportCtx {
    pub fn new(report_index: usize, form_file: String, student_name: String) -> Self {
        Self {
            report_index,
            form_file,
            student_name,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Display for ReportCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.student_name.trim().is_empty() {
            write!(f, "[报告 #{} {}]", self.report_index, self.form_file)
        } else {
            write!(
                f,
                "[报告 #{} {} ({})]",
                self.report_index, self.student_name, self.form_file
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ctx = ReportCtx::new(3, "forms/ali.toml".to_string(), "Ali".to_string());
        assert_eq!(ctx.to_string(), "[报告 #3 Ali (forms/ali.toml)]");

        let anonymous = ReportCtx::new(1, "forms/x.toml".to_string(), " ".to_string());
        assert_eq!(anonymous.to_string(), "[报告 #1 forms/x.toml]");
    }

    #[test]
    fn test_verbose_flag() {
        let ctx = ReportCtx::new(1, "a.toml".to_string(), "Ali".to_string());
        assert!(!ctx.verbose);
        assert!(ctx.with_verbose(true).verbose);
    }
}
