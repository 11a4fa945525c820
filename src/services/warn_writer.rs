//! 警告写入服务 - 业务能力层
//!
//! 只负责"写 warn.txt"能力，不关心流程

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// 警告写入服务
///
/// 职责：
/// - 将无法导出的表单写入 warn.txt
/// - 每次只处理一份表单
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 创建新的警告写入服务
    pub fn new() -> Self {
        Self {
            warn_file_path: "warn.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.warn_file_path
    }

    /// 写入警告信息
    ///
    /// # 参数
    /// - `form_file`: 表单文件路径
    /// - `reason`: 无法导出的原因
    pub fn write(&self, form_file: &str, reason: &str) -> Result<()> {
        debug!("写入警告: 表单 {} | 原因: {}", form_file, reason);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)?;

        let warn_msg = format!(
            "[{}] 表单 {} | {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            form_file,
            reason
        );

        file.write_all(warn_msg.as_bytes())?;

        Ok(())
    }
}

impl Default for WarnWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warn.txt");
        let writer = WarnWriter::with_path(path.to_string_lossy());

        writer.write("forms/a.toml", "missing required fields: month").unwrap();
        writer.write("forms/b.toml", "missing required fields: timing").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("表单 forms/a.toml | missing required fields: month"));
        assert!(lines[1].contains("forms/b.toml"));
    }
}
