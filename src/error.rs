use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 导出错误
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
    /// 表单输入错误
    #[error("表单错误: {0}")]
    Form(#[from] FormError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed { source: BoxedSource },
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed { source: BoxedSource },
    /// 执行 CDP 命令失败
    #[error("执行浏览器命令失败: {source}")]
    CommandFailed { source: BoxedSource },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {message}")]
    ConfigurationFailed { message: String },
}

/// 导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// 必填字段为空
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    /// 已有导出正在进行
    #[error("an export is already in progress")]
    Busy,
    /// 预览区域不存在
    #[error("preview element `{selector}` not found")]
    PreviewNotFound { selector: String },
    /// 渲染失败
    #[error("failed to render PDF: {source}")]
    RenderFailed { source: BoxedSource },
    /// 写入 PDF 文件失败
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },
}

/// 表单输入错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// 未知字段名
    #[error("unknown field `{0}`")]
    UnknownField(String),
    /// 不在固定选项中的值
    #[error("`{value}` is not a valid {field}")]
    UnknownChoice { field: &'static str, value: String },
    /// 月份格式错误（应为 YYYY-MM）
    #[error("invalid month `{0}`, expected YYYY-MM")]
    InvalidMonth(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::CommandFailed {
            source: Box::new(err),
        })
    }
}

impl ExportError {
    /// 包装任意渲染错误
    pub fn render_failed(source: impl Into<BoxedSource>) -> Self {
        ExportError::RenderFailed {
            source: source.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_every_field() {
        let err = ExportError::MissingFields(vec!["month", "timing"]);
        assert_eq!(err.to_string(), "missing required fields: month, timing");
    }

    #[test]
    fn test_form_error_wraps_into_app_error() {
        let err: AppError = FormError::InvalidMonth("2025/10".to_string()).into();
        assert!(matches!(err, AppError::Form(FormError::InvalidMonth(_))));
        assert!(err.to_string().contains("2025/10"));
    }
}
