use std::str::FromStr;

use tracing::warn;

use crate::error::ConfigError;
use crate::services::presenter::Branding;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时导出的报告数量
    pub max_concurrent_reports: usize,
    /// 表单 TOML 文件存放目录
    pub form_folder: String,
    /// PDF 输出目录
    pub output_dir: String,
    /// Chromium/Chrome/Edge 可执行文件，为空时自动查找
    pub chrome_executable: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 运行日志文件
    pub output_log_file: String,
    /// 无法导出的表单写入此文件
    pub warn_file: String,
    // --- 报告抬头 ---
    pub institute_name: String,
    pub institute_address: String,
    pub institute_phone: String,
    /// logo 图片路径
    pub institute_logo: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let branding = Branding::default();
        Self {
            max_concurrent_reports: 4,
            form_folder: "forms".to_string(),
            output_dir: "output_pdf".to_string(),
            chrome_executable: None,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            warn_file: "warn.txt".to_string(),
            institute_name: branding.institute_name,
            institute_address: branding.address,
            institute_phone: branding.phone,
            institute_logo: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取配置，解析失败的值回退到默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let max_concurrent_reports =
            parsed_or(&lookup, "MAX_CONCURRENT_REPORTS", default.max_concurrent_reports).max(1);
        let verbose_logging = parsed_or(&lookup, "VERBOSE_LOGGING", default.verbose_logging);
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            max_concurrent_reports,
            form_folder: lookup("FORM_FOLDER").unwrap_or(default.form_folder),
            output_dir: lookup("OUTPUT_DIR").unwrap_or(default.output_dir),
            chrome_executable: non_empty("CHROME_EXECUTABLE"),
            verbose_logging,
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            warn_file: lookup("WARN_FILE").unwrap_or(default.warn_file),
            institute_name: lookup("INSTITUTE_NAME").unwrap_or(default.institute_name),
            institute_address: lookup("INSTITUTE_ADDRESS").unwrap_or(default.institute_address),
            institute_phone: lookup("INSTITUTE_PHONE").unwrap_or(default.institute_phone),
            institute_logo: non_empty("INSTITUTE_LOGO"),
        }
    }
}

/// 解析失败时记录警告并回退
fn parsed_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, fallback: T) -> T {
    match parse_var(name, lookup(name)) {
        Ok(value) => value.unwrap_or(fallback),
        Err(e) => {
            warn!("⚠️ {}，使用默认值", e);
            fallback
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            }),
    }
}
