use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::OnceLock;

use crate::error::FormError;

/// 报告月份（年-月）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportMonth {
    first_day: NaiveDate,
}

fn month_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("静态正则"))
}

impl ReportMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    /// 解析 `YYYY-MM`
    pub fn parse(input: &str) -> Result<Self, FormError> {
        let input = input.trim();
        let invalid = || FormError::InvalidMonth(input.to_string());
        let caps = month_pattern().captures(input).ok_or_else(invalid)?;
        let year: i32 = caps[1].parse().map_err(|_| invalid())?;
        let month: u32 = caps[2].parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }

    /// 表单值形式 `YYYY-MM`
    pub fn as_input(&self) -> String {
        self.first_day.format("%Y-%m").to_string()
    }

    /// 报告中的显示形式，例如 `October 2025`
    pub fn long_name(&self) -> String {
        self.first_day.format("%B %Y").to_string()
    }
}

impl std::fmt::Display for ReportMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_input())
    }
}

impl Serialize for ReportMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_input())
    }
}

impl<'de> Deserialize<'de> for ReportMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
