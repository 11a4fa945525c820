//! 月度报告记录
//!
//! 记录保存用户输入的原始文本，派生值（总分、百分比、等级、出勤率）
//! 由 `services::aggregator` 计算后整体替换。

use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::models::category::Category;
use crate::models::course::{Course, Timing};
use crate::models::month::ReportMonth;

/// 导出前必须填写的字段（按表单顺序）
pub const REQUIRED_FIELDS: [ReportField; 8] = [
    ReportField::Month,
    ReportField::StudentName,
    ReportField::FatherName,
    ReportField::CourseName,
    ReportField::BatchCode,
    ReportField::Timing,
    ReportField::TotalDays,
    ReportField::PresentDays,
];

/// 等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    F,
    /// 百分比无法解析时
    #[default]
    #[serde(rename = "—")]
    Ungraded,
}

impl Grade {
    pub fn label(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::F => "F",
            Grade::Ungraded => "—",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 五个计分类别的原始输入
///
/// 禁用的类别依然保留已输入的值，只是不参与计算。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSheet {
    values: [String; 5],
}

impl ScoreSheet {
    pub fn get(&self, category: Category) -> &str {
        &self.values[category as usize]
    }

    pub fn set(&mut self, category: Category, value: impl Into<String>) {
        self.values[category as usize] = value.into();
    }
}

/// 派生值，均为报告上显示的文本形式
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derived {
    pub total: String,
    pub percentage: String,
    pub grade: Grade,
    pub attendance_percentage: String,
}

/// 一名学生一个月的报告
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub month: Option<ReportMonth>,
    pub student_name: String,
    pub father_name: String,
    pub course: Option<Course>,
    pub batch_code: String,
    pub timing: Option<Timing>,
    pub scores: ScoreSheet,
    pub total_days: String,
    pub present_days: String,
    #[serde(default)]
    pub derived: Derived,
}

/// 可编辑字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportField {
    Month,
    StudentName,
    FatherName,
    CourseName,
    BatchCode,
    Timing,
    Score(Category),
    TotalDays,
    PresentDays,
}

impl ReportField {
    /// 表单字段名
    pub fn name(self) -> &'static str {
        match self {
            ReportField::Month => "month",
            ReportField::StudentName => "studentName",
            ReportField::FatherName => "fatherName",
            ReportField::CourseName => "courseName",
            ReportField::BatchCode => "batchCode",
            ReportField::Timing => "timing",
            ReportField::Score(category) => category.name(),
            ReportField::TotalDays => "totalDays",
            ReportField::PresentDays => "presentDays",
        }
    }

    /// 解析字段名，同时接受 camelCase 与 snake_case
    pub fn from_name(name: &str) -> Result<Self, FormError> {
        let field = match name {
            "month" => ReportField::Month,
            "studentName" | "student_name" => ReportField::StudentName,
            "fatherName" | "father_name" => ReportField::FatherName,
            "courseName" | "course_name" => ReportField::CourseName,
            "batchCode" | "batch_code" => ReportField::BatchCode,
            "timing" => ReportField::Timing,
            "totalDays" | "total_days" => ReportField::TotalDays,
            "presentDays" | "present_days" => ReportField::PresentDays,
            other => match Category::from_name(other) {
                Some(category) => ReportField::Score(category),
                None => return Err(FormError::UnknownField(other.to_string())),
            },
        };
        Ok(field)
    }
}

impl std::fmt::Display for ReportField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 一次字段编辑（相当于一次键入）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub field: ReportField,
    pub value: String,
}

impl FieldEdit {
    pub fn new(field: ReportField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// 按字段名构造
    pub fn named(name: &str, value: impl Into<String>) -> Result<Self, FormError> {
        Ok(Self::new(ReportField::from_name(name)?, value))
    }
}

impl ReportRecord {
    /// 应用一次编辑，返回新的记录（派生值未重算）
    ///
    /// 课程、时段、月份在此处校验；空字符串表示清空选择。
    pub fn with_edit(&self, edit: &FieldEdit) -> Result<Self, FormError> {
        let mut next = self.clone();
        let value = edit.value.as_str();
        match edit.field {
            ReportField::Month => {
                next.month = blank_or(value, ReportMonth::parse)?;
            }
            ReportField::StudentName => next.student_name = value.to_string(),
            ReportField::FatherName => next.father_name = value.to_string(),
            ReportField::CourseName => {
                next.course = blank_or(value, Course::from_label)?;
            }
            ReportField::BatchCode => next.batch_code = value.to_string(),
            ReportField::Timing => {
                next.timing = blank_or(value, Timing::from_label)?;
            }
            ReportField::Score(category) => next.scores.set(category, value),
            ReportField::TotalDays => next.total_days = value.to_string(),
            ReportField::PresentDays => next.present_days = value.to_string(),
        }
        Ok(next)
    }

    /// 当前字段的文本值（用于必填检查与显示）
    pub fn text(&self, field: ReportField) -> String {
        match field {
            ReportField::Month => self.month.map(|m| m.as_input()).unwrap_or_default(),
            ReportField::StudentName => self.student_name.clone(),
            ReportField::FatherName => self.father_name.clone(),
            ReportField::CourseName => {
                self.course.map(|c| c.label().to_string()).unwrap_or_default()
            }
            ReportField::BatchCode => self.batch_code.clone(),
            ReportField::Timing => {
                self.timing.map(|t| t.label().to_string()).unwrap_or_default()
            }
            ReportField::Score(category) => self.scores.get(category).to_string(),
            ReportField::TotalDays => self.total_days.clone(),
            ReportField::PresentDays => self.present_days.clone(),
        }
    }

    /// 空白的必填字段名
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .into_iter()
            .filter(|field| self.text(*field).trim().is_empty())
            .map(ReportField::name)
            .collect()
    }
}

fn blank_or<T>(
    value: &str,
    parse: impl FnOnce(&str) -> Result<T, FormError>,
) -> Result<Option<T>, FormError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse(value).map(Some)
    }
}

/// 数字或零：去掉首尾空白后解析，空值或非数字视为 0
///
/// 接受十进制与 `0x`/`0o`/`0b` 前缀的无符号整数；`Infinity` 之类的
/// 非有限值也视为 0，报告上不会出现 "Infinity"。
pub fn number_or_zero(text: &str) -> f64 {
    let text = text.trim();
    let radix = text.get(..2).and_then(|prefix| match prefix {
        "0x" | "0X" => Some(16),
        "0o" | "0O" => Some(8),
        "0b" | "0B" => Some(2),
        _ => None,
    });
    let value = match radix {
        Some(radix) => parse_radix(&text[2..], radix),
        None => text.parse::<f64>().ok(),
    };
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

/// 最短的十进制表示（`255`、`85.5`）
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // 避免输出 "-0"
        return "0".to_string();
    }
    format!("{}", value)
}

/// 固定小数位，按 f64 的精确值舍入，恰好一半时远离零（`56.25` → `56.3`）
///
/// 与浏览器 `toFixed` 的结果一致；`{:.N}` 格式化在恰好一半时取偶数。
pub fn to_fixed(value: f64, digits: usize) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    // f64 的精确十进制展开最多 1074 位小数
    let exact = format!("{:.1074}", value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .collect();
    if frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5') {
        round_up(&mut kept);
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(kept[..split].iter().map(|d| char::from(*d)));
    if digits > 0 {
        out.push('.');
        out.extend(kept[split..].iter().map(|d| char::from(*d)));
    }
    out
}

/// 十进制数字串加一（进位）
fn round_up(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
