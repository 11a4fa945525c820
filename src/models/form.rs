//! 表单文件（一份填写好的月度报告表单）

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::category::Category;
use crate::models::record::{FieldEdit, ReportField};

/// TOML 表单文件结构
///
/// ```toml
/// month = "2025-10"
/// student_name = "Ali Raza"
/// father_name = "Imran Raza"
/// course_name = "Data Science"
/// batch_code = "DS-14"
/// timing = "05:00 PM - 06:00 PM"
/// photo = "photos/ali.jpg"
///
/// [scores]
/// test = 88
/// assignment = "91"
///
/// [active]
/// behaviour = false
///
/// [attendance]
/// total_days = 20
/// present_days = 18
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportForm {
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub father_name: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub batch_code: String,
    #[serde(default)]
    pub timing: String,
    /// 照片路径（相对路径基于表单文件所在目录）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<PathBuf>,
    #[serde(default)]
    pub scores: ScoreInputs,
    #[serde(default)]
    pub active: ActiveInputs,
    #[serde(default)]
    pub attendance: AttendanceInputs,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreInputs {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub test: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub assignment: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub behaviour: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub presentation: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub participation: String,
}

impl ScoreInputs {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Test => &self.test,
            Category::Assignment => &self.assignment,
            Category::Behaviour => &self.behaviour,
            Category::Presentation => &self.presentation,
            Category::Participation => &self.participation,
        }
    }
}

/// 未出现的类别默认启用
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveInputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behaviour: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participation: Option<bool>,
}

impl ActiveInputs {
    pub fn get(&self, category: Category) -> bool {
        let flag = match category {
            Category::Test => self.test,
            Category::Assignment => self.assignment,
            Category::Behaviour => self.behaviour,
            Category::Presentation => self.presentation,
            Category::Participation => self.participation,
        };
        flag.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceInputs {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub total_days: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub present_days: String,
}

impl ReportForm {
    /// 按表单顺序展开为编辑序列
    pub fn edits(&self) -> Vec<FieldEdit> {
        let mut edits = vec![
            FieldEdit::new(ReportField::Month, self.month.as_str()),
            FieldEdit::new(ReportField::StudentName, self.student_name.as_str()),
            FieldEdit::new(ReportField::FatherName, self.father_name.as_str()),
            FieldEdit::new(ReportField::CourseName, self.course_name.as_str()),
            FieldEdit::new(ReportField::BatchCode, self.batch_code.as_str()),
            FieldEdit::new(ReportField::Timing, self.timing.as_str()),
        ];
        edits.extend(
            Category::ALL
                .into_iter()
                .map(|c| FieldEdit::new(ReportField::Score(c), self.scores.get(c))),
        );
        edits.push(FieldEdit::new(
            ReportField::TotalDays,
            self.attendance.total_days.as_str(),
        ));
        edits.push(FieldEdit::new(
            ReportField::PresentDays,
            self.attendance.present_days.as_str(),
        ));
        edits
    }

    /// 用于日志显示的名称
    pub fn display_name(&self) -> String {
        if !self.student_name.trim().is_empty() {
            return self.student_name.clone();
        }
        self.file_path.clone().unwrap_or_else(|| "student".to_string())
    }
}

// 分数和天数既可以写成字符串也可以写成数字
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}
