//! 报告预览 - 业务能力层
//!
//! 把当前状态投影为 `ReportView`，再渲染成可打印的独立 HTML 文档。
//! 渲染不做任何 I/O，同样的输入得到同样的字节。

use crate::models::record::{format_number, number_or_zero};
use crate::models::{ActiveFieldSet, ReportRecord, StudentPhoto};
use crate::services::aggregator::absent_days;

/// 预览区域的元素 id
pub const PREVIEW_ELEMENT_ID: &str = "report-preview";

/// 预览区域宽度（CSS px），与 A4 去掉左右边距后的宽度一致
pub const PREVIEW_WIDTH_PX: u32 = 718;

const PLACEHOLDER: &str = "—";

/// 机构抬头
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub institute_name: String,
    pub address: String,
    pub phone: String,
    /// 已编码的 logo data URL
    pub logo: Option<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            institute_name: "Institute of Pixxelhouse".to_string(),
            address: "Near Akbar CNG station, Autobhan Road Hyderabad".to_string(),
            phone: "0335-3253513".to_string(),
            logo: None,
        }
    }
}

/// 出勤汇总
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub total_days: String,
    pub present_days: String,
    pub absent_days: String,
    pub percentage: String,
}

/// 报告的只读投影
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    pub month: String,
    pub photo: Option<String>,
    pub student_rows: Vec<(&'static str, String)>,
    pub academic_rows: Vec<(&'static str, String)>,
    pub total: String,
    pub attendance: AttendanceSummary,
    pub percentage: String,
    pub grade: String,
}

impl ReportView {
    pub fn project(
        record: &ReportRecord,
        active: &ActiveFieldSet,
        photo: Option<&StudentPhoto>,
    ) -> Self {
        let total_days = number_or_zero(&record.total_days);
        let present_days = number_or_zero(&record.present_days);

        let student_rows = vec![
            ("Student Name", or_placeholder(&record.student_name)),
            ("Father's Name", or_placeholder(&record.father_name)),
            ("Batch Code", or_placeholder(&record.batch_code)),
            (
                "Class",
                record
                    .course
                    .map(|c| c.label().to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
            ),
            (
                "Timing",
                record
                    .timing
                    .map(|t| t.label().to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
            ),
        ];

        let academic_rows = active
            .active()
            .map(|category| (category.label(), or_placeholder(record.scores.get(category))))
            .collect();

        Self {
            month: record
                .month
                .map(|m| m.long_name())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            photo: photo.map(|p| p.data_url().to_string()),
            student_rows,
            academic_rows,
            total: or_placeholder(&record.derived.total),
            attendance: AttendanceSummary {
                total_days: format_number(total_days),
                present_days: format_number(present_days),
                absent_days: format_number(absent_days(total_days, present_days)),
                percentage: format!("{}%", or_placeholder(&record.derived.attendance_percentage)),
            },
            percentage: format!("{}%", or_placeholder(&record.derived.percentage)),
            grade: record.derived.grade.label().to_string(),
        }
    }
}

fn or_placeholder(value: &str) -> String {
    if value.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

/// 渲染完整的 HTML 文档
pub fn render_html(view: &ReportView, branding: &Branding) -> String {
    let mut w = Html::new();

    w.push("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    w.push("<title>Monthly Progress Report</title><style>");
    w.push(STYLE);
    w.push("</style></head><body>");

    w.push(format!(
        "<div id=\"{}\" class=\"report\" style=\"width:{}px\">",
        PREVIEW_ELEMENT_ID, PREVIEW_WIDTH_PX
    ));

    // 抬头
    w.push("<div class=\"header\">");
    if let Some(logo) = &branding.logo {
        w.push(format!("<img class=\"logo\" src=\"{}\" alt=\"Logo\">", esc(logo)));
    }
    w.push("<div class=\"institute\">");
    w.push(format!("<h1>{}</h1>", esc(&branding.institute_name)));
    w.push(format!("<p class=\"address\">{}</p>", esc(&branding.address)));
    w.push(format!("<p>Phone: {}</p>", esc(&branding.phone)));
    w.push("</div></div>");

    // 报告信息
    w.push("<div class=\"info\"><p class=\"title\">Monthly Progress Report</p>");
    w.push(format!(
        "<p>Report Month: <span class=\"month\">{}</span></p>",
        esc(&view.month)
    ));
    if let Some(photo) = &view.photo {
        w.push(format!(
            "<div class=\"photo\"><img src=\"{}\" alt=\"Student\"></div>",
            esc(photo)
        ));
    }
    w.push("</div>");

    // 学生信息
    w.push("<h2>Student Information</h2><table class=\"mb\"><thead><tr>");
    w.push("<th class=\"left third\">Field</th><th class=\"left\">Details</th></tr></thead><tbody>");
    for (label, value) in &view.student_rows {
        push_row(&mut w, label, value);
    }
    w.push("</tbody></table>");

    // 成绩
    w.push("<h2>Academic Performance</h2><table><thead><tr>");
    w.push("<th class=\"left\">Category</th><th class=\"left\">Marks (Out of 100)</th></tr></thead><tbody>");
    for (label, value) in &view.academic_rows {
        push_row(&mut w, label, value);
    }
    w.push(format!(
        "<tr class=\"total\"><td>Total</td><td>{}</td></tr>",
        esc(&view.total)
    ));
    w.push("</tbody></table>");

    // 出勤
    let a = &view.attendance;
    w.push("<h2>Attendance Summary</h2><table><thead><tr>");
    w.push("<th>Total Days</th><th>Present</th><th>Absent</th><th>%</th></tr></thead><tbody><tr>");
    for cell in [&a.total_days, &a.present_days, &a.absent_days, &a.percentage] {
        w.push(format!("<td class=\"center\">{}</td>", esc(cell)));
    }
    w.push("</tr></tbody></table>");

    // 总评
    w.push("<h2>Overall Summary</h2><table class=\"mb\"><tbody>");
    w.push(format!(
        "<tr><td class=\"key\">Overall %</td><td class=\"center\">{}</td></tr>",
        esc(&view.percentage)
    ));
    w.push(format!(
        "<tr><td class=\"key\">Grade</td><td class=\"center\">{}</td></tr>",
        esc(&view.grade)
    ));
    w.push("</tbody></table>");

    w.push("</div></body></html>");
    w.finish()
}

fn push_row(w: &mut Html, label: &str, value: &str) {
    w.push(format!(
        "<tr><td>{}</td><td>{}</td></tr>",
        esc(label),
        esc(value)
    ));
}

const STYLE: &str = "\
*{box-sizing:border-box}\
body{margin:0;background:#fff;font-family:Arial,Helvetica,sans-serif;color:#1f2937}\
.report{padding:12px;background:#fff}\
.header{display:flex;align-items:center;border-bottom:4px solid rgba(52,152,219,.7);padding-bottom:16px;margin-bottom:24px}\
.logo{height:56px;width:100px;object-fit:contain}\
.institute{flex:1;text-align:center}\
.institute h1{margin:0;font-size:20px;font-weight:800;color:#3498db;letter-spacing:.025em}\
.institute p{margin:2px 0;font-size:12px}\
.institute .address{font-weight:700}\
.info{display:flex;justify-content:space-between;align-items:center;margin-bottom:24px}\
.info p{margin:0;font-size:14px}\
.info .title{color:#2980b9;font-weight:700;font-size:18px}\
.month{font-weight:600;color:#3498db}\
.photo{height:80px;width:80px;border-radius:8px;overflow:hidden;border:1px solid rgba(52,152,219,.3)}\
.photo img{width:100%;height:100%;object-fit:cover}\
h2{font-size:18px;font-weight:600;color:#3498db;margin:8px 0}\
table{width:100%;border-collapse:collapse;font-size:14px}\
table.mb{margin-bottom:20px}\
th,td{border:1px solid #e5e7eb;padding:8px}\
thead{background:rgba(52,152,219,.1)}\
.left{text-align:left}\
.third{width:33%}\
.center{text-align:center}\
.total{font-weight:600;background:rgba(52,152,219,.05)}\
.key{background:rgba(52,152,219,.1);font-weight:500}";

struct Html {
    buf: String,
}

impl Html {
    fn new() -> Self {
        Self {
            buf: String::with_capacity(8 * 1024),
        }
    }

    fn push<S: AsRef<str>>(&mut self, s: S) {
        self.buf.push_str(s.as_ref());
    }

    fn finish(self) -> String {
        self.buf
    }
}

/// HTML 转义
pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Course, ReportMonth, Timing};
    use crate::services::aggregator::recompute;

    fn sample_record() -> ReportRecord {
        let mut record = ReportRecord {
            month: ReportMonth::new(2025, 10),
            student_name: "Ali Raza".to_string(),
            father_name: "Imran Raza".to_string(),
            course: Some(Course::DataScience),
            batch_code: "DS-14".to_string(),
            timing: Some(Timing::FivePm),
            total_days: "20".to_string(),
            present_days: "18".to_string(),
            ..Default::default()
        };
        for (category, score) in Category::ALL.into_iter().zip(["90", "80", "70", "", "60"]) {
            record.scores.set(category, score);
        }
        record
    }

    #[test]
    fn test_project_full_record() {
        let active = ActiveFieldSet::default();
        let record = recompute(&sample_record(), &active);
        let view = ReportView::project(&record, &active, None);

        assert_eq!(view.month, "October 2025");
        assert_eq!(view.student_rows[3], ("Class", "Data Science".to_string()));
        assert_eq!(view.student_rows[4], ("Timing", "05:00 PM - 06:00 PM".to_string()));
        assert_eq!(view.academic_rows.len(), 5);
        assert_eq!(view.academic_rows[3], ("Presentation", "—".to_string()));
        assert_eq!(view.total, "300");
        assert_eq!(view.percentage, "60.00%");
        assert_eq!(view.grade, "C");
        assert_eq!(
            view.attendance,
            AttendanceSummary {
                total_days: "20".to_string(),
                present_days: "18".to_string(),
                absent_days: "2".to_string(),
                percentage: "90.0%".to_string(),
            }
        );
    }

    #[test]
    fn test_project_only_lists_active_categories() {
        let mut active = ActiveFieldSet::default();
        active.set(Category::Assignment, false);
        active.set(Category::Presentation, false);
        let record = recompute(&sample_record(), &active);
        let view = ReportView::project(&record, &active, None);

        let labels: Vec<_> = view.academic_rows.iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["Test", "Behaviour", "Participation"]);
    }

    #[test]
    fn test_project_empty_record_uses_placeholders() {
        let view = ReportView::project(&ReportRecord::default(), &ActiveFieldSet::default(), None);
        assert_eq!(view.month, "—");
        assert!(view.student_rows.iter().all(|(_, v)| v == "—"));
        assert_eq!(view.total, "—");
        assert_eq!(view.percentage, "—%");
        assert_eq!(view.grade, "—");
        assert_eq!(view.attendance.total_days, "0");
        assert_eq!(view.attendance.percentage, "—%");
    }

    #[test]
    fn test_absent_days_clamped_at_zero() {
        let mut record = sample_record();
        record.present_days = "25".to_string();
        let view = ReportView::project(&record, &ActiveFieldSet::default(), None);
        assert_eq!(view.attendance.absent_days, "0");
    }

    #[test]
    fn test_render_html_escapes_and_includes_preview_region() {
        let mut record = sample_record();
        record.student_name = "<script>alert(1)</script>".to_string();
        let active = ActiveFieldSet::default();
        let record = recompute(&record, &active);
        let photo = StudentPhoto::from_bytes(b"x", "image/png");
        let view = ReportView::project(&record, &active, Some(&photo));

        let html = render_html(&view, &Branding::default());

        assert!(html.contains("id=\"report-preview\""));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("Institute of Pixxelhouse"));
        assert!(html.contains("data:image/png;base64,eA=="));
        assert!(html.contains("Report Month: <span class=\"month\">October 2025</span>"));
    }

    #[test]
    fn test_render_html_is_deterministic() {
        let view = ReportView::project(&sample_record(), &ActiveFieldSet::default(), None);
        let branding = Branding::default();
        assert_eq!(render_html(&view, &branding), render_html(&view, &branding));
    }
}
