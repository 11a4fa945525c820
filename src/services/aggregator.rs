//! 派生值计算 - 业务能力层
//!
//! 纯函数：给定记录与启用集合，计算总分、百分比、等级和出勤率。

use crate::models::record::{
    format_number, number_or_zero, to_fixed, Derived, Grade, ReportRecord,
};
use crate::models::ActiveFieldSet;

/// 计算派生值
pub fn aggregate(record: &ReportRecord, active: &ActiveFieldSet) -> Derived {
    let total: f64 = active
        .active()
        .map(|category| number_or_zero(record.scores.get(category)))
        .sum();

    let percentage = percentage_text(total, active.active_count());
    let grade = grade_for_text(&percentage);
    let attendance_percentage = attendance_text(
        number_or_zero(&record.total_days),
        number_or_zero(&record.present_days),
    );

    Derived {
        total: format_number(total),
        percentage,
        grade,
        attendance_percentage,
    }
}

/// 返回天数已规范化、派生值已更新的新记录
pub fn recompute(record: &ReportRecord, active: &ActiveFieldSet) -> ReportRecord {
    let mut next = record.clone();
    next.total_days = normalize_days(&record.total_days);
    next.present_days = normalize_days(&record.present_days);
    next.derived = aggregate(&next, active);
    next
}

/// 百分比（两位小数）；没有启用类别时为 "0"
pub fn percentage_text(total: f64, active_count: usize) -> String {
    if active_count == 0 {
        return "0".to_string();
    }
    let max = (active_count * 100) as f64;
    to_fixed(total / max * 100.0, 2)
}

/// 出勤率（一位小数）；总天数不大于 0 时为 "0"
pub fn attendance_text(total_days: f64, present_days: f64) -> String {
    if total_days > 0.0 {
        to_fixed(present_days / total_days * 100.0, 1)
    } else {
        "0".to_string()
    }
}

/// 等级阈值（含下界）
pub fn grade_for(percentage: f64) -> Grade {
    if percentage.is_nan() {
        Grade::Ungraded
    } else if percentage >= 85.0 {
        Grade::APlus
    } else if percentage >= 75.0 {
        Grade::A
    } else if percentage >= 65.0 {
        Grade::B
    } else if percentage >= 50.0 {
        Grade::C
    } else {
        Grade::F
    }
}

/// 根据显示出来的百分比文本评级，无法解析时为 "—"
pub fn grade_for_text(percentage: &str) -> Grade {
    match percentage.trim().parse::<f64>() {
        Ok(p) => grade_for(p),
        Err(_) => Grade::Ungraded,
    }
}

/// 非零天数保留其数字形式，零或非数字清空
pub fn normalize_days(text: &str) -> String {
    let days = number_or_zero(text);
    if days == 0.0 {
        String::new()
    } else {
        format_number(days)
    }
}

/// 缺勤天数，不小于 0
pub fn absent_days(total_days: f64, present_days: f64) -> f64 {
    (total_days - present_days).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn record_with_scores(scores: [&str; 5]) -> ReportRecord {
        let mut record = ReportRecord::default();
        for (category, value) in Category::ALL.into_iter().zip(scores) {
            record.scores.set(category, value);
        }
        record
    }

    #[test]
    fn test_aggregate_all_active() {
        let record = record_with_scores(["90", "80", "70", "60", "50"]);
        let derived = aggregate(&record, &ActiveFieldSet::default());

        assert_eq!(derived.total, "350");
        assert_eq!(derived.percentage, "70.00");
        assert_eq!(derived.grade, Grade::B);
    }

    #[test]
    fn test_aggregate_only_counts_active_categories() {
        let record = record_with_scores(["90", "80", "10", "60", "50"]);
        let mut active = ActiveFieldSet::default();
        active.set(Category::Behaviour, false);
        active.set(Category::Participation, false);

        let derived = aggregate(&record, &active);

        assert_eq!(derived.total, "230");
        assert_eq!(derived.percentage, "76.67");
        assert_eq!(derived.grade, Grade::A);
    }

    #[test]
    fn test_non_numeric_scores_count_as_zero() {
        let record = record_with_scores(["abc", "", "100", " 50 ", "-"]);
        let derived = aggregate(&record, &ActiveFieldSet::default());

        assert_eq!(derived.total, "150");
        assert_eq!(derived.percentage, "30.00");
        assert_eq!(derived.grade, Grade::F);
    }

    #[test]
    fn test_no_active_categories() {
        let record = record_with_scores(["90", "90", "90", "90", "90"]);
        let derived = aggregate(&record, &ActiveFieldSet::none());

        assert_eq!(derived.total, "0");
        assert_eq!(derived.percentage, "0");
        assert_eq!(derived.grade, Grade::F);
    }

    #[test]
    fn test_fractional_scores() {
        let record = record_with_scores(["85.5", "", "", "", ""]);
        let mut active = ActiveFieldSet::none();
        active.set(Category::Test, true);

        let derived = aggregate(&record, &active);
        assert_eq!(derived.total, "85.5");
        assert_eq!(derived.percentage, "85.50");
        assert_eq!(derived.grade, Grade::APlus);
    }

    #[test]
    fn test_grade_boundaries_are_inclusive() {
        let cases = [
            (85.0, Grade::APlus),
            (84.99, Grade::A),
            (75.0, Grade::A),
            (74.99, Grade::B),
            (65.0, Grade::B),
            (64.99, Grade::C),
            (50.0, Grade::C),
            (49.99, Grade::F),
            (0.0, Grade::F),
            (100.0, Grade::APlus),
        ];
        for (p, expected) in cases {
            assert_eq!(grade_for(p), expected, "percentage {p}");
        }
    }

    #[test]
    fn test_grade_uses_rounded_percentage() {
        // 84.996 显示为 85.00，按显示值评级
        assert_eq!(percentage_text(424.98, 5), "85.00");
        assert_eq!(grade_for_text("85.00"), Grade::APlus);
        assert_eq!(grade_for_text("n/a"), Grade::Ungraded);
    }

    #[test]
    fn test_attendance_percentage() {
        assert_eq!(attendance_text(20.0, 18.0), "90.0");
        assert_eq!(attendance_text(0.0, 5.0), "0");
        assert_eq!(attendance_text(3.0, 2.0), "66.7");
        assert_eq!(attendance_text(20.0, 25.0), "125.0");
    }

    #[test]
    fn test_exact_halves_round_up() {
        assert_eq!(attendance_text(16.0, 9.0), "56.3");
        assert_eq!(attendance_text(16.0, 1.0), "6.3");
        assert_eq!(percentage_text(74.625, 1), "74.63");
        assert_eq!(grade_for_text(&percentage_text(74.625, 1)), Grade::B);
    }

    #[test]
    fn test_absent_days_never_negative() {
        assert_eq!(absent_days(20.0, 18.0), 2.0);
        assert_eq!(absent_days(20.0, 25.0), 0.0);
        assert_eq!(absent_days(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_recompute_normalizes_days() {
        let mut record = ReportRecord::default();
        record.total_days = " 20 ".to_string();
        record.present_days = "0".to_string();

        let next = recompute(&record, &ActiveFieldSet::default());
        assert_eq!(next.total_days, "20");
        assert_eq!(next.present_days, "");
        assert_eq!(next.derived.attendance_percentage, "0.0");

        record.present_days = "abc".to_string();
        assert_eq!(recompute(&record, &ActiveFieldSet::default()).present_days, "");
    }
}
