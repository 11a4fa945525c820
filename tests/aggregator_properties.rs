use monthly_report::models::{ActiveFieldSet, Category, Grade, ReportRecord};
use monthly_report::services::aggregator::{absent_days, aggregate, grade_for, percentage_text};
use proptest::prelude::*;

fn record_with_scores(scores: &[u32; 5]) -> ReportRecord {
    let mut record = ReportRecord::default();
    for (category, score) in Category::ALL.into_iter().zip(scores) {
        record.scores.set(category, score.to_string());
    }
    record
}

fn active_set(flags: &[bool; 5]) -> ActiveFieldSet {
    let mut active = ActiveFieldSet::none();
    for (category, on) in Category::ALL.into_iter().zip(flags) {
        active.set(category, *on);
    }
    active
}

fn rank(grade: Grade) -> u8 {
    match grade {
        Grade::F => 0,
        Grade::C => 1,
        Grade::B => 2,
        Grade::A => 3,
        Grade::APlus => 4,
        Grade::Ungraded => 5,
    }
}

proptest! {
    #[test]
    fn test_total_is_sum_of_active_scores(
        scores in proptest::array::uniform5(0u32..=100),
        flags in proptest::array::uniform5(any::<bool>()),
    ) {
        let record = record_with_scores(&scores);
        let derived = aggregate(&record, &active_set(&flags));

        let expected: u32 = scores
            .iter()
            .zip(flags)
            .filter(|(_, on)| *on)
            .map(|(s, _)| *s)
            .sum();
        prop_assert_eq!(derived.total, expected.to_string());
    }

    #[test]
    fn test_toggle_twice_restores_derived_values(
        scores in proptest::array::uniform5(0u32..=100),
        index in 0usize..5,
    ) {
        let record = record_with_scores(&scores);
        let mut active = ActiveFieldSet::default();
        let before = aggregate(&record, &active);

        let category = Category::ALL[index];
        prop_assert!(!active.toggle(category));
        prop_assert!(active.toggle(category));

        prop_assert_eq!(aggregate(&record, &active), before);
    }

    #[test]
    fn test_percentage_never_drops_as_total_rises(
        a in 0u32..=500,
        b in 0u32..=500,
        active_count in 1usize..=5,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_pct: f64 = percentage_text(f64::from(low), active_count).parse().unwrap();
        let high_pct: f64 = percentage_text(f64::from(high), active_count).parse().unwrap();
        prop_assert!(low_pct <= high_pct, "{} -> {}, {} -> {}", low, low_pct, high, high_pct);
    }

    #[test]
    fn test_grade_is_monotonic(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rank(grade_for(low)) <= rank(grade_for(high)));
    }

    #[test]
    fn test_absent_days_never_negative(total in 0.0f64..=31.0, present in 0.0f64..=31.0) {
        let absent = absent_days(total, present);
        prop_assert!(absent >= 0.0);
        if present <= total {
            prop_assert!((absent - (total - present)).abs() < 1e-9);
        }
    }
}
