use std::collections::HashMap;

use serde::Serialize;

use super::filters::Choice;
use super::record::{Field, Record};
use crate::constants::SPECIALIZATION_TOP_N;

/// One bar: a facet value and how many records carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count {
    pub value: String,
    pub count: usize,
}

impl Count {
    pub fn new(value: impl Into<String>, count: usize) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

/// Frequency of each non-empty value of `field`, highest first.
/// Equal counts keep the order in which the values were first seen.
pub fn count_by<'a, I>(records: I, field: Field) -> Vec<Count>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts: Vec<Count> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let value = record.field(field);
        if value.is_empty() {
            continue;
        }
        match slots.get(value) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(value, counts.len());
                counts.push(Count::new(value, 1));
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// `count_by` capped to the first `n` entries
pub fn top_counts<'a, I>(records: I, field: Field, n: usize) -> Vec<Count>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts = count_by(records, field);
    counts.truncate(n);
    counts
}

/// Everything the Infografik tab draws
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub focus: Choice,
    /// Grade counts over the whole dataset; the focus does not apply
    pub grades: Vec<Count>,
    /// Top specializations among records in the focused grade
    pub specializations: Vec<Count>,
    /// Registered teachers in the dataset
    pub total: usize,
}

impl ChartData {
    /// Suffix for the specialization chart title: `(DG44)` or `(Top 10)`
    pub fn specialization_scope(&self) -> String {
        match &self.focus {
            Choice::All => format!("(Top {})", SPECIALIZATION_TOP_N),
            Choice::Only(grade) => format!("({})", grade),
        }
    }
}

/// Build both charts. `focus` pre-filters the specialization chart by grade.
pub fn chart_data(records: &[Record], focus: &Choice) -> ChartData {
    let grades = count_by(records, Field::Grade);
    let specializations = top_counts(
        records.iter().filter(|r| focus.matches(&r.grade)),
        Field::Specialization,
        SPECIALIZATION_TOP_N,
    );

    ChartData {
        focus: focus.clone(),
        grades,
        specializations,
        total: records.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::fixtures::teacher;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_count_by_grade() {
        let records = vec![
            teacher("A", "DG41", ""),
            teacher("B", "DG41", ""),
            teacher("C", "DG44", ""),
        ];

        assert_eq!(
            count_by(&records, Field::Grade),
            vec![Count::new("DG41", 2), Count::new("DG44", 1)]
        );
    }

    #[test]
    fn test_blank_values_are_not_counted() {
        let records = vec![
            teacher("A", "", "Sains"),
            teacher("B", "DG41", ""),
            teacher("C", "", ""),
        ];

        let grades = count_by(&records, Field::Grade);
        assert_eq!(grades, vec![Count::new("DG41", 1)]);

        let with_value = records.iter().filter(|r| !r.grade.is_empty()).count();
        assert_eq!(grades.iter().map(|c| c.count).sum::<usize>(), with_value);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let records = vec![
            teacher("A", "DG48", ""),
            teacher("B", "DG41", ""),
            teacher("C", "DG44", ""),
            teacher("D", "DG44", ""),
            teacher("E", "DG41", ""),
        ];

        assert_eq!(
            count_by(&records, Field::Grade),
            vec![
                Count::new("DG41", 2),
                Count::new("DG44", 2),
                Count::new("DG48", 1)
            ]
        );
    }

    #[test]
    fn test_counts_are_non_increasing() {
        let grades = ["DG32", "DG41", "DG44", "DG41", "DG48", "DG44", "DG41"];
        let records: Vec<Record> = grades.iter().map(|g| teacher("x", g, "")).collect();

        let counts = count_by(&records, Field::Grade);
        assert!(counts.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_top_counts_caps() {
        let records: Vec<Record> = (0..15)
            .map(|i| teacher("x", "DG41", &format!("Subjek {}", i)))
            .collect();

        let top = top_counts(&records, Field::Specialization, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].value, "Subjek 0");
    }

    #[test]
    fn test_chart_data_focus_filters_specializations_only() {
        let records = vec![
            teacher("A", "DG41", "Sains"),
            teacher("B", "DG44", "Matematik"),
            teacher("C", "DG44", "Matematik"),
            teacher("D", "DG41", "Matematik"),
        ];

        let all = chart_data(&records, &Choice::All);
        assert_eq!(
            all.specializations,
            vec![Count::new("Matematik", 3), Count::new("Sains", 1)]
        );
        assert_eq!(all.specialization_scope(), "(Top 10)");

        let focused = chart_data(&records, &Choice::Only("DG41".to_string()));
        assert_eq!(
            focused.specializations,
            vec![Count::new("Sains", 1), Count::new("Matematik", 1)]
        );
        assert_eq!(focused.grades, all.grades);
        assert_eq!(focused.total, 4);
        assert_eq!(focused.specialization_scope(), "(DG41)");
    }
}
