use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

use super::record::{Field, Record};
use crate::constants::ALL_LABEL;

/// A facet selection: everything, or one exact value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// Map a CLI/config value to a choice; missing or "all"/"semua" means no filter
    pub fn from_arg(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::All,
            Some(v) if v.eq_ignore_ascii_case("all") || v.eq_ignore_ascii_case(ALL_LABEL) => {
                Self::All
            }
            Some(v) => Self::Only(v.to_string()),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_LABEL,
            Self::Only(value) => value,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Choice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Search text plus the two facet choices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub search: String,
    pub grade: Choice,
    pub specialization: Choice,
}

impl FilterSelection {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.matches_search(&record.name)
            && self.grade.matches(&record.grade)
            && self.specialization.matches(&record.specialization)
    }

    fn matches_search(&self, name: &str) -> bool {
        self.search.is_empty() || name.to_lowercase().contains(&self.search.to_lowercase())
    }
}

/// Distinct non-empty values of `field`, sorted, with `Choice::All` first
pub fn distinct_values(records: &[Record], field: Field) -> Vec<Choice> {
    let values: BTreeSet<&str> = records
        .iter()
        .map(|r| r.field(field))
        .filter(|v| !v.is_empty())
        .collect();

    std::iter::once(Choice::All)
        .chain(values.into_iter().map(|v| Choice::Only(v.to_string())))
        .collect()
}

/// Records passing the selection, in dataset order
pub fn apply_filters<'a>(records: &'a [Record], selection: &FilterSelection) -> Vec<&'a Record> {
    records.iter().filter(|r| selection.matches(r)).collect()
}

/// Step through an option set, wrapping at both ends.
/// A current value not in the set restarts from the front.
pub fn cycle_choice(options: &[Choice], current: &Choice, forward: bool) -> Choice {
    if options.is_empty() {
        return Choice::All;
    }
    let len = options.len();
    let next = match options.iter().position(|o| o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    options[next].clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::fixtures::teacher;
    use pretty_assertions::assert_eq;

    fn names(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let records = vec![
            teacher("Ali bin Ahmad", "DG41", "Matematik"),
            teacher("Siti", "DG44", "Sains"),
            teacher("Alia", "DG41", "Sains"),
        ];
        let selection = FilterSelection {
            search: "ali".to_string(),
            ..Default::default()
        };

        let filtered = apply_filters(&records, &selection);
        assert_eq!(names(&filtered), vec!["Ali bin Ahmad", "Alia"]);

        // soundness and completeness
        for record in &records {
            let kept = filtered.iter().any(|r| std::ptr::eq(*r, record));
            assert_eq!(kept, record.name.to_lowercase().contains("ali"));
        }
    }

    #[test]
    fn test_facets_combine_with_search() {
        let records = vec![
            teacher("Ali", "DG41", "Matematik"),
            teacher("Aminah", "DG41", "Sains"),
            teacher("Azman", "DG44", "Sains"),
        ];
        let selection = FilterSelection {
            search: "A".to_string(),
            grade: Choice::Only("DG41".to_string()),
            specialization: Choice::Only("Sains".to_string()),
        };

        assert_eq!(names(&apply_filters(&records, &selection)), vec!["Aminah"]);
    }

    #[test]
    fn test_empty_selection_keeps_order() {
        let records = vec![
            teacher("Zainal", "DG44", ""),
            teacher("Ahmad", "DG41", ""),
        ];
        let filtered = apply_filters(&records, &FilterSelection::default());
        assert_eq!(names(&filtered), vec!["Zainal", "Ahmad"]);
    }

    #[test]
    fn test_distinct_values() {
        let records = vec![
            teacher("A", "DG44", "Sains"),
            teacher("B", "", "Matematik"),
            teacher("C", "DG41", "Sains"),
            teacher("D", "DG44", "bahasa"),
        ];

        assert_eq!(
            distinct_values(&records, Field::Grade),
            vec![
                Choice::All,
                Choice::Only("DG41".to_string()),
                Choice::Only("DG44".to_string()),
            ]
        );
        // case-sensitive ordering puts uppercase first
        assert_eq!(
            distinct_values(&records, Field::Specialization),
            vec![
                Choice::All,
                Choice::Only("Matematik".to_string()),
                Choice::Only("Sains".to_string()),
                Choice::Only("bahasa".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_dataset() {
        let records: Vec<Record> = vec![];
        assert_eq!(distinct_values(&records, Field::Grade), vec![Choice::All]);
        assert!(apply_filters(&records, &FilterSelection::default()).is_empty());
    }

    #[test]
    fn test_sentinel_never_collides_with_data() {
        let records = vec![teacher("A", "Semua", ""), teacher("B", "DG41", "")];
        let selection = FilterSelection {
            grade: Choice::Only("Semua".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&apply_filters(&records, &selection)), vec!["A"]);
    }

    #[test]
    fn test_choice_from_arg() {
        assert_eq!(Choice::from_arg(None), Choice::All);
        assert_eq!(Choice::from_arg(Some("semua")), Choice::All);
        assert_eq!(Choice::from_arg(Some("ALL")), Choice::All);
        assert_eq!(
            Choice::from_arg(Some(" DG41 ")),
            Choice::Only("DG41".to_string())
        );
    }

    #[test]
    fn test_cycle_choice_wraps() {
        let options = vec![
            Choice::All,
            Choice::Only("DG41".to_string()),
            Choice::Only("DG44".to_string()),
        ];

        assert_eq!(cycle_choice(&options, &Choice::All, true), options[1]);
        assert_eq!(cycle_choice(&options, &options[2], true), Choice::All);
        assert_eq!(cycle_choice(&options, &Choice::All, false), options[2]);
        assert_eq!(
            cycle_choice(&options, &Choice::Only("gone".to_string()), true),
            Choice::All
        );
    }
}
