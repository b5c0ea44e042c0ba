use std::collections::HashSet;

use super::model::{Table, ALL_GROUPS};

// ---------------------------------------------------------------------------
// Group filter
// ---------------------------------------------------------------------------

/// Rows of `table` belonging to `group`.
///
/// [`ALL_GROUPS`] selects everything. A group with no rows yields an empty
/// table; presenting that state is up to the caller.
pub fn filter_by_group(table: &Table, group: &str) -> Table {
    if group == ALL_GROUPS {
        return table.clone();
    }
    table
        .iter()
        .filter(|record| record.group == group)
        .cloned()
        .collect()
}

/// Group selector entries: [`ALL_GROUPS`] followed by each distinct group in
/// first-seen order.
pub fn group_options(table: &Table) -> Vec<String> {
    let mut seen = HashSet::new();
    std::iter::once(ALL_GROUPS.to_string())
        .chain(
            table
                .iter()
                .filter(|record| seen.insert(record.group.as_str()))
                .map(|record| record.group.clone()),
        )
        .collect()
}

/// Distinct, non-empty student names in first-seen order.
pub fn student_names(table: &Table) -> Vec<String> {
    let mut seen = HashSet::new();
    table
        .iter()
        .map(|record| record.name.as_str())
        .filter(|name| !name.trim().is_empty() && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{record, UNASSIGNED_GROUP};

    fn sample() -> Table {
        Table::new(vec![
            record("Ana", "1", 4.0),
            record("Beto", "2", 3.0),
            record("Carla", "1", 5.0),
            record("Dani", UNASSIGNED_GROUP, 2.0),
        ])
    }

    #[test]
    fn all_groups_is_identity() {
        let table = sample();
        assert_eq!(filter_by_group(&table, ALL_GROUPS), table);
    }

    #[test]
    fn filters_keep_input_order() {
        let filtered = filter_by_group(&sample(), "1");
        let names: Vec<_> = filtered.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Ana", "Carla"]);
    }

    #[test]
    fn unknown_group_is_empty() {
        assert!(filter_by_group(&sample(), "7").is_empty());
    }

    #[test]
    fn group_options_start_with_all() {
        assert_eq!(
            group_options(&sample()),
            [ALL_GROUPS, "1", "2", UNASSIGNED_GROUP]
        );
        assert_eq!(group_options(&Table::default()), [ALL_GROUPS]);
    }

    #[test]
    fn student_names_are_distinct() {
        let table = Table::new(vec![
            record("Ana", "1", 4.0),
            record("", "1", 3.0),
            record("Ana", "2", 2.0),
            record("Beto", "2", 2.0),
        ]);
        assert_eq!(student_names(&table), ["Ana", "Beto"]);
    }
}
