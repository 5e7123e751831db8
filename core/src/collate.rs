//! Ordering helpers shared by the sidebar options, hierarchies and the list view

use std::cmp::Ordering;

/// Case-insensitive comparison with a case-sensitive tie-break, close to a
/// browser's default `localeCompare` for the labels this dataset uses.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Descending count, ties broken by ascending name.
pub fn count_desc_then_name(a: (&str, usize), b: (&str, usize)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| locale_cmp(a.0, b.0))
}

/// Curated values first in list order, everything else alphabetically after.
pub fn curated_cmp(curated: &[String], a: &str, b: &str) -> Ordering {
    let rank = |name: &str| curated.iter().position(|c| c == name);
    match (rank(a), rank(b)) {
        (Some(ra), Some(rb)) => ra.cmp(&rb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => locale_cmp(a, b),
    }
}
