use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::refs;
use crate::store::{Entity, EntityKind};

/// Active search term and facet selections for one list page. Empty
/// values are wildcards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    #[serde(default, rename = "sortBy")]
    pub sort_by: Option<String>,
}

/// Filters `records` by search term and facet selections.
///
/// A record matches the search when any searchable field contains the
/// term case-insensitively; it matches the facet set when every non-empty
/// facet equals the record's field exactly. Facets the schema does not
/// know are ignored (UI filter sets can lag schema changes). Output stays
/// in store order unless the query names an explicit sort key.
pub fn apply<'a, T: Entity>(
    records: &'a [T],
    query: &FilterQuery,
    searchable: &[&str],
) -> Vec<&'a T> {
    let needle = query.search.trim().to_lowercase();
    let mut rows: Vec<&T> = records
        .iter()
        .filter(|r| matches_search(*r, &needle, searchable) && matches_facets(*r, &query.filters))
        .collect();
    if let Some(key) = query.sort_by.as_deref() {
        // Stable, so equal keys keep store order.
        rows.sort_by(|a, b| compare_sort_keys(a.field(key), b.field(key)));
    }
    rows
}

// Field values travel as strings; numeric fields (credits, capacity)
// must still sort numerically, not "10" before "4".
fn compare_sort_keys(a: Option<String>, b: Option<String>) -> Ordering {
    match (&a, &b) {
        (Some(x), Some(y)) => match (x.parse::<f64>(), y.parse::<f64>()) {
            (Ok(nx), Ok(ny)) => nx.partial_cmp(&ny).unwrap_or(Ordering::Equal),
            _ => x.cmp(y),
        },
        _ => a.cmp(&b),
    }
}

fn matches_search<T: Entity>(record: &T, needle: &str, searchable: &[&str]) -> bool {
    if needle.is_empty() {
        return true;
    }
    searchable.iter().any(|f| {
        record
            .field(f)
            .map(|v| v.to_lowercase().contains(needle))
            .unwrap_or(false)
    })
}

fn matches_facets<T: Entity>(record: &T, filters: &BTreeMap<String, String>) -> bool {
    filters.iter().all(|(facet, wanted)| {
        if wanted.is_empty() {
            return true;
        }
        match record.field(facet) {
            Some(value) => value == *wanted,
            None => true,
        }
    })
}

/// Distinct values of `option_field` across records consistent with the
/// constraint, in first-seen (store) order. One pass per call.
pub fn facet_options<T: Entity>(
    records: &[T],
    option_field: &str,
    constraint: Option<(&str, &str)>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for record in records {
        if let Some((field, wanted)) = constraint {
            if !wanted.is_empty() && record.field(field).as_deref() != Some(wanted) {
                continue;
            }
        }
        let Some(value) = record.field(option_field) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}

/// Clears every facet that depends on `changed`, transitively, so no
/// (child, stale-parent) pair survives a parent change.
pub fn clear_dependents(kind: EntityKind, changed: &str, filters: &mut BTreeMap<String, String>) {
    for dep in refs::dependents_of(kind, changed) {
        filters.remove(*dep);
        clear_dependents(kind, dep, filters);
    }
}
