use serde::Serialize;

use crate::store::EntityKind;

/// One reference edge: `kind.field` holds the id of a `target` record.
#[derive(Debug, Clone, Copy)]
pub struct RefEdge {
    pub kind: EntityKind,
    pub field: &'static str,
    pub target: EntityKind,
}

/// The portal's full reference graph. Deleting a parent does not cascade
/// here (mirroring the source behavior); the `dangling` sweep makes the
/// resulting gaps visible instead.
pub const REFERENCE_EDGES: &[RefEdge] = &[
    RefEdge {
        kind: EntityKind::Program,
        field: "department",
        target: EntityKind::Department,
    },
    RefEdge {
        kind: EntityKind::Program,
        field: "coordinator",
        target: EntityKind::Teacher,
    },
    RefEdge {
        kind: EntityKind::Group,
        field: "program",
        target: EntityKind::Program,
    },
    RefEdge {
        kind: EntityKind::Teacher,
        field: "department",
        target: EntityKind::Department,
    },
    RefEdge {
        kind: EntityKind::Student,
        field: "program",
        target: EntityKind::Program,
    },
    RefEdge {
        kind: EntityKind::Student,
        field: "group",
        target: EntityKind::Group,
    },
    RefEdge {
        kind: EntityKind::Course,
        field: "department",
        target: EntityKind::Department,
    },
    RefEdge {
        kind: EntityKind::Course,
        field: "teacher",
        target: EntityKind::Teacher,
    },
    RefEdge {
        kind: EntityKind::Assignment,
        field: "course",
        target: EntityKind::Course,
    },
    RefEdge {
        kind: EntityKind::Assignment,
        field: "teacher",
        target: EntityKind::Teacher,
    },
    RefEdge {
        kind: EntityKind::Assignment,
        field: "group",
        target: EntityKind::Group,
    },
];

pub fn references_of(kind: EntityKind) -> impl Iterator<Item = &'static RefEdge> {
    REFERENCE_EDGES.iter().filter(move |e| e.kind == kind)
}

/// Fields and filter facets that must be cleared when the named field
/// changes, so a stale child value never survives a new parent.
///
/// `department` appears for Group and Student even though neither stores
/// it: on those pages it is a derived filter facet that narrows the
/// program options.
pub fn dependents_of(kind: EntityKind, field: &str) -> &'static [&'static str] {
    match (kind, field) {
        (EntityKind::Program, "department") => &["coordinator"],
        (EntityKind::Teacher, "department") => &["speciality"],
        (EntityKind::Group, "department") => &["program"],
        (EntityKind::Student, "department") => &["program"],
        (EntityKind::Student, "program") => &["group"],
        (EntityKind::Course, "department") => &["teacher"],
        (EntityKind::Assignment, "department") => &["teacher", "course"],
        (EntityKind::Assignment, "program") => &["group"],
        _ => &[],
    }
}

/// Cross-store lookups used by validators, derivations and facet labels.
pub trait RefLookup {
    fn exists(&self, kind: EntityKind, id: &str) -> bool;
    fn field_of(&self, kind: EntityKind, id: &str, field: &str) -> Option<String>;
}

/// A non-empty reference value that names no existing record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefViolation {
    pub kind: &'static str,
    pub id: String,
    pub field: &'static str,
    pub value: String,
    pub target: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_program_resets_group() {
        assert_eq!(
            dependents_of(EntityKind::Student, "program"),
            &["group"]
        );
    }

    #[test]
    fn unknown_field_has_no_dependents() {
        assert!(dependents_of(EntityKind::Department, "name").is_empty());
        assert!(dependents_of(EntityKind::Group, "capacity").is_empty());
    }

    #[test]
    fn every_kind_with_edges_is_in_the_table() {
        assert_eq!(references_of(EntityKind::Student).count(), 2);
        assert_eq!(references_of(EntityKind::Assignment).count(), 3);
        assert_eq!(references_of(EntityKind::Department).count(), 0);
    }
}
