use crate::crud::CrudController;
use crate::filter;
use crate::refs::{RefLookup, RefViolation, REFERENCE_EDGES};
use crate::schema::{Assignment, Course, Department, Group, Program, Student, Teacher};
use crate::store::{Entity, EntityKind};

/// All of one portal session's stores behind a single handle, one
/// controller per entity kind. This is what the IPC layer hands around
/// and what cross-store reference checks run against.
#[derive(Debug, Default)]
pub struct Directory {
    pub departments: CrudController<Department>,
    pub programs: CrudController<Program>,
    pub groups: CrudController<Group>,
    pub teachers: CrudController<Teacher>,
    pub students: CrudController<Student>,
    pub courses: CrudController<Course>,
    pub assignments: CrudController<Assignment>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Department => self.departments.store.len(),
            EntityKind::Program => self.programs.store.len(),
            EntityKind::Group => self.groups.store.len(),
            EntityKind::Teacher => self.teachers.store.len(),
            EntityKind::Student => self.students.store.len(),
            EntityKind::Course => self.courses.store.len(),
            EntityKind::Assignment => self.assignments.store.len(),
        }
    }

    /// Distinct ids of `kind` records consistent with the constraint, in
    /// store order. Feeds the cascading option lists.
    pub fn facet_values(
        &self,
        kind: EntityKind,
        constraint: Option<(&str, &str)>,
    ) -> Vec<String> {
        match kind {
            EntityKind::Department => {
                filter::facet_options(self.departments.store.list(), "id", constraint)
            }
            EntityKind::Program => {
                filter::facet_options(self.programs.store.list(), "id", constraint)
            }
            EntityKind::Group => filter::facet_options(self.groups.store.list(), "id", constraint),
            EntityKind::Teacher => {
                filter::facet_options(self.teachers.store.list(), "id", constraint)
            }
            EntityKind::Student => {
                filter::facet_options(self.students.store.list(), "id", constraint)
            }
            EntityKind::Course => {
                filter::facet_options(self.courses.store.list(), "id", constraint)
            }
            EntityKind::Assignment => {
                filter::facet_options(self.assignments.store.list(), "id", constraint)
            }
        }
    }

    /// Every non-empty reference value that names no existing record.
    /// Run by `integrity.check`; deletions deliberately do not cascade,
    /// so this is where the gaps show up.
    pub fn dangling(&self) -> Vec<RefViolation> {
        let mut out = Vec::new();
        for edge in REFERENCE_EDGES {
            for (id, value) in self.reference_values(edge.kind, edge.field) {
                if !self.exists(edge.target, &value) {
                    out.push(RefViolation {
                        kind: edge.kind.as_str(),
                        id,
                        field: edge.field,
                        value,
                        target: edge.target.as_str(),
                    });
                }
            }
        }
        out
    }

    fn reference_values(&self, kind: EntityKind, field: &str) -> Vec<(String, String)> {
        match kind {
            EntityKind::Department => collect_refs(self.departments.store.list(), field),
            EntityKind::Program => collect_refs(self.programs.store.list(), field),
            EntityKind::Group => collect_refs(self.groups.store.list(), field),
            EntityKind::Teacher => collect_refs(self.teachers.store.list(), field),
            EntityKind::Student => collect_refs(self.students.store.list(), field),
            EntityKind::Course => collect_refs(self.courses.store.list(), field),
            EntityKind::Assignment => collect_refs(self.assignments.store.list(), field),
        }
    }
}

fn collect_refs<T: Entity>(records: &[T], field: &str) -> Vec<(String, String)> {
    records
        .iter()
        .filter_map(|r| {
            r.field(field)
                .filter(|v| !v.is_empty())
                .map(|v| (r.id().to_string(), v))
        })
        .collect()
}

impl RefLookup for Directory {
    fn exists(&self, kind: EntityKind, id: &str) -> bool {
        self.field_of(kind, id, "id").is_some()
    }

    fn field_of(&self, kind: EntityKind, id: &str, field: &str) -> Option<String> {
        match kind {
            EntityKind::Department => self.departments.store.get(id).and_then(|r| r.field(field)),
            EntityKind::Program => self.programs.store.get(id).and_then(|r| r.field(field)),
            EntityKind::Group => self.groups.store.get(id).and_then(|r| r.field(field)),
            EntityKind::Teacher => self.teachers.store.get(id).and_then(|r| r.field(field)),
            EntityKind::Student => self.students.store.get(id).and_then(|r| r.field(field)),
            EntityKind::Course => self.courses.store.get(id).and_then(|r| r.field(field)),
            EntityKind::Assignment => self.assignments.store.get(id).and_then(|r| r.field(field)),
        }
    }
}
