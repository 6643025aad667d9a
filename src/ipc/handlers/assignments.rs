use crate::ipc::helpers::{try_handle_page, FacetDef, FacetSource, PageDef, ParentLink};
use crate::ipc::types::{AppState, Request};
use crate::store::EntityKind;

// Department and program facets are derived here: assignments store
// neither. They narrow the teacher/course and group options and, through
// those stored fields, the rows.
const PAGE: PageDef = PageDef {
    prefix: "assignments",
    kind: EntityKind::Assignment,
    searchable: &["title"],
    facets: &[
        FacetDef {
            name: "department",
            source: FacetSource::Store {
                kind: EntityKind::Department,
                label_field: "name",
                parent: None,
            },
        },
        FacetDef {
            name: "teacher",
            source: FacetSource::Store {
                kind: EntityKind::Teacher,
                label_field: "name",
                parent: Some(ParentLink {
                    facet: "department",
                    source_field: "department",
                }),
            },
        },
        FacetDef {
            name: "course",
            source: FacetSource::Store {
                kind: EntityKind::Course,
                label_field: "title",
                parent: Some(ParentLink {
                    facet: "department",
                    source_field: "department",
                }),
            },
        },
        FacetDef {
            name: "program",
            source: FacetSource::Store {
                kind: EntityKind::Program,
                label_field: "name",
                parent: None,
            },
        },
        FacetDef {
            name: "group",
            source: FacetSource::Store {
                kind: EntityKind::Group,
                label_field: "name",
                parent: Some(ParentLink {
                    facet: "program",
                    source_field: "program",
                }),
            },
        },
    ],
};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    try_handle_page(state, req, &PAGE, |dir| &mut dir.assignments)
}
