use crate::ipc::helpers::{try_handle_page, FacetDef, FacetSource, PageDef, ParentLink};
use crate::ipc::types::{AppState, Request};
use crate::store::EntityKind;

const PAGE: PageDef = PageDef {
    prefix: "students",
    kind: EntityKind::Student,
    searchable: &["firstName", "lastName", "email", "enrollmentCode"],
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
            name: "program",
            source: FacetSource::Store {
                kind: EntityKind::Program,
                label_field: "name",
                parent: Some(ParentLink {
                    facet: "department",
                    source_field: "department",
                }),
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
    try_handle_page(state, req, &PAGE, |dir| &mut dir.students)
}
