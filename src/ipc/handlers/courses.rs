use crate::ipc::helpers::{try_handle_page, FacetDef, FacetSource, PageDef, ParentLink};
use crate::ipc::types::{AppState, Request};
use crate::store::EntityKind;

const PAGE: PageDef = PageDef {
    prefix: "courses",
    kind: EntityKind::Course,
    searchable: &["title", "code"],
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
    ],
};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    try_handle_page(state, req, &PAGE, |dir| &mut dir.courses)
}
