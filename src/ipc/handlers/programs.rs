use crate::ipc::helpers::{try_handle_page, FacetDef, FacetSource, PageDef, ParentLink};
use crate::ipc::types::{AppState, Request};
use crate::store::EntityKind;

const PAGE: PageDef = PageDef {
    prefix: "programs",
    kind: EntityKind::Program,
    searchable: &["name", "code"],
    facets: &[
        FacetDef {
            name: "department",
            source: FacetSource::Store {
                kind: EntityKind::Department,
                label_field: "name",
                parent: None,
            },
        },
        // Coordinator candidates are the selected department's teachers.
        FacetDef {
            name: "coordinator",
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
    try_handle_page(state, req, &PAGE, |dir| &mut dir.programs)
}
